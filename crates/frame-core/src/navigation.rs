//! Cursor navigation.
//!
//! All movement works in UTF-8 code-point units over a buffer's bytes and never lands inside a
//! multi-byte sequence. Vertical movement works in visual columns: tabs count as a fixed
//! `tab_width` cells, everything else by its Unicode East Asian width.
//!
//! The pure helpers take the buffer text and a byte offset already on a char boundary.
//! [`Registry::move_cursor`] applies a [`Motion`] to a frame and handles the remembered column
//! and auto-scroll.

use crate::error::RegistryError;
use crate::registry::{FrameId, Registry};
use crate::state::{ChangeEvent, ChangeKind};
use crate::text::floor_char_boundary;
use tracing::trace;
use unicode_width::UnicodeWidthChar;

/// A cursor movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// One code point backward.
    Left,
    /// One code point forward.
    Right,
    /// Start of the current line.
    LineStart,
    /// First non-blank (space/tab) character of the current line.
    LineStartSkipIndent,
    /// End of the current line, before its newline.
    LineEnd,
    /// Same visual column on the previous line.
    Up,
    /// Same visual column on the next line.
    Down,
    /// Offset 0.
    BufferStart,
    /// End of the buffer.
    BufferEnd,
    /// An explicit offset (a click); clamped and floored to a char boundary.
    To(usize),
}

/// Offset of the code point after the one at `offset`; `text.len()` at the end.
pub fn next_boundary(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    text[offset..]
        .chars()
        .next()
        .map_or(offset, |ch| offset + ch.len_utf8())
}

/// Offset of the code point before `offset`; `0` at the start.
pub fn prev_boundary(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    text[..offset]
        .chars()
        .next_back()
        .map_or(0, |ch| offset - ch.len_utf8())
}

/// Start of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Start of the line containing `offset`, past any leading spaces and tabs.
pub fn line_start_skip_indentation(text: &str, offset: usize) -> usize {
    let start = line_start(text, offset);
    let indent = text[start..]
        .bytes()
        .take_while(|&b| b == b' ' || b == b'\t')
        .count();
    start + indent
}

/// End of the line containing `offset`, just before its `'\n'` (or the buffer end).
pub fn line_end(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    text[offset..].find('\n').map_or(text.len(), |i| offset + i)
}

/// Cells occupied by `ch`.
pub fn char_cells(ch: char, tab_width: usize) -> usize {
    if ch == '\t' {
        return tab_width;
    }
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Visual column of `offset` within its line.
pub fn visual_column(text: &str, offset: usize, tab_width: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    let start = line_start(text, offset);
    text[start..offset]
        .chars()
        .map(|ch| char_cells(ch, tab_width))
        .sum()
}

/// Byte offset within `line` of the character covering visual `column`, or `line.len()` when
/// the line is shorter.
pub fn offset_for_column(line: &str, column: usize, tab_width: usize) -> usize {
    let mut x = 0;
    for (i, ch) in line.char_indices() {
        let width = char_cells(ch, tab_width);
        if x + width > column {
            return i;
        }
        x += width;
    }
    line.len()
}

impl Registry {
    /// Move a frame's cursor. Returns the new cursor offset.
    ///
    /// Consecutive [`Motion::Up`]/[`Motion::Down`] moves keep aiming at the column the run
    /// started from; any other motion forgets it. A vertical move past the first or last line
    /// leaves the cursor where it is. Moving closes the buffer's current undo run, releases
    /// scroll lock, and scrolls minimally to keep the cursor visible.
    pub fn move_cursor(&mut self, id: FrameId, motion: Motion) -> Result<usize, RegistryError> {
        let frame = self.frame(id)?;
        let (buffer_id, cursor, remembered) =
            (frame.buffer(), frame.cursor(), frame.preferred_column());
        let tab_width = self.config.tab_width;
        let buffer = self.buffer(buffer_id)?;
        let text = buffer.as_str();

        let (target, preferred_column) = match motion {
            Motion::Left => (prev_boundary(text, cursor), None),
            Motion::Right => (next_boundary(text, cursor), None),
            Motion::LineStart => (line_start(text, cursor), None),
            Motion::LineStartSkipIndent => (line_start_skip_indentation(text, cursor), None),
            Motion::LineEnd => (line_end(text, cursor), None),
            Motion::BufferStart => (0, None),
            Motion::BufferEnd => (text.len(), None),
            Motion::To(offset) => (buffer.clamp_offset(offset), None),
            Motion::Up | Motion::Down => {
                let column = remembered.unwrap_or_else(|| visual_column(text, cursor, tab_width));
                let line = buffer.line_of_offset(cursor);
                let target_line = if motion == Motion::Up {
                    line.checked_sub(1)
                } else {
                    line.checked_add(1)
                };
                let target = target_line
                    .and_then(|line| buffer.line_range(line))
                    .map_or(cursor, |range| {
                        range.start + offset_for_column(&text[range], column, tab_width)
                    });
                (target, Some(column))
            }
        };
        trace!(target: "navigation", frame = id.index(), ?motion, from = cursor, to = target, "move");

        self.buffer_mut(buffer_id)?.seal_undo_run();
        let view = &mut self.frame_mut(id)?.view;
        view.cursor = target;
        view.preferred_column = preferred_column;
        view.scroll_locked = false;
        let selecting = view.selecting;

        self.ensure_cursor_visible(id)?;
        if target != cursor {
            self.emit(ChangeEvent::frame(ChangeKind::CursorMoved, id));
            if selecting {
                self.emit(ChangeEvent::frame(ChangeKind::SelectionChanged, id));
            }
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_never_splits_code_points() {
        let text = "aé€😀";
        let mut offset = 0;
        let mut forward = vec![offset];
        while offset < text.len() {
            offset = next_boundary(text, offset);
            forward.push(offset);
        }
        assert_eq!(forward, vec![0, 1, 3, 6, 10]);
        assert_eq!(next_boundary(text, 10), 10);

        assert_eq!(prev_boundary(text, 10), 6);
        assert_eq!(prev_boundary(text, 3), 1);
        assert_eq!(prev_boundary(text, 0), 0);
    }

    #[test]
    fn line_boundaries() {
        let text = "one\n  \ttwo\nthree";
        assert_eq!(line_start(text, 8), 4);
        assert_eq!(line_start_skip_indentation(text, 8), 7);
        assert_eq!(line_end(text, 5), 10);
        assert_eq!(line_end(text, 12), text.len());
        assert_eq!(line_start(text, 0), 0);
    }

    #[test]
    fn columns_count_tabs_and_wide_chars() {
        let text = "\tab\n中x";
        assert_eq!(visual_column(text, 1, 8), 8);
        assert_eq!(visual_column(text, 3, 4), 6);
        // '中' is two cells wide.
        assert_eq!(visual_column(text, 7, 8), 2);

        assert_eq!(offset_for_column("\tabcdef", 9, 8), 2);
        assert_eq!(offset_for_column("\tabcdef", 3, 8), 0);
        assert_eq!(offset_for_column("xy", 9, 8), 2);
        assert_eq!(offset_for_column("中x", 1, 8), 0);
    }
}
