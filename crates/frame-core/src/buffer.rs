//! Text buffer: contiguous UTF-8 storage with chunked growth and an undo log.
//!
//! The buffer keeps its bytes in one owned `String`. Storage grows in multiples of a fixed chunk
//! size and never shrinks on delete. Every public offset is clamped to `[0, len]` and floored to a
//! char boundary, so callers never see an error for an out-of-range position.
//!
//! Mutations come in two flavors:
//!
//! - **raw** (`insert_raw` / `delete_raw`): no undo record; used for undo/redo replay, for
//!   loading file content and for system writes such as appending log output
//! - **undo-aware** (`insert` / `delete`): apply the raw mutation, then record an [`UndoOp`]
//!
//! Buffers know nothing about the frames looking at them. Callers route the returned
//! [`TextDelta`] through [`crate::Registry`] so that bound frames stay consistent.

use crate::config::{DEFAULT_TEXT_CHUNK_SIZE, DEFAULT_UNDO_CAPACITY};
use crate::delta::TextDelta;
use crate::text::floor_char_boundary;
use crate::undo::{EditGroup, OpKind, UndoLog, UndoOp};
use std::ops::Range;
use tracing::{error, trace};

/// Growable UTF-8 text plus its undo history.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    capacity: usize,
    chunk_size: usize,
    undo: UndoLog,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_CHUNK_SIZE, DEFAULT_UNDO_CAPACITY)
    }
}

impl TextBuffer {
    /// Create an empty buffer growing in `chunk_size` steps with an undo ring of `undo_capacity`.
    pub fn new(chunk_size: usize, undo_capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity: 0,
            chunk_size: chunk_size.max(1),
            undo: UndoLog::new(undo_capacity),
        }
    }

    /// Create a buffer holding `text` with default tunables and an empty history.
    pub fn with_text(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.insert_raw(0, text);
        buffer
    }

    /// Full content.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Full content as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Reserved storage in bytes; always a multiple of the chunk size and `> len()` once grown.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Growth granularity in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Clamp `offset` into `[0, len]` and onto a char boundary.
    pub fn clamp_offset(&self, offset: usize) -> usize {
        floor_char_boundary(&self.text, offset)
    }

    /// Normalize a possibly reversed, possibly out-of-range pair into a valid byte range.
    pub fn clamp_range(&self, from: usize, to: usize) -> Range<usize> {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        self.clamp_offset(from)..self.clamp_offset(to)
    }

    /// Text in `range` (clamped).
    pub fn slice(&self, range: Range<usize>) -> &str {
        let range = self.clamp_range(range.start, range.end);
        &self.text[range]
    }

    /// Number of lines; `N` newlines make `N + 1` lines.
    pub fn line_count(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'\n').count() + 1
    }

    /// Byte range of the zero-based `line`, excluding its trailing `'\n'`.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = if line == 0 {
            0
        } else {
            self.text.match_indices('\n').nth(line - 1)?.0 + 1
        };
        let end = self.text[start..]
            .find('\n')
            .map_or(self.text.len(), |i| start + i);
        Some(start..end)
    }

    /// Zero-based line containing `offset` (clamped).
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.text.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
    }

    /// The undo log.
    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Number of steps `undo` can revert.
    pub fn undo_depth(&self) -> usize {
        self.undo.cursor()
    }

    /// Number of steps `redo` can re-apply.
    pub fn redo_depth(&self) -> usize {
        self.undo.len() - self.undo.cursor()
    }

    /// Close the current typing run; the next recorded edit starts a new undo step.
    pub fn seal_undo_run(&mut self) {
        self.undo.seal();
    }

    /// Forget all undo/redo history.
    pub fn clear_history(&mut self) {
        self.undo.clear();
    }

    /// Insert `text` at `offset` without recording undo history.
    ///
    /// Returns `None` (and leaves the buffer untouched) when `text` is empty or storage could not
    /// grow.
    pub fn insert_raw(&mut self, offset: usize, text: &str) -> Option<TextDelta> {
        if text.is_empty() {
            return None;
        }
        let offset = self.clamp_offset(offset);
        if !self.reserve_for(text.len()) {
            return None;
        }
        self.text.insert_str(offset, text);
        trace!(target: "buffer", offset, len = text.len(), total = self.text.len(), "insert");
        Some(TextDelta::insertion(offset, text.len()))
    }

    /// Delete the byte range between `from` and `to` without recording undo history.
    pub fn delete_raw(&mut self, from: usize, to: usize) -> Option<TextDelta> {
        self.remove(from, to).map(|(delta, _)| delta)
    }

    /// Insert `text` at `offset` and record it for undo.
    pub fn insert(&mut self, offset: usize, text: &str, group: EditGroup) -> Option<TextDelta> {
        let delta = self.insert_raw(offset, text)?;
        self.undo.record(UndoOp::insert(delta.start, text, group));
        Some(delta)
    }

    /// Delete the byte range between `from` and `to` and record it for undo.
    pub fn delete(&mut self, from: usize, to: usize, group: EditGroup) -> Option<TextDelta> {
        let (delta, removed) = self.remove(from, to)?;
        self.undo.record(UndoOp::delete(delta.start, removed, group));
        Some(delta)
    }

    /// Revert the entry left of the redo cursor. No-op when history is exhausted.
    pub fn undo(&mut self) -> Option<TextDelta> {
        let op = self.undo.peek_undo()?.clone();
        let delta = match op.kind {
            OpKind::Insert => self.delete_raw(op.offset, op.end())?,
            OpKind::Delete => self.insert_raw(op.offset, &op.text)?,
        };
        self.undo.commit_undo();
        Some(delta)
    }

    /// Re-apply the entry right of the redo cursor. No-op when nothing was undone.
    pub fn redo(&mut self) -> Option<TextDelta> {
        let op = self.undo.peek_redo()?.clone();
        let delta = match op.kind {
            OpKind::Insert => self.insert_raw(op.offset, &op.text)?,
            OpKind::Delete => self.delete_raw(op.offset, op.end())?,
        };
        self.undo.commit_redo();
        Some(delta)
    }

    fn remove(&mut self, from: usize, to: usize) -> Option<(TextDelta, String)> {
        let range = self.clamp_range(from, to);
        if range.is_empty() {
            return None;
        }
        let removed: String = self.text.drain(range.clone()).collect();
        trace!(target: "buffer", start = range.start, len = removed.len(), total = self.text.len(), "delete");
        Some((TextDelta::deletion(range), removed))
    }

    /// Make room for `additional` bytes plus the sentinel slot, growing in whole chunks.
    fn reserve_for(&mut self, additional: usize) -> bool {
        let Some(required) = self
            .text
            .len()
            .checked_add(additional)
            .and_then(|n| n.checked_add(1))
        else {
            error!(target: "buffer", additional, "buffer_size_overflow");
            return false;
        };
        if required <= self.capacity {
            return true;
        }
        let Some(new_capacity) = required
            .div_ceil(self.chunk_size)
            .checked_mul(self.chunk_size)
        else {
            error!(target: "buffer", required, "buffer_size_overflow");
            return false;
        };
        if let Err(err) = self
            .text
            .try_reserve_exact(new_capacity - self.text.len())
        {
            error!(target: "buffer", %err, required, "buffer_grow_failed");
            return false;
        }
        trace!(target: "buffer", from = self.capacity, to = new_capacity, "buffer_grow");
        self.capacity = new_capacity;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_grows_in_whole_chunks_and_never_shrinks() {
        let mut buffer = TextBuffer::new(16, 8);
        assert_eq!(buffer.capacity(), 0);
        buffer.insert_raw(0, "0123456789");
        assert_eq!(buffer.capacity(), 16);
        buffer.insert_raw(10, "abcdef");
        // 16 bytes + sentinel no longer fit in one chunk.
        assert_eq!(buffer.capacity(), 32);
        buffer.delete_raw(0, 16);
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 32);
    }

    #[test]
    fn offsets_are_clamped_and_floored() {
        let mut buffer = TextBuffer::with_text("aé");
        assert_eq!(buffer.clamp_offset(2), 1);
        assert_eq!(buffer.clamp_offset(40), 3);
        assert_eq!(buffer.clamp_range(9, 1), 1..3);

        let delta = buffer.insert_raw(2, "x").unwrap();
        assert_eq!(delta.start, 1);
        assert_eq!(buffer.as_str(), "axé");
    }

    #[test]
    fn line_queries() {
        let buffer = TextBuffer::with_text("ab\n\ncd");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line_range(0), Some(0..2));
        assert_eq!(buffer.line_range(1), Some(3..3));
        assert_eq!(buffer.line_range(2), Some(4..6));
        assert_eq!(buffer.line_range(3), None);
        assert_eq!(buffer.line_of_offset(0), 0);
        assert_eq!(buffer.line_of_offset(3), 1);
        assert_eq!(buffer.line_of_offset(5), 2);
    }

    #[test]
    fn empty_edits_are_noops() {
        let mut buffer = TextBuffer::with_text("abc");
        assert!(buffer.insert(1, "", EditGroup::Typed).is_none());
        assert!(buffer.delete(2, 2, EditGroup::Typed).is_none());
        assert!(!buffer.can_undo());
    }

    #[test]
    fn history_depths_track_the_redo_cursor() {
        let mut buffer = TextBuffer::default();
        buffer.insert(0, "ab", EditGroup::Command);
        buffer.insert(2, "cd", EditGroup::Command);
        assert_eq!((buffer.undo_depth(), buffer.redo_depth()), (2, 0));

        buffer.undo();
        assert_eq!((buffer.undo_depth(), buffer.redo_depth()), (1, 1));
        assert_eq!(buffer.as_str(), "ab");
    }
}
