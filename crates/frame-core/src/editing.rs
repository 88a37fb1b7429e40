//! Frame-level editing: insert at cursor, deletion, clipboard, selection, undo/redo.
//!
//! Every operation here edits the frame's bound buffer through its undo-aware path (undo/redo use
//! the raw path internally) and then routes the resulting [`TextDelta`] through the registry so
//! every frame on the buffer stays consistent. Editing a search frame's query re-runs the search.

use crate::buffer::TextBuffer;
use crate::delta::TextDelta;
use crate::error::RegistryError;
use crate::frame::ViewKind;
use crate::navigation::{next_boundary, prev_boundary};
use crate::registry::{FrameId, Registry};
use crate::state::{ChangeEvent, ChangeKind};
use crate::undo::EditGroup;
use std::ops::Range;

impl Registry {
    /// Type `text` at the cursor, replacing the active selection if any.
    pub fn insert_text(&mut self, id: FrameId, text: &str) -> Result<Option<TextDelta>, RegistryError> {
        self.insert_text_grouped(id, text, EditGroup::Typed)
    }

    /// Insert `text` at the cursor, recording it under `group` for undo merging.
    pub fn insert_text_grouped(
        &mut self,
        id: FrameId,
        text: &str,
        group: EditGroup,
    ) -> Result<Option<TextDelta>, RegistryError> {
        let replaced = self.delete_selection(id)?;
        let inserted = self.edit(id, |buffer, cursor| buffer.insert(cursor, text, group))?;
        Ok(inserted.or(replaced))
    }

    /// Insert clipboard bytes at the cursor. Invalid UTF-8 is replaced with U+FFFD.
    pub fn paste(&mut self, id: FrameId, bytes: &[u8]) -> Result<Option<TextDelta>, RegistryError> {
        let text = String::from_utf8_lossy(bytes);
        self.insert_text_grouped(id, &text, EditGroup::Pasted)
    }

    /// Delete the bytes between `from` and `to` (normalized and clamped) as one undo step.
    pub fn delete_range(
        &mut self,
        id: FrameId,
        from: usize,
        to: usize,
    ) -> Result<Option<TextDelta>, RegistryError> {
        self.edit(id, |buffer, _| buffer.delete(from, to, EditGroup::Command))
    }

    /// Delete the selection, or the code point before the cursor.
    pub fn backspace(&mut self, id: FrameId) -> Result<Option<TextDelta>, RegistryError> {
        if let Some(delta) = self.delete_selection(id)? {
            return Ok(Some(delta));
        }
        self.edit(id, |buffer, cursor| {
            let from = prev_boundary(buffer.as_str(), cursor);
            buffer.delete(from, cursor, EditGroup::Typed)
        })
    }

    /// Delete the selection, or the code point after the cursor.
    pub fn delete_forward(&mut self, id: FrameId) -> Result<Option<TextDelta>, RegistryError> {
        if let Some(delta) = self.delete_selection(id)? {
            return Ok(Some(delta));
        }
        self.edit(id, |buffer, cursor| {
            let to = next_boundary(buffer.as_str(), cursor);
            buffer.delete(cursor, to, EditGroup::Typed)
        })
    }

    /// Start (or restart) a selection anchored at the cursor.
    pub fn set_selection_anchor(&mut self, id: FrameId) -> Result<(), RegistryError> {
        let frame = self.frame_mut(id)?;
        frame.view.anchor = frame.view.cursor;
        frame.view.selecting = true;
        self.emit(ChangeEvent::frame(ChangeKind::SelectionChanged, id));
        Ok(())
    }

    /// Drop the active selection, if any.
    pub fn clear_selection(&mut self, id: FrameId) -> Result<(), RegistryError> {
        let view = &mut self.frame_mut(id)?.view;
        if std::mem::take(&mut view.selecting) {
            self.emit(ChangeEvent::frame(ChangeKind::SelectionChanged, id));
        }
        Ok(())
    }

    /// Bytes of the active selection, for the host to place on its clipboard.
    pub fn copy_selection(&self, id: FrameId) -> Result<Option<Vec<u8>>, RegistryError> {
        let Some(range) = self.selection_range(id)? else {
            return Ok(None);
        };
        let buffer = self.buffer_of(id)?;
        Ok(Some(buffer.as_bytes()[range].to_vec()))
    }

    /// Copy the active selection, then delete it.
    pub fn cut_selection(&mut self, id: FrameId) -> Result<Option<Vec<u8>>, RegistryError> {
        let copied = self.copy_selection(id)?;
        if copied.is_some() {
            self.delete_selection(id)?;
        }
        Ok(copied)
    }

    /// Undo the last step of the frame's buffer and place the cursor at the change.
    pub fn undo(&mut self, id: FrameId) -> Result<Option<TextDelta>, RegistryError> {
        self.edit(id, |buffer, _| buffer.undo())
    }

    /// Redo the last undone step of the frame's buffer.
    pub fn redo(&mut self, id: FrameId) -> Result<Option<TextDelta>, RegistryError> {
        self.edit(id, |buffer, _| buffer.redo())
    }

    /// Active selection, clamped to the current buffer.
    fn selection_range(&self, id: FrameId) -> Result<Option<Range<usize>>, RegistryError> {
        let Some(range) = self.frame(id)?.selection() else {
            return Ok(None);
        };
        let buffer = self.buffer_of(id)?;
        Ok(Some(buffer.clamp_range(range.start, range.end)))
    }

    fn delete_selection(&mut self, id: FrameId) -> Result<Option<TextDelta>, RegistryError> {
        let Some(range) = self.selection_range(id)? else {
            return Ok(None);
        };
        let delta = self.edit(id, |buffer, _| {
            buffer.delete(range.start, range.end, EditGroup::Command)
        })?;
        // An empty selection deletes nothing but still ends.
        self.clear_selection(id)?;
        Ok(delta)
    }

    /// Run `mutation` on the frame's buffer with its cursor, then propagate the delta.
    fn edit<F>(&mut self, id: FrameId, mutation: F) -> Result<Option<TextDelta>, RegistryError>
    where
        F: FnOnce(&mut TextBuffer, usize) -> Option<TextDelta>,
    {
        let frame = self.frame(id)?;
        let (buffer_id, cursor, kind) = (frame.buffer(), frame.cursor(), frame.view_kind());
        let Some(delta) = mutation(self.buffer_mut(buffer_id)?, cursor) else {
            return Ok(None);
        };
        self.apply_delta(buffer_id, delta, Some(id));
        if kind == ViewKind::Search {
            self.update_search(id)?;
        }
        Ok(Some(delta))
    }
}
