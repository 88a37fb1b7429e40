//! Bounded undo ring with a redo cursor.
//!
//! Each [`crate::TextBuffer`] owns one [`UndoLog`]. The log is a linear history: entries left of
//! the cursor are applied, entries right of it have been undone and can be redone. Recording a
//! new edit while redoable entries exist discards them.
//!
//! Adjacent edits of the same kind and group coalesce into one entry:
//!
//! - inserts merge when the new text starts where the previous one ended and both agree on
//!   newline adjacency at the join (`prev.ends_with('\n') == next.starts_with('\n')`), so typing
//!   collapses into one step per line-continuous run;
//! - deletes merge when the new range ends where the previous one started (backspacing).
//!
//! [`EditGroup::Command`] entries never merge, and [`UndoLog::seal`] closes the current run.

use std::collections::VecDeque;
use tracing::{error, trace};

/// Kind of a recorded mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Text was inserted at `offset`.
    Insert,
    /// Text was removed from `offset`.
    Delete,
}

/// Origin of an edit, used to keep semantically different actions in separate undo steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditGroup {
    /// Typed at the keyboard.
    Typed,
    /// Pasted from the clipboard.
    Pasted,
    /// Produced by a discrete command (delete-range, replace selection); never merged.
    Command,
}

/// A recorded, invertible buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoOp {
    /// Insert or delete.
    pub kind: OpKind,
    /// Grouping tag used by the merge rule.
    pub group: EditGroup,
    /// Byte offset of the mutation.
    pub offset: usize,
    /// The inserted or removed text.
    pub text: String,
}

impl UndoOp {
    /// Record of inserting `text` at `offset`.
    pub fn insert(offset: usize, text: impl Into<String>, group: EditGroup) -> Self {
        Self {
            kind: OpKind::Insert,
            group,
            offset,
            text: text.into(),
        }
    }

    /// Record of deleting `text`, which started at `offset`.
    pub fn delete(offset: usize, text: impl Into<String>, group: EditGroup) -> Self {
        Self {
            kind: OpKind::Delete,
            group,
            offset,
            text: text.into(),
        }
    }

    /// Byte length of the affected text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the entry carries no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Exclusive end offset of the affected range.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Ring of [`UndoOp`]s plus the redo cursor.
#[derive(Debug, Clone)]
pub struct UndoLog {
    ops: VecDeque<UndoOp>,
    cursor: usize,
    capacity: usize,
    sealed: bool,
}

impl UndoLog {
    /// Create an empty log holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            ops: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
            sealed: false,
        }
    }

    /// Number of entries (applied and redoable).
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Position of the redo cursor in `0..=len()`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&UndoOp> {
        self.ops.get(index)
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.cursor < self.ops.len()
    }

    /// Close the current run so the next recorded edit starts a new entry.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.cursor = 0;
        self.sealed = false;
    }

    /// Record a mutation that has just been applied to the buffer.
    pub fn record(&mut self, op: UndoOp) {
        let op = match self.try_merge(op) {
            Ok(()) => {
                trace!(target: "undo", len = self.ops.len(), cursor = self.cursor, "undo_merge");
                return;
            }
            Err(op) => op,
        };

        if self.cursor < self.ops.len() {
            trace!(target: "undo", discarded = self.ops.len() - self.cursor, "redo_truncated_on_fork");
            self.ops.truncate(self.cursor);
        }

        if self.ops.len() >= self.capacity {
            self.ops.pop_front();
            trace!(target: "undo", capacity = self.capacity, "undo_evict_oldest");
        } else if self.ops.try_reserve(1).is_err() {
            error!(target: "undo", "undo_record_allocation_failed");
            self.cursor = self.ops.len();
            self.sealed = true;
            return;
        }

        self.ops.push_back(op);
        self.cursor = self.ops.len();
        self.sealed = false;
        trace!(target: "undo", len = self.ops.len(), cursor = self.cursor, "undo_append");
    }

    /// Entry the next undo would revert.
    pub fn peek_undo(&self) -> Option<&UndoOp> {
        self.cursor.checked_sub(1).and_then(|i| self.ops.get(i))
    }

    /// Entry the next redo would re-apply.
    pub fn peek_redo(&self) -> Option<&UndoOp> {
        self.ops.get(self.cursor)
    }

    /// Move the cursor left after the entry from [`peek_undo`](Self::peek_undo) was reverted.
    pub fn commit_undo(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.sealed = true;
    }

    /// Move the cursor right after the entry from [`peek_redo`](Self::peek_redo) was re-applied.
    pub fn commit_redo(&mut self) {
        self.cursor = (self.cursor + 1).min(self.ops.len());
        self.sealed = true;
    }

    fn try_merge(&mut self, op: UndoOp) -> Result<(), UndoOp> {
        if self.sealed || self.cursor != self.ops.len() || op.group == EditGroup::Command {
            return Err(op);
        }
        let Some(last) = self.ops.back_mut() else {
            return Err(op);
        };
        if last.kind != op.kind || last.group != op.group {
            return Err(op);
        }

        match op.kind {
            OpKind::Insert => {
                if op.offset != last.end()
                    || last.text.ends_with('\n') != op.text.starts_with('\n')
                {
                    return Err(op);
                }
                last.text.push_str(&op.text);
            }
            OpKind::Delete => {
                if op.end() != last.offset {
                    return Err(op);
                }
                let mut text = op.text;
                text.push_str(&last.text);
                last.text = text;
                last.offset = op.offset;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(offset: usize, text: &str) -> UndoOp {
        UndoOp::insert(offset, text, EditGroup::Typed)
    }

    #[test]
    fn consecutive_typing_merges_into_one_entry() {
        let mut log = UndoLog::new(16);
        log.record(typed(0, "a"));
        log.record(typed(1, "b"));
        log.record(typed(2, "c"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.peek_undo().unwrap().text, "abc");
    }

    #[test]
    fn newline_at_the_join_breaks_the_run() {
        let mut log = UndoLog::new(16);
        log.record(typed(0, "ab"));
        log.record(typed(2, "\n"));
        log.record(typed(3, "c"));
        assert_eq!(log.len(), 3);

        let mut log = UndoLog::new(16);
        log.record(typed(0, "\n"));
        log.record(typed(1, "\n"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn group_change_and_gap_break_the_run() {
        let mut log = UndoLog::new(16);
        log.record(typed(0, "a"));
        log.record(UndoOp::insert(1, "b", EditGroup::Pasted));
        log.record(typed(5, "c"));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn backspacing_merges_backward() {
        let mut log = UndoLog::new(16);
        log.record(UndoOp::delete(4, "d", EditGroup::Typed));
        log.record(UndoOp::delete(3, "c", EditGroup::Typed));
        log.record(UndoOp::delete(2, "b", EditGroup::Typed));
        assert_eq!(log.len(), 1);
        let op = log.peek_undo().unwrap();
        assert_eq!((op.offset, op.text.as_str()), (2, "bcd"));
    }

    #[test]
    fn command_group_and_seal_never_merge() {
        let mut log = UndoLog::new(16);
        log.record(UndoOp::insert(0, "a", EditGroup::Command));
        log.record(UndoOp::insert(1, "b", EditGroup::Command));
        assert_eq!(log.len(), 2);

        log.record(typed(2, "c"));
        log.seal();
        log.record(typed(3, "d"));
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn full_ring_evicts_oldest() {
        let mut log = UndoLog::new(2);
        log.record(UndoOp::insert(0, "a", EditGroup::Command));
        log.record(UndoOp::insert(1, "b", EditGroup::Command));
        log.record(UndoOp::insert(2, "c", EditGroup::Command));
        assert_eq!(log.len(), 2);
        assert_eq!(log.cursor(), 2);
        assert_eq!(log.get(0).unwrap().text, "b");
    }

    #[test]
    fn recording_after_undo_discards_redo() {
        let mut log = UndoLog::new(8);
        log.record(UndoOp::insert(0, "a", EditGroup::Command));
        log.record(UndoOp::insert(1, "b", EditGroup::Command));
        log.commit_undo();
        assert!(log.can_redo());
        log.record(UndoOp::insert(1, "x", EditGroup::Command));
        assert!(!log.can_redo());
        assert_eq!(log.len(), 2);
        assert_eq!(log.peek_undo().unwrap().text, "x");
    }

    #[test]
    fn undo_and_redo_past_the_ends_are_noops() {
        let mut log = UndoLog::new(8);
        assert!(log.peek_undo().is_none());
        assert!(log.peek_redo().is_none());
        log.commit_undo();
        assert_eq!(log.cursor(), 0);
        log.commit_redo();
        assert_eq!(log.cursor(), 0);
    }
}
