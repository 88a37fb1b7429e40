//! Structured text change deltas.
//!
//! Every buffer mutation produces a [`TextDelta`] in **byte offsets**. The registry uses it to
//! keep every frame bound to the mutated buffer pointing at the same logical text, and hands it
//! to change subscribers so a renderer can invalidate only what moved.

use std::ops::Range;

/// A single contiguous edit: `deleted` bytes removed at `start`, then `inserted` bytes added there.
///
/// Buffer mutations are either pure insertions or pure deletions, so one of the two lengths is
/// always zero in deltas the core produces; the shifting rule handles the general case anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDelta {
    /// Start byte offset of the edit, in the document before the edit.
    pub start: usize,
    /// Number of bytes removed at `start`.
    pub deleted: usize,
    /// Number of bytes inserted at `start`.
    pub inserted: usize,
}

impl TextDelta {
    /// Delta of inserting `len` bytes at `start`.
    pub fn insertion(start: usize, len: usize) -> Self {
        Self {
            start,
            deleted: 0,
            inserted: len,
        }
    }

    /// Delta of deleting the byte range `range`.
    pub fn deletion(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            deleted: range.end.saturating_sub(range.start),
            inserted: 0,
        }
    }

    /// Exclusive end of the removed range in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted)
    }

    /// Returns `true` if the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.deleted == 0 && self.inserted == 0
    }

    /// Signed length change of the document.
    pub fn len_change(&self) -> isize {
        self.inserted as isize - self.deleted as isize
    }

    /// Map an offset in the pre-edit document to the same logical position afterwards.
    ///
    /// - offsets before `start` are untouched
    /// - offsets strictly inside the removed range collapse to `start`
    /// - offsets at or after the edit point shift by the net length change
    pub fn shift_offset(&self, offset: usize) -> usize {
        if offset < self.start {
            return offset;
        }
        if offset < self.end() {
            return self.start;
        }
        if self.inserted >= self.deleted {
            offset.saturating_add(self.inserted - self.deleted)
        } else {
            offset.saturating_sub(self.deleted - self.inserted)
        }
    }

    /// Byte range covered by the edit in the post-edit document.
    pub fn inserted_range(&self) -> Range<usize> {
        self.start..self.start.saturating_add(self.inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_shifts_offsets_at_or_after_start() {
        let delta = TextDelta::insertion(2, 3);
        assert_eq!(delta.shift_offset(1), 1);
        assert_eq!(delta.shift_offset(2), 5);
        assert_eq!(delta.shift_offset(5), 8);
        assert_eq!(delta.shift_offset(10), 13);
    }

    #[test]
    fn deletion_clamps_inside_and_shifts_after() {
        let delta = TextDelta::deletion(4..8);
        assert_eq!(delta.shift_offset(3), 3);
        assert_eq!(delta.shift_offset(4), 4);
        assert_eq!(delta.shift_offset(6), 4);
        assert_eq!(delta.shift_offset(8), 4);
        assert_eq!(delta.shift_offset(12), 8);
        assert_eq!(delta.len_change(), -4);
    }
}
