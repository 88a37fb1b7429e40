//! Frames: views onto a shared [`crate::TextBuffer`].
//!
//! A frame is a shared [`ViewState`] record (cursor, selection anchor, scroll, geometry) plus a
//! [`FrameKind`] carrying the fields only some frames have. Frames never own their buffer; they
//! hold a [`BufferId`] handle that the [`crate::Registry`] validates and reference-counts.

use crate::registry::{BufferId, FrameId};
use crate::search::{SearchMatch, SearchOptions};
use std::ops::Range;

/// Split direction for [`crate::Registry::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Halve the width; the new frame sits to the right.
    Horizontal,
    /// Halve the height; the new frame sits below.
    Vertical,
}

/// Frame geometry in text cells (columns × rows), relative to the host window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in columns.
    pub width: f32,
    /// Height in rows.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of whole text rows visible in this rectangle (at least one).
    pub fn visible_rows(&self) -> usize {
        if self.height.is_finite() && self.height >= 1.0 {
            self.height.floor() as usize
        } else {
            1
        }
    }

    /// Split into the kept half and the freed half along `axis`.
    pub fn split(&self, axis: Axis) -> (Rect, Rect) {
        match axis {
            Axis::Horizontal => {
                let half = self.width / 2.0;
                (
                    Rect::new(self.x, self.y, half, self.height),
                    Rect::new(self.x + half, self.y, self.width - half, self.height),
                )
            }
            Axis::Vertical => {
                let half = self.height / 2.0;
                (
                    Rect::new(self.x, self.y, self.width, half),
                    Rect::new(self.x, self.y + half, self.width, self.height - half),
                )
            }
        }
    }

    /// One-row strip along the bottom edge, used for prompt and search frames.
    pub fn bottom_strip(&self) -> Rect {
        let height = self.height.min(1.0);
        Rect::new(self.x, self.y + self.height - height, self.width, height)
    }
}

/// Linear interpolation used by [`Animated`].
pub trait Lerp: Copy + PartialEq {
    /// Value `t` of the way from `self` to `to`.
    fn lerp(self, to: Self, t: f32) -> Self;
    /// Returns `true` if `self` is close enough to `to` to snap.
    fn settled(self, to: Self) -> bool;
}

impl Lerp for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn settled(self, to: Self) -> bool {
        (self - to).abs() < 0.01
    }
}

impl Lerp for Rect {
    fn lerp(self, to: Self, t: f32) -> Self {
        Rect::new(
            self.x.lerp(to.x, t),
            self.y.lerp(to.y, t),
            self.width.lerp(to.width, t),
            self.height.lerp(to.height, t),
        )
    }

    fn settled(self, to: Self) -> bool {
        self.x.settled(to.x)
            && self.y.settled(to.y)
            && self.width.settled(to.width)
            && self.height.settled(to.height)
    }
}

/// A value with a logical target and an interpolated value the renderer draws.
///
/// The core only ever reasons about `target`; `current` exists for smooth scrolling and
/// resizing and is advanced by [`crate::Registry::animate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated<T> {
    /// Where the value is heading.
    pub target: T,
    /// Where the value is drawn right now.
    pub current: T,
}

impl<T: Lerp> Animated<T> {
    /// A settled value.
    pub fn new(value: T) -> Self {
        Self {
            target: value,
            current: value,
        }
    }

    /// Move `current` a fraction `rate` (clamped to `0..=1`) toward `target`.
    /// Returns `true` while still moving.
    pub fn step(&mut self, rate: f32) -> bool {
        if self.current == self.target {
            return false;
        }
        let next = self.current.lerp(self.target, rate.clamp(0.0, 1.0));
        if next.settled(self.target) {
            self.current = self.target;
            false
        } else {
            self.current = next;
            true
        }
    }

    /// Jump straight to the target.
    pub fn snap(&mut self) {
        self.current = self.target;
    }
}

/// Plain tag describing what kind of view a frame is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// A regular editing view.
    Content,
    /// A transient single-purpose input (save as, open path, ...).
    Prompt,
    /// A transient incremental search over the parent frame.
    Search,
}

/// Caller-supplied meaning of a prompt; the core hands it back untouched on confirm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptTag(pub String);

impl PromptTag {
    /// Create a tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Prompt-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    /// What the confirmed text means to the caller.
    pub tag: PromptTag,
}

/// Outcome of the last search update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The query occurs at or after the reference offset.
    Found,
    /// Empty query, no occurrence, or an invalid pattern.
    NotFound,
}

/// Search-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Found / not found.
    pub status: SearchStatus,
    /// Range of the current match in the parent's buffer.
    pub current: Option<SearchMatch>,
    /// Most recent hit; survives later misses and is what a confirm commits.
    pub last_found: Option<SearchMatch>,
    /// Offset in the parent's buffer where scanning starts.
    pub origin: usize,
    /// Parent scroll position when the search opened, restored on cancel.
    pub parent_scroll_top: usize,
    /// Matching options.
    pub options: SearchOptions,
}

/// Kind-specific frame data.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameKind {
    /// A regular editing view.
    Content,
    /// A prompt frame.
    Prompt(PromptState),
    /// A search frame.
    Search(SearchState),
}

impl FrameKind {
    /// The plain tag for this kind.
    pub fn view_kind(&self) -> ViewKind {
        match self {
            FrameKind::Content => ViewKind::Content,
            FrameKind::Prompt(_) => ViewKind::Prompt,
            FrameKind::Search(_) => ViewKind::Search,
        }
    }
}

/// State every frame kind shares.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub(crate) buffer: BufferId,
    pub(crate) cursor: usize,
    pub(crate) anchor: usize,
    pub(crate) selecting: bool,
    pub(crate) scroll: Animated<f32>,
    pub(crate) scroll_top: usize,
    pub(crate) geometry: Animated<Rect>,
    pub(crate) scroll_locked: bool,
    pub(crate) preferred_column: Option<usize>,
    pub(crate) parent: Option<FrameId>,
}

impl ViewState {
    pub(crate) fn new(buffer: BufferId, geometry: Rect, parent: Option<FrameId>) -> Self {
        Self {
            buffer,
            cursor: 0,
            anchor: 0,
            selecting: false,
            scroll: Animated::new(0.0),
            scroll_top: 0,
            geometry: Animated::new(geometry),
            scroll_locked: false,
            preferred_column: None,
            parent,
        }
    }

    pub(crate) fn set_scroll_top(&mut self, line: usize) -> bool {
        if self.scroll_top == line {
            return false;
        }
        self.scroll_top = line;
        self.scroll.target = line as f32;
        true
    }
}

/// A view onto one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub(crate) view: ViewState,
    pub(crate) kind: FrameKind,
}

impl Frame {
    pub(crate) fn new(view: ViewState, kind: FrameKind) -> Self {
        Self { view, kind }
    }

    /// Kind-specific data.
    pub fn kind(&self) -> &FrameKind {
        &self.kind
    }

    /// Plain kind tag.
    pub fn view_kind(&self) -> ViewKind {
        self.kind.view_kind()
    }

    /// Returns `true` for prompt and search frames.
    pub fn is_transient(&self) -> bool {
        !matches!(self.kind, FrameKind::Content)
    }

    /// The bound buffer.
    pub fn buffer(&self) -> BufferId {
        self.view.buffer
    }

    /// Cursor byte offset.
    pub fn cursor(&self) -> usize {
        self.view.cursor
    }

    /// Selection anchor byte offset (meaningful while a selection is active).
    pub fn anchor(&self) -> usize {
        self.view.anchor
    }

    /// Active selection as an ordered byte range, if any.
    pub fn selection(&self) -> Option<Range<usize>> {
        if !self.view.selecting {
            return None;
        }
        let (a, b) = (self.view.anchor, self.view.cursor);
        Some(a.min(b)..a.max(b))
    }

    /// First visible line (target value).
    pub fn scroll_top(&self) -> usize {
        self.view.scroll_top
    }

    /// Interpolated scroll position in lines, for smooth scrolling.
    pub fn scroll_position(&self) -> f32 {
        self.view.scroll.current
    }

    /// Target geometry.
    pub fn geometry(&self) -> Rect {
        self.view.geometry.target
    }

    /// Interpolated geometry, for animated resizing.
    pub fn animated_geometry(&self) -> Rect {
        self.view.geometry.current
    }

    /// Returns `true` after an explicit user scroll, until the cursor moves again.
    pub fn is_scroll_locked(&self) -> bool {
        self.view.scroll_locked
    }

    /// Remembered column for consecutive vertical moves.
    pub fn preferred_column(&self) -> Option<usize> {
        self.view.preferred_column
    }

    /// The frame this transient frame was spawned from.
    pub fn parent(&self) -> Option<FrameId> {
        self.view.parent
    }

    /// Search state, for search frames.
    pub fn search(&self) -> Option<&SearchState> {
        match &self.kind {
            FrameKind::Search(state) => Some(state),
            _ => None,
        }
    }

    /// Prompt tag, for prompt frames.
    pub fn prompt_tag(&self) -> Option<&PromptTag> {
        match &self.kind {
            FrameKind::Prompt(state) => Some(&state.tag),
            _ => None,
        }
    }

    pub(crate) fn search_mut(&mut self) -> Option<&mut SearchState> {
        match &mut self.kind {
            FrameKind::Search(state) => Some(state),
            _ => None,
        }
    }
}

/// Everything a renderer needs to lay out and highlight one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// Frame handle.
    pub id: FrameId,
    /// Kind tag.
    pub kind: ViewKind,
    /// Bound buffer.
    pub buffer: BufferId,
    /// Cursor byte offset.
    pub cursor: usize,
    /// Active selection.
    pub selection: Option<Range<usize>>,
    /// First visible line.
    pub scroll_top: usize,
    /// Interpolated scroll position.
    pub scroll_position: f32,
    /// Target geometry.
    pub geometry: Rect,
    /// Interpolated geometry.
    pub animated_geometry: Rect,
    /// Whether this frame has input focus.
    pub focused: bool,
    /// Search status for search frames.
    pub search_status: Option<SearchStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_halves_along_axis() {
        let rect = Rect::new(0.0, 0.0, 80.0, 24.0);
        let (left, right) = rect.split(Axis::Horizontal);
        assert_eq!(left, Rect::new(0.0, 0.0, 40.0, 24.0));
        assert_eq!(right, Rect::new(40.0, 0.0, 40.0, 24.0));

        let (top, bottom) = rect.split(Axis::Vertical);
        assert_eq!(top, Rect::new(0.0, 0.0, 80.0, 12.0));
        assert_eq!(bottom, Rect::new(0.0, 12.0, 80.0, 12.0));
    }

    #[test]
    fn visible_rows_never_zero() {
        assert_eq!(Rect::new(0.0, 0.0, 10.0, 0.0).visible_rows(), 1);
        assert_eq!(Rect::new(0.0, 0.0, 10.0, 7.9).visible_rows(), 7);
    }

    #[test]
    fn animated_value_converges_and_snaps() {
        let mut value = Animated::new(0.0_f32);
        value.target = 10.0;
        assert!(value.step(0.5));
        assert_eq!(value.current, 5.0);
        while value.step(0.5) {}
        assert_eq!(value.current, 10.0);
        assert!(!value.step(0.5));
    }
}
