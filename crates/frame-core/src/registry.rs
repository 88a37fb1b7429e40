//! Frame registry: owns every buffer and frame.
//!
//! Buffers and frames live in index-addressed slot arrays. Closed slots are reused before the
//! arrays grow, and handles ([`FrameId`], [`BufferId`]) carry a generation so a handle to a
//! closed slot is rejected instead of silently aliasing whatever reused it.
//!
//! The registry is the only place reference counts change: binding a frame to a buffer
//! increments the buffer's count, closing the frame decrements it, and a buffer whose count
//! drops to zero becomes reusable.
//!
//! Focus is tracked as a permutation of slot indices, most recently focused first. Dead slots
//! keep their place in the permutation until the slot is reused. Input goes to the head of the
//! order; [`Registry::paint_order`] is the reverse, so the focused frame paints last.
//!
//! # Example
//!
//! ```rust
//! use frame_core::{Axis, Rect, Registry};
//!
//! let mut registry = Registry::new();
//! let buffer = registry.open_buffer("0123456789\n").unwrap();
//! let left = registry.open_frame(buffer, Rect::new(0.0, 0.0, 80.0, 24.0)).unwrap();
//!
//! // Split pane: a sibling view into the same buffer.
//! let right = registry.split(left, Axis::Horizontal).unwrap();
//! assert_eq!(registry.buffer_refcount(buffer).unwrap(), 2);
//! assert_eq!(registry.focused(), Some(right));
//!
//! registry.insert_text(right, "X").unwrap();
//! assert_eq!(registry.buffer(buffer).unwrap().as_str(), "X0123456789\n");
//! ```

use crate::buffer::TextBuffer;
use crate::config::CoreConfig;
use crate::delta::TextDelta;
use crate::error::RegistryError;
use crate::frame::{
    Axis, Frame, FrameKind, FrameSnapshot, PromptState, PromptTag, Rect, SearchState,
    SearchStatus, ViewState,
};
use crate::search::{SearchMatch, SearchOptions};
use crate::state::{ChangeCallback, ChangeEvent, ChangeKind};
use tracing::{debug, error, trace};

/// Handle to a frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId {
    index: usize,
    generation: u32,
}

impl FrameId {
    fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of the frame.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Handle to a buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId {
    index: usize,
    generation: u32,
}

impl BufferId {
    fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of the buffer.
    pub fn index(self) -> usize {
        self.index
    }
}

/// What a transient frame produced when confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmed {
    /// A prompt was confirmed; the caller interprets `text` according to `tag`.
    Prompt {
        /// Frame focus returned to.
        parent: FrameId,
        /// Tag supplied when the prompt was opened.
        tag: PromptTag,
        /// The entered text.
        text: String,
    },
    /// A search was confirmed; the parent's cursor now sits on `found`, the last match the
    /// search hit (if any), even when later updates missed.
    Search {
        /// Frame focus returned to.
        parent: FrameId,
        /// The committed match.
        found: Option<SearchMatch>,
    },
}

#[derive(Debug)]
struct FrameSlot {
    generation: u32,
    frame: Option<Frame>,
}

#[derive(Debug)]
struct BufferSlot {
    generation: u32,
    taken: bool,
    refcount: usize,
    buffer: TextBuffer,
}

/// Owner of all frames and buffers.
pub struct Registry {
    pub(crate) config: CoreConfig,
    frames: Vec<FrameSlot>,
    buffers: Vec<BufferSlot>,
    focus_order: Vec<usize>,
    focused: Option<FrameId>,
    pub(crate) repaint: bool,
    pub(crate) callbacks: Vec<ChangeCallback>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("frame_count", &self.frame_count())
            .field("buffer_count", &self.buffer_count())
            .field("focused", &self.focused)
            .field("repaint", &self.repaint)
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Make room for one more slot, doubling the array's capacity when it is full.
fn reserve_slot<T>(slots: &mut Vec<T>, what: &'static str) -> Result<(), RegistryError> {
    if slots.len() < slots.capacity() {
        return Ok(());
    }
    let additional = slots.capacity().max(4);
    slots.try_reserve_exact(additional).map_err(|err| {
        error!(target: "registry", %err, what, "slot_growth_failed");
        RegistryError::Allocation(what)
    })
}

impl Registry {
    /// Create an empty registry with default tunables.
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Create an empty registry.
    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            config: config.normalized(),
            frames: Vec::new(),
            buffers: Vec::new(),
            focus_order: Vec::new(),
            focused: None,
            repaint: false,
            callbacks: Vec::new(),
        }
    }

    /// Active tunables.
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    // ----- buffers -----

    /// Create a buffer holding `text` (loaded through the raw path, so it cannot be undone).
    ///
    /// The buffer starts unreferenced; bind it with [`open_frame`](Self::open_frame) or release
    /// it with [`release_buffer`](Self::release_buffer).
    pub fn open_buffer(&mut self, text: &str) -> Result<BufferId, RegistryError> {
        let id = self.alloc_buffer()?;
        if !text.is_empty() && self.buffers[id.index].buffer.insert_raw(0, text).is_none() {
            self.free_buffer_slot(id.index);
            return Err(RegistryError::Allocation("loading buffer content"));
        }
        debug!(target: "registry", buffer = id.index, len = text.len(), "buffer_open");
        Ok(id)
    }

    /// Release a buffer nobody is bound to. Returns `false` if frames still reference it.
    pub fn release_buffer(&mut self, id: BufferId) -> Result<bool, RegistryError> {
        let refcount = self.buffer_slot(id)?.refcount;
        if refcount > 0 {
            return Ok(false);
        }
        self.free_buffer_slot(id.index);
        Ok(true)
    }

    /// Read access to a buffer.
    pub fn buffer(&self, id: BufferId) -> Result<&TextBuffer, RegistryError> {
        self.buffer_slot(id).map(|slot| &slot.buffer)
    }

    /// Number of frames bound to a buffer.
    pub fn buffer_refcount(&self, id: BufferId) -> Result<usize, RegistryError> {
        self.buffer_slot(id).map(|slot| slot.refcount)
    }

    /// Number of live (taken) buffer slots.
    pub fn buffer_count(&self) -> usize {
        self.buffers.iter().filter(|slot| slot.taken).count()
    }

    /// The buffer a frame is bound to.
    pub fn buffer_of(&self, frame: FrameId) -> Result<&TextBuffer, RegistryError> {
        let buffer = self.frame(frame)?.view.buffer;
        self.buffer(buffer)
    }

    /// Append `text` at the end of a buffer without recording undo history.
    ///
    /// Meant for system writes such as log output; user-facing edits go through the frame
    /// editing operations.
    pub fn append_output(
        &mut self,
        id: BufferId,
        text: &str,
    ) -> Result<Option<TextDelta>, RegistryError> {
        let buffer = self.buffer_mut(id)?;
        let end = buffer.len();
        let delta = buffer.insert_raw(end, text);
        if let Some(delta) = delta {
            self.apply_delta(id, delta, None);
        }
        Ok(delta)
    }

    // ----- frames -----

    /// Bind a new content frame to `buffer` and focus it.
    pub fn open_frame(&mut self, buffer: BufferId, geometry: Rect) -> Result<FrameId, RegistryError> {
        self.buffer_slot(buffer)?;
        let frame = Frame::new(ViewState::new(buffer, geometry, None), FrameKind::Content);
        let id = self.bind_frame(frame)?;
        debug!(target: "registry", frame = id.index, buffer = buffer.index, "frame_open");
        Ok(id)
    }

    /// Close a frame, its transient children, and release its buffer reference.
    pub fn close_frame(&mut self, id: FrameId) -> Result<(), RegistryError> {
        self.frame(id)?;

        let children: Vec<FrameId> = self
            .frame_ids()
            .filter(|child| {
                self.frame(*child)
                    .is_ok_and(|frame| frame.view.parent == Some(id))
            })
            .collect();
        for child in children {
            self.close_frame(child)?;
        }

        let slot = &mut self.frames[id.index];
        let Some(frame) = slot.frame.take() else {
            return Err(RegistryError::FrameNotFound(id));
        };
        slot.generation = slot.generation.wrapping_add(1);

        let buffer = frame.view.buffer;
        if let Some(buffer_slot) = self.buffers.get_mut(buffer.index) {
            buffer_slot.refcount = buffer_slot.refcount.saturating_sub(1);
            if buffer_slot.refcount == 0 {
                self.free_buffer_slot(buffer.index);
            }
        }
        debug!(target: "registry", frame = id.index, buffer = buffer.index, "frame_close");

        if self.focused == Some(id) {
            let next = frame
                .view
                .parent
                .filter(|parent| self.frame(*parent).is_ok())
                .or_else(|| self.focus_order().first().copied());
            self.focused = None;
            if let Some(next) = next {
                self.focus(next)?;
            }
        }

        self.emit(ChangeEvent::frame(ChangeKind::FrameClosed, id));
        Ok(())
    }

    /// Move `id` to the front of the focus order; other frames keep their relative order.
    pub fn focus(&mut self, id: FrameId) -> Result<(), RegistryError> {
        self.frame(id)?;
        let mut changed = false;
        if let Some(position) = self.focus_order.iter().position(|&i| i == id.index)
            && position > 0
        {
            self.focus_order[..=position].rotate_right(1);
            changed = true;
        }
        if self.focused != Some(id) {
            self.focused = Some(id);
            changed = true;
            debug!(target: "registry", frame = id.index, "focus");
        }
        if changed {
            self.emit(ChangeEvent::frame(ChangeKind::FocusChanged, id));
        }
        Ok(())
    }

    /// The frame receiving input.
    pub fn focused(&self) -> Option<FrameId> {
        self.focused
    }

    /// Live frames, most recently focused first.
    pub fn focus_order(&self) -> Vec<FrameId> {
        self.focus_order
            .iter()
            .filter_map(|&index| self.live_id(index))
            .collect()
    }

    /// Live frames in paint order: least recently focused first, focused frame last.
    pub fn paint_order(&self) -> Vec<FrameId> {
        let mut order = self.focus_order();
        order.reverse();
        order
    }

    /// Raw focus permutation over every slot index ever allocated (live and dead).
    pub fn focus_slots(&self) -> &[usize] {
        &self.focus_order
    }

    /// Read access to a frame.
    pub fn frame(&self, id: FrameId) -> Result<&Frame, RegistryError> {
        self.frames
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_ref())
            .ok_or(RegistryError::FrameNotFound(id))
    }

    /// Number of live frames.
    pub fn frame_count(&self) -> usize {
        self.frames.iter().filter(|slot| slot.frame.is_some()).count()
    }

    /// Handles of all live frames, in slot order.
    pub fn frame_ids(&self) -> impl Iterator<Item = FrameId> + '_ {
        (0..self.frames.len()).filter_map(|index| self.live_id(index))
    }

    /// Layout/highlighting view of a frame.
    pub fn snapshot(&self, id: FrameId) -> Result<FrameSnapshot, RegistryError> {
        let frame = self.frame(id)?;
        Ok(FrameSnapshot {
            id,
            kind: frame.view_kind(),
            buffer: frame.view.buffer,
            cursor: frame.view.cursor,
            selection: frame.selection(),
            scroll_top: frame.view.scroll_top,
            scroll_position: frame.view.scroll.current,
            geometry: frame.view.geometry.target,
            animated_geometry: frame.view.geometry.current,
            focused: self.focused == Some(id),
            search_status: frame.search().map(|state| state.status),
        })
    }

    /// Halve `id` along `axis` and open a sibling on the freed half, sharing the buffer.
    ///
    /// The sibling starts at the same cursor and scroll position and receives focus.
    pub fn split(&mut self, id: FrameId, axis: Axis) -> Result<FrameId, RegistryError> {
        let original = self.frame(id)?;
        let (kept, freed) = original.view.geometry.target.split(axis);
        let mut view = ViewState::new(original.view.buffer, freed, None);
        view.cursor = original.view.cursor;
        view.set_scroll_top(original.view.scroll_top);
        view.scroll.snap();

        let sibling = self.bind_frame(Frame::new(view, FrameKind::Content))?;
        self.frame_mut(id)?.view.geometry.target = kept;
        debug!(target: "registry", frame = id.index, sibling = sibling.index, ?axis, "split");
        self.emit(ChangeEvent::frame(ChangeKind::GeometryChanged, id));
        Ok(sibling)
    }

    /// Move or resize a frame.
    pub fn set_geometry(&mut self, id: FrameId, geometry: Rect) -> Result<(), RegistryError> {
        let frame = self.frame_mut(id)?;
        if frame.view.geometry.target == geometry {
            return Ok(());
        }
        frame.view.geometry.target = geometry;
        self.emit(ChangeEvent::frame(ChangeKind::GeometryChanged, id));
        self.ensure_cursor_visible(id)?;
        Ok(())
    }

    /// Explicit user scroll by `lines`; locks out auto-scroll until the cursor moves.
    pub fn scroll_by(&mut self, id: FrameId, lines: isize) -> Result<usize, RegistryError> {
        let top = self.frame(id)?.view.scroll_top;
        self.scroll_to(id, top.saturating_add_signed(lines))
    }

    /// Explicit user scroll to `line` (clamped to the buffer); locks out auto-scroll.
    pub fn scroll_to(&mut self, id: FrameId, line: usize) -> Result<usize, RegistryError> {
        let last_line = self.buffer_of(id)?.line_count().saturating_sub(1);
        let line = line.min(last_line);
        let frame = self.frame_mut(id)?;
        frame.view.scroll_locked = true;
        if frame.view.set_scroll_top(line) {
            self.emit(ChangeEvent::frame(ChangeKind::ScrollChanged, id));
        }
        Ok(line)
    }

    /// Advance every animated scroll/geometry value a fraction `rate` toward its target.
    /// Returns `true` while anything is still moving.
    pub fn animate(&mut self, rate: f32) -> bool {
        let mut moving = false;
        for frame in self.frames.iter_mut().filter_map(|slot| slot.frame.as_mut()) {
            moving |= frame.view.scroll.step(rate);
            moving |= frame.view.geometry.step(rate);
        }
        if moving {
            self.repaint = true;
        }
        moving
    }

    // ----- transient frames -----

    /// Open a prompt frame on a fresh empty buffer, spawned from `parent`.
    pub fn open_prompt(&mut self, parent: FrameId, tag: PromptTag) -> Result<FrameId, RegistryError> {
        let kind = FrameKind::Prompt(PromptState { tag });
        self.open_transient(parent, kind)
    }

    /// Open an incremental search frame over `parent`'s buffer with default options.
    pub fn open_search(&mut self, parent: FrameId) -> Result<FrameId, RegistryError> {
        self.open_search_with(parent, SearchOptions::default())
    }

    /// Open an incremental search frame over `parent`'s buffer.
    pub fn open_search_with(
        &mut self,
        parent: FrameId,
        options: SearchOptions,
    ) -> Result<FrameId, RegistryError> {
        let parent_frame = self.frame(parent)?;
        let kind = FrameKind::Search(SearchState {
            status: SearchStatus::NotFound,
            current: None,
            last_found: None,
            origin: parent_frame.view.cursor,
            parent_scroll_top: parent_frame.view.scroll_top,
            options,
        });
        self.open_transient(parent, kind)
    }

    /// Confirm a transient frame: close it, return focus to its parent, and report the result.
    pub fn confirm(&mut self, id: FrameId) -> Result<Confirmed, RegistryError> {
        let frame = self.frame(id)?;
        let parent = frame.view.parent.ok_or(RegistryError::NotTransient(id))?;
        let confirmed = match &frame.kind {
            FrameKind::Content => return Err(RegistryError::NotTransient(id)),
            FrameKind::Prompt(state) => Confirmed::Prompt {
                parent,
                tag: state.tag.clone(),
                text: self.buffer_of(id)?.as_str().to_string(),
            },
            FrameKind::Search(state) => Confirmed::Search {
                parent,
                found: state.last_found,
            },
        };

        if let Confirmed::Search {
            found: Some(found), ..
        } = &confirmed
        {
            let start = self.buffer_of(parent)?.clamp_offset(found.start);
            let view = &mut self.frame_mut(parent)?.view;
            view.cursor = start;
            view.selecting = false;
            view.preferred_column = None;
            self.emit(ChangeEvent::frame(ChangeKind::CursorMoved, parent));
        }

        debug!(target: "registry", frame = id.index, parent = parent.index, "transient_confirm");
        self.close_frame(id)?;
        self.focus(parent)?;
        Ok(confirmed)
    }

    /// Cancel a transient frame: close it and return focus to its parent.
    ///
    /// A cancelled search restores the parent's scroll position.
    pub fn cancel(&mut self, id: FrameId) -> Result<(), RegistryError> {
        let frame = self.frame(id)?;
        let parent = frame.view.parent.ok_or(RegistryError::NotTransient(id))?;
        let restore_scroll = frame.search().map(|state| state.parent_scroll_top);

        if let Some(top) = restore_scroll
            && self.frame_mut(parent)?.view.set_scroll_top(top)
        {
            self.emit(ChangeEvent::frame(ChangeKind::ScrollChanged, parent));
        }

        debug!(target: "registry", frame = id.index, parent = parent.index, "transient_cancel");
        self.close_frame(id)?;
        self.focus(parent)?;
        Ok(())
    }

    fn open_transient(&mut self, parent: FrameId, kind: FrameKind) -> Result<FrameId, RegistryError> {
        let geometry = self.frame(parent)?.view.geometry.target.bottom_strip();
        let buffer = self.alloc_buffer()?;
        let frame = Frame::new(ViewState::new(buffer, geometry, Some(parent)), kind);
        match self.bind_frame(frame) {
            Ok(id) => {
                debug!(target: "registry", frame = id.index, parent = parent.index, "transient_open");
                Ok(id)
            }
            Err(err) => {
                self.free_buffer_slot(buffer.index);
                Err(err)
            }
        }
    }

    // ----- crate-internal plumbing -----

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> Result<&mut Frame, RegistryError> {
        self.frames
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.frame.as_mut())
            .ok_or(RegistryError::FrameNotFound(id))
    }

    pub(crate) fn buffer_mut(&mut self, id: BufferId) -> Result<&mut TextBuffer, RegistryError> {
        self.buffers
            .get_mut(id.index)
            .filter(|slot| slot.taken && slot.generation == id.generation)
            .map(|slot| &mut slot.buffer)
            .ok_or(RegistryError::BufferNotFound(id))
    }

    /// Shift every frame bound to `buffer` across `delta`, then re-run auto-scroll.
    ///
    /// The `origin` frame (the one that issued the edit, or undo/redo) has its cursor placed at
    /// the end of the inserted text, or at the deletion point, and its selection cleared.
    pub(crate) fn apply_delta(&mut self, buffer: BufferId, delta: TextDelta, origin: Option<FrameId>) {
        let mut bound: Vec<FrameId> = Vec::new();
        for (index, slot) in self.frames.iter_mut().enumerate() {
            let Some(frame) = slot.frame.as_mut() else {
                continue;
            };
            let id = FrameId::new(index, slot.generation);
            let view = &mut frame.view;
            if view.buffer == buffer {
                if origin == Some(id) {
                    view.cursor = delta.start + delta.inserted;
                    view.selecting = false;
                    view.preferred_column = None;
                    view.scroll_locked = false;
                } else {
                    view.cursor = delta.shift_offset(view.cursor);
                    view.anchor = delta.shift_offset(view.anchor);
                }
                bound.push(id);
            }
        }
        trace!(target: "registry", buffer = buffer.index, frames = bound.len(), start = delta.start, deleted = delta.deleted, inserted = delta.inserted, "delta_applied");
        self.emit(ChangeEvent::buffer_modified(buffer, delta, origin));

        let mut searches: Vec<FrameId> = Vec::new();
        for id in self.frame_ids() {
            let Ok(frame) = self.frame(id) else { continue };
            if frame.view.parent.is_some_and(|parent| bound.contains(&parent))
                && frame.search().is_some()
            {
                searches.push(id);
            }
        }

        for id in bound {
            if let Err(err) = self.ensure_cursor_visible(id) {
                error!(target: "registry", %err, frame = id.index, "auto_scroll_failed");
            }
        }
        for id in searches {
            if let Some(state) = self.frame_mut(id).ok().and_then(Frame::search_mut) {
                state.origin = delta.shift_offset(state.origin);
                state.last_found = state.last_found.map(|m| SearchMatch {
                    start: delta.shift_offset(m.start),
                    end: delta.shift_offset(m.end),
                });
            }
            if let Err(err) = self.update_search(id) {
                error!(target: "registry", %err, frame = id.index, "search_refresh_failed");
            }
        }
    }

    /// Scroll just enough to bring the cursor back into the visible rows (unless scroll-locked).
    pub(crate) fn ensure_cursor_visible(&mut self, id: FrameId) -> Result<bool, RegistryError> {
        let frame = self.frame(id)?;
        if frame.view.scroll_locked {
            return Ok(false);
        }
        let rows = frame.view.geometry.target.visible_rows();
        let top = frame.view.scroll_top;
        let line = self.buffer(frame.view.buffer)?.line_of_offset(frame.view.cursor);
        let margin = self.config.scroll_margin.min(rows.saturating_sub(1) / 2);

        let new_top = if line < top + margin {
            line.saturating_sub(margin)
        } else if line + margin >= top + rows {
            line + margin + 1 - rows
        } else {
            top
        };

        let changed = self.frame_mut(id)?.view.set_scroll_top(new_top);
        if changed {
            self.emit(ChangeEvent::frame(ChangeKind::ScrollChanged, id));
        }
        Ok(changed)
    }

    /// Scroll so `line` sits in the middle of the frame.
    pub(crate) fn center_on_line(&mut self, id: FrameId, line: usize) -> Result<bool, RegistryError> {
        let view = &mut self.frame_mut(id)?.view;
        let rows = view.geometry.target.visible_rows();
        let changed = view.set_scroll_top(line.saturating_sub(rows / 2));
        if changed {
            self.emit(ChangeEvent::frame(ChangeKind::ScrollChanged, id));
        }
        Ok(changed)
    }

    fn buffer_slot(&self, id: BufferId) -> Result<&BufferSlot, RegistryError> {
        self.buffers
            .get(id.index)
            .filter(|slot| slot.taken && slot.generation == id.generation)
            .ok_or(RegistryError::BufferNotFound(id))
    }

    fn live_id(&self, index: usize) -> Option<FrameId> {
        let slot = self.frames.get(index)?;
        slot.frame
            .as_ref()
            .map(|_| FrameId::new(index, slot.generation))
    }

    fn alloc_buffer(&mut self) -> Result<BufferId, RegistryError> {
        let fresh = TextBuffer::new(self.config.text_chunk_size, self.config.undo_capacity);
        if let Some(index) = self.buffers.iter().position(|slot| !slot.taken) {
            let slot = &mut self.buffers[index];
            slot.taken = true;
            slot.refcount = 0;
            slot.buffer = fresh;
            return Ok(BufferId::new(index, slot.generation));
        }
        reserve_slot(&mut self.buffers, "growing the buffer table")?;
        let index = self.buffers.len();
        self.buffers.push(BufferSlot {
            generation: 0,
            taken: true,
            refcount: 0,
            buffer: fresh,
        });
        Ok(BufferId::new(index, 0))
    }

    fn free_buffer_slot(&mut self, index: usize) {
        if let Some(slot) = self.buffers.get_mut(index) {
            slot.taken = false;
            slot.refcount = 0;
            slot.generation = slot.generation.wrapping_add(1);
            debug!(target: "registry", buffer = index, "buffer_reclaimable");
        }
    }

    /// Store `frame` in a free slot (or a new one), count its buffer reference, and focus it.
    fn bind_frame(&mut self, frame: Frame) -> Result<FrameId, RegistryError> {
        let buffer = frame.view.buffer;
        let id = match self.frames.iter().position(|slot| slot.frame.is_none()) {
            Some(index) => {
                let slot = &mut self.frames[index];
                slot.frame = Some(frame);
                FrameId::new(index, slot.generation)
            }
            None => {
                reserve_slot(&mut self.frames, "growing the frame table")?;
                reserve_slot(&mut self.focus_order, "growing the focus order")?;
                let index = self.frames.len();
                self.frames.push(FrameSlot {
                    generation: 0,
                    frame: Some(frame),
                });
                self.focus_order.push(index);
                FrameId::new(index, 0)
            }
        };
        if let Some(slot) = self.buffers.get_mut(buffer.index) {
            slot.refcount += 1;
        }
        self.emit(ChangeEvent::frame(ChangeKind::FrameOpened, id));
        self.focus(id)?;
        Ok(id)
    }
}
