//! Change notifications.
//!
//! The registry exposes two ways for a renderer to learn that something changed:
//!
//! - a **repaint request flag**, raised by every buffer mutation, cursor/selection/scroll change
//!   and geometry change, and cleared by [`Registry::take_repaint_request`]
//! - **subscriptions**: callbacks receiving a [`ChangeEvent`] per change, for hosts that want to
//!   invalidate incrementally
//!
//! # Example
//!
//! ```rust
//! use frame_core::{ChangeKind, Rect, Registry};
//! use std::sync::{Arc, Mutex};
//!
//! let mut registry = Registry::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! registry.subscribe(move |event| sink.lock().unwrap().push(event.kind));
//!
//! let buffer = registry.open_buffer("hello").unwrap();
//! let frame = registry.open_frame(buffer, Rect::new(0.0, 0.0, 80.0, 24.0)).unwrap();
//! registry.insert_text(frame, "> ").unwrap();
//!
//! assert!(registry.take_repaint_request());
//! assert!(seen.lock().unwrap().contains(&ChangeKind::BufferModified));
//! ```

use crate::delta::TextDelta;
use crate::registry::{BufferId, FrameId, Registry};

/// Kind of change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Buffer content modified
    BufferModified,
    /// Cursor moved
    CursorMoved,
    /// Selection started, changed or cleared
    SelectionChanged,
    /// Scroll target changed
    ScrollChanged,
    /// Frame geometry changed
    GeometryChanged,
    /// Focus moved to another frame
    FocusChanged,
    /// A frame was opened
    FrameOpened,
    /// A frame was closed
    FrameClosed,
    /// A search frame's status or match changed
    SearchUpdated,
}

/// Change record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Change type
    pub kind: ChangeKind,
    /// Frame concerned, if any
    pub frame: Option<FrameId>,
    /// Buffer concerned, if any
    pub buffer: Option<BufferId>,
    /// Structured delta for buffer modifications
    pub delta: Option<TextDelta>,
}

impl ChangeEvent {
    /// Event about a frame.
    pub fn frame(kind: ChangeKind, frame: FrameId) -> Self {
        Self {
            kind,
            frame: Some(frame),
            buffer: None,
            delta: None,
        }
    }

    /// Event about a buffer modification.
    pub fn buffer_modified(buffer: BufferId, delta: TextDelta, origin: Option<FrameId>) -> Self {
        Self {
            kind: ChangeKind::BufferModified,
            frame: origin,
            buffer: Some(buffer),
            delta: Some(delta),
        }
    }
}

/// Change callback function type
pub type ChangeCallback = Box<dyn FnMut(&ChangeEvent) + Send>;

impl Registry {
    /// Register a callback invoked for every subsequent change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Drop every subscription.
    pub fn clear_subscriptions(&mut self) {
        self.callbacks.clear();
    }

    /// Returns `true` if something changed since the last [`take_repaint_request`](Self::take_repaint_request).
    pub fn needs_repaint(&self) -> bool {
        self.repaint
    }

    /// Read and clear the repaint request flag.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint)
    }

    /// Raise the repaint flag and notify subscribers.
    pub(crate) fn emit(&mut self, event: ChangeEvent) {
        self.repaint = true;
        for callback in &mut self.callbacks {
            callback(&event);
        }
    }
}
