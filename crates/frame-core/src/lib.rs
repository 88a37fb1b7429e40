#![warn(missing_docs)]
//! Frame Core - Headless Multi-View Text Editing Kernel
//!
//! # Overview
//!
//! `frame-core` is the state kernel of a multi-view text editor: byte buffers, per-buffer undo
//! history, frames (views) with their own cursor/selection/scroll, and the registry that owns
//! them all. Rendering, input decoding and file I/O live in the host; the core exposes read
//! access for layout, a command surface for input, and a repaint request flag.
//!
//! # Core Features
//!
//! - **Contiguous UTF-8 Buffers**: chunked growth, clamped offsets, never splits a code point
//! - **Undo Ring**: bounded history with a redo cursor and typing coalescence
//! - **Multi-View**: any number of frames per buffer, kept consistent on every edit
//! - **Generational Handles**: stale frame/buffer handles are rejected, never aliased
//! - **Transient Frames**: prompts and incremental search spawned from a parent frame
//! - **Change Notifications**: subscriptions plus a repaint request flag
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface & Notifications          │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Navigation / Editing / Search Overlay      │  ← Frame Operations
//! ├─────────────────────────────────────────────┤
//! │  Frame Registry (slots, focus, refcounts)   │  ← Ownership
//! ├─────────────────────────────────────────────┤
//! │  Text Buffer + Undo Ring                    │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use frame_core::{Motion, Rect, Registry};
//!
//! let mut registry = Registry::new();
//! let buffer = registry.open_buffer("fn main() {}\n").unwrap();
//! let frame = registry.open_frame(buffer, Rect::new(0.0, 0.0, 80.0, 24.0)).unwrap();
//!
//! registry.move_cursor(frame, Motion::LineEnd).unwrap();
//! registry.insert_text(frame, " // entry").unwrap();
//! assert_eq!(
//!     registry.buffer(buffer).unwrap().as_str(),
//!     "fn main() {} // entry\n"
//! );
//!
//! registry.undo(frame).unwrap();
//! assert_eq!(registry.buffer(buffer).unwrap().as_str(), "fn main() {}\n");
//! assert_eq!(registry.frame(frame).unwrap().cursor(), 12);
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Text buffer with chunked growth
//! - [`undo`] - Undo ring and merge rule
//! - [`delta`] - Edit deltas and offset shifting
//! - [`frame`] - Frame kinds, view state and geometry
//! - [`registry`] - Frame/buffer ownership, focus order, transient frames
//! - [`navigation`] - Code-point and visual-column cursor movement
//! - [`editing`] - Insert/delete/clipboard/undo at a frame's cursor
//! - [`search`] - Search helpers and the incremental search overlay
//! - [`command`] - Unified command interface
//! - [`state`] - Change notifications
//! - [`config`] - Tunables loaded from TOML
//!
//! # Unicode Support
//!
//! - UTF-8 internal encoding, byte offsets throughout
//! - Cursor movement by code point
//! - CJK double-width characters and fixed-width tabs for vertical movement

pub mod buffer;
pub mod command;
pub mod config;
pub mod delta;
pub mod editing;
pub mod error;
pub mod frame;
pub mod navigation;
pub mod registry;
pub mod search;
pub mod state;
mod text;
pub mod undo;

pub use buffer::TextBuffer;
pub use command::{Command, CommandResult, CursorCommand, EditCommand, FrameCommand};
pub use config::CoreConfig;
pub use delta::TextDelta;
pub use error::{ConfigError, RegistryError, SearchError};
pub use frame::{
    Animated, Axis, Frame, FrameKind, FrameSnapshot, PromptState, PromptTag, Rect, SearchState,
    SearchStatus, ViewKind,
};
pub use navigation::Motion;
pub use registry::{BufferId, Confirmed, FrameId, Registry};
pub use search::{SearchMatch, SearchOptions};
pub use state::{ChangeCallback, ChangeEvent, ChangeKind};
pub use undo::{EditGroup, OpKind, UndoLog, UndoOp};
