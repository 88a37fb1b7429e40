//! Command interface.
//!
//! Hosts translate input into [`Command`] values and hand them to [`Registry::execute`] together
//! with the target frame (usually [`Registry::focused`]). Each command maps onto one registry
//! operation; the result enum carries whatever that operation produced.
//!
//! # Example
//!
//! ```rust
//! use frame_core::{Command, CommandResult, CursorCommand, EditCommand, Motion, Rect, Registry};
//!
//! let mut registry = Registry::new();
//! let buffer = registry.open_buffer("world").unwrap();
//! let frame = registry.open_frame(buffer, Rect::new(0.0, 0.0, 80.0, 24.0)).unwrap();
//!
//! registry
//!     .execute(frame, Command::Edit(EditCommand::InsertText { text: "hello ".into() }))
//!     .unwrap();
//! let result = registry
//!     .execute(frame, Command::Cursor(CursorCommand::Move(Motion::LineEnd)))
//!     .unwrap();
//!
//! assert_eq!(result, CommandResult::Offset(11));
//! assert_eq!(registry.buffer(buffer).unwrap().as_str(), "hello world");
//! ```

use crate::delta::TextDelta;
use crate::error::RegistryError;
use crate::frame::{Axis, PromptTag, Rect, SearchStatus};
use crate::navigation::Motion;
use crate::registry::{BufferId, Confirmed, FrameId, Registry};
use tracing::debug;

/// Text editing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Type text at the cursor (replacing the selection).
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Delete a byte range as one undo step.
    DeleteRange {
        /// One end of the range.
        from: usize,
        /// The other end.
        to: usize,
    },
    /// Delete backward
    Backspace,
    /// Delete forward
    DeleteForward,
    /// Insert clipboard bytes at the cursor.
    Paste {
        /// Bytes from the host clipboard.
        bytes: Vec<u8>,
    },
    /// Copy the selection, then delete it.
    Cut,
    /// Undo
    Undo,
    /// Redo
    Redo,
}

/// Cursor and selection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Apply a motion.
    Move(Motion),
    /// Anchor a selection at the cursor.
    SetSelectionAnchor,
    /// Drop the selection.
    ClearSelection,
    /// Return the selected bytes.
    Copy,
}

/// Frame management commands.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameCommand {
    /// Open a new content frame on `buffer`.
    Open {
        /// Buffer to bind.
        buffer: BufferId,
        /// Initial geometry.
        geometry: Rect,
    },
    /// Close the target frame.
    Close,
    /// Split the target frame.
    Split(Axis),
    /// Focus the target frame.
    Focus,
    /// Resize or move the target frame.
    SetGeometry(Rect),
    /// Scroll the target frame by a number of lines (locks auto-scroll).
    Scroll(isize),
    /// Open a prompt spawned from the target frame.
    OpenPrompt(PromptTag),
    /// Open an incremental search over the target frame.
    OpenSearch,
    /// Jump the target search frame to the next match.
    AdvanceSearch,
    /// Confirm the target transient frame.
    Confirm,
    /// Cancel the target transient frame.
    Cancel,
}

/// Command enum
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Edit commands
    Edit(EditCommand),
    /// Cursor commands
    Cursor(CursorCommand),
    /// Frame commands
    Frame(FrameCommand),
}

/// Command result
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Success
    Success,
    /// The buffer changed (or `None` if the edit was a no-op).
    Edited(Option<TextDelta>),
    /// New cursor or scroll position.
    Offset(usize),
    /// A frame was created.
    Frame(FrameId),
    /// Bytes for the host clipboard (`None` without a selection).
    Bytes(Option<Vec<u8>>),
    /// Search status after a search command.
    Search(SearchStatus),
    /// A transient frame was confirmed.
    Confirmed(Confirmed),
}

impl Registry {
    /// Execute `command` against frame `target`.
    ///
    /// Every command other than an edit closes the target buffer's current undo run.
    pub fn execute(
        &mut self,
        target: FrameId,
        command: Command,
    ) -> Result<CommandResult, RegistryError> {
        debug!(target: "command", frame = target.index(), ?command, "execute");

        if !matches!(command, Command::Edit(_))
            && let Ok(frame) = self.frame(target)
        {
            let buffer = frame.buffer();
            self.buffer_mut(buffer)?.seal_undo_run();
        }

        match command {
            Command::Edit(command) => self.execute_edit(target, command),
            Command::Cursor(command) => self.execute_cursor(target, command),
            Command::Frame(command) => self.execute_frame(target, command),
        }
    }

    /// Execute commands in order, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        target: FrameId,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, RegistryError> {
        commands
            .into_iter()
            .map(|command| self.execute(target, command))
            .collect()
    }

    fn execute_edit(
        &mut self,
        target: FrameId,
        command: EditCommand,
    ) -> Result<CommandResult, RegistryError> {
        let delta = match command {
            EditCommand::InsertText { text } => self.insert_text(target, &text)?,
            EditCommand::DeleteRange { from, to } => self.delete_range(target, from, to)?,
            EditCommand::Backspace => self.backspace(target)?,
            EditCommand::DeleteForward => self.delete_forward(target)?,
            EditCommand::Paste { bytes } => self.paste(target, &bytes)?,
            EditCommand::Cut => return Ok(CommandResult::Bytes(self.cut_selection(target)?)),
            EditCommand::Undo => self.undo(target)?,
            EditCommand::Redo => self.redo(target)?,
        };
        Ok(CommandResult::Edited(delta))
    }

    fn execute_cursor(
        &mut self,
        target: FrameId,
        command: CursorCommand,
    ) -> Result<CommandResult, RegistryError> {
        match command {
            CursorCommand::Move(motion) => Ok(CommandResult::Offset(self.move_cursor(target, motion)?)),
            CursorCommand::SetSelectionAnchor => {
                self.set_selection_anchor(target)?;
                Ok(CommandResult::Success)
            }
            CursorCommand::ClearSelection => {
                self.clear_selection(target)?;
                Ok(CommandResult::Success)
            }
            CursorCommand::Copy => Ok(CommandResult::Bytes(self.copy_selection(target)?)),
        }
    }

    fn execute_frame(
        &mut self,
        target: FrameId,
        command: FrameCommand,
    ) -> Result<CommandResult, RegistryError> {
        match command {
            FrameCommand::Open { buffer, geometry } => {
                Ok(CommandResult::Frame(self.open_frame(buffer, geometry)?))
            }
            FrameCommand::Close => {
                self.close_frame(target)?;
                Ok(CommandResult::Success)
            }
            FrameCommand::Split(axis) => Ok(CommandResult::Frame(self.split(target, axis)?)),
            FrameCommand::Focus => {
                self.focus(target)?;
                Ok(CommandResult::Success)
            }
            FrameCommand::SetGeometry(geometry) => {
                self.set_geometry(target, geometry)?;
                Ok(CommandResult::Success)
            }
            FrameCommand::Scroll(lines) => Ok(CommandResult::Offset(self.scroll_by(target, lines)?)),
            FrameCommand::OpenPrompt(tag) => {
                Ok(CommandResult::Frame(self.open_prompt(target, tag)?))
            }
            FrameCommand::OpenSearch => Ok(CommandResult::Frame(self.open_search(target)?)),
            FrameCommand::AdvanceSearch => {
                Ok(CommandResult::Search(self.advance_search(target)?))
            }
            FrameCommand::Confirm => Ok(CommandResult::Confirmed(self.confirm(target)?)),
            FrameCommand::Cancel => {
                self.cancel(target)?;
                Ok(CommandResult::Success)
            }
        }
    }
}
