//! Error types.
//!
//! The core clamps out-of-range offsets and treats exhausted history or a search miss as normal
//! outcomes, so the error surface is small: stale handles, allocation failure, bad search
//! patterns, and malformed configuration.

use crate::registry::{BufferId, FrameId};
use thiserror::Error;

/// Errors reported by [`crate::Registry`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The frame handle does not name a live frame (never opened, or already closed).
    #[error("frame {0:?} not found")]
    FrameNotFound(FrameId),
    /// The buffer handle does not name a live buffer.
    #[error("buffer {0:?} not found")]
    BufferNotFound(BufferId),
    /// The operation only applies to transient (prompt/search) frames.
    #[error("frame {0:?} is not a transient frame")]
    NotTransient(FrameId),
    /// Growing a slot array or buffer failed; the registry is unchanged.
    #[error("allocation failed while {0}")]
    Allocation(&'static str),
}

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provided regex pattern failed to compile.
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a [`crate::CoreConfig`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
