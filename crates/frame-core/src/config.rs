//! Core tunables.
//!
//! The host owns configuration files; the core only parses a TOML string it is handed
//! (see [`CoreConfig::from_toml_str`]). Every field has a default so partial documents are fine,
//! and unknown keys are ignored so hosts can keep their own sections in the same file.
//!
//! ```toml
//! tab_width = 4
//! text_chunk_size = 512
//! undo_capacity = 1000
//! scroll_margin = 2
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use tracing::warn;

/// Default visual width of a tab character, in columns.
pub const DEFAULT_TAB_WIDTH: usize = 8;
/// Default growth granularity of text buffer storage, in bytes.
pub const DEFAULT_TEXT_CHUNK_SIZE: usize = 256;
/// Default number of entries kept in each buffer's undo ring.
pub const DEFAULT_UNDO_CAPACITY: usize = 256;

/// Tunables shared by every buffer and frame of a [`crate::Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Visual width of `'\t'` used by vertical navigation.
    pub tab_width: usize,
    /// Buffer storage grows in multiples of this many bytes.
    pub text_chunk_size: usize,
    /// Maximum number of undo entries per buffer; the oldest entry is evicted beyond this.
    pub undo_capacity: usize,
    /// Rows kept between the cursor and the frame edge when auto-scrolling.
    pub scroll_margin: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            text_chunk_size: DEFAULT_TEXT_CHUNK_SIZE,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            scroll_margin: 0,
        }
    }
}

impl CoreConfig {
    /// Parse a TOML document and normalize the result.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let parsed: CoreConfig = toml::from_str(source)?;
        Ok(parsed.normalized())
    }

    /// Parse a TOML document, falling back to defaults (with a warning) when it is malformed.
    pub fn from_toml_str_or_default(source: &str) -> Self {
        match Self::from_toml_str(source) {
            Ok(config) => config,
            Err(err) => {
                warn!(target: "config", error = %err, "config_parse_failed_using_defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would make the core misbehave (zero widths or capacities) to 1.
    pub fn normalized(mut self) -> Self {
        for (name, value) in [
            ("tab_width", &mut self.tab_width),
            ("text_chunk_size", &mut self.text_chunk_size),
            ("undo_capacity", &mut self.undo_capacity),
        ] {
            if *value == 0 {
                warn!(target: "config", field = name, "config_value_clamped_to_one");
                *value = 1;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, CoreConfig::default());
        assert_eq!(cfg.tab_width, 8);
        assert_eq!(cfg.text_chunk_size, 256);
    }

    #[test]
    fn parses_partial_document_and_ignores_unknown_keys() {
        let cfg =
            CoreConfig::from_toml_str("tab_width = 4\nundo_capacity = 10\n[theme]\nname = \"x\"\n")
                .unwrap();
        assert_eq!(cfg.tab_width, 4);
        assert_eq!(cfg.undo_capacity, 10);
        assert_eq!(cfg.text_chunk_size, DEFAULT_TEXT_CHUNK_SIZE);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(CoreConfig::from_toml_str("tab_width = \"wide\"").is_err());
        assert_eq!(
            CoreConfig::from_toml_str_or_default("tab_width = ["),
            CoreConfig::default()
        );
    }

    #[test]
    fn zero_values_are_clamped_and_logged() {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            CoreConfig::from_toml_str("tab_width = 0\ntext_chunk_size = 0\n").unwrap()
        });

        assert_eq!(cfg.tab_width, 1);
        assert_eq!(cfg.text_chunk_size, 1);
        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_value_clamped_to_one"));
        assert!(log_output.contains("tab_width"));
    }
}
