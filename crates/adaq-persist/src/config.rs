//! Configuration for event-file output.
//!
//! The configuration is a small YAML document, typically embedded in the
//! simulation's own config file:
//!
//! ```yaml
//! output:
//!   path: run-0007.adaq
//!   format: binary      # or "json"
//!   buffer_bytes: 65536
//! ```
//!
//! Every field has a default, so an empty document is valid.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, PersistError};
use crate::format::Format;
use crate::reader::EventReader;
use crate::writer::EventWriter;

/// Top-level persistence configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersistConfig {
    /// Event file output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where and how event records are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Path of the event file.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Record encoding.
    #[serde(default)]
    pub format: Format,

    /// Capacity of the file read/write buffer in bytes.
    #[serde(default = "default_buffer_bytes")]
    pub buffer_bytes: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            format: Format::default(),
            buffer_bytes: default_buffer_bytes(),
        }
    }
}

impl PersistConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document has no map to deserialize into.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Create (or truncate) the configured event file and open a writer on it.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the file cannot be created or the
    /// stream header cannot be written.
    pub fn create_writer(&self) -> Result<EventWriter<BufWriter<File>>, PersistError> {
        let file = File::create(&self.output.path)?;
        tracing::info!(
            path = %self.output.path.display(),
            format = %self.output.format,
            "Writing events"
        );
        EventWriter::new(
            BufWriter::with_capacity(self.output.buffer_bytes, file),
            self.output.format,
        )
    }

    /// Open the configured event file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the file cannot be opened, or
    /// [`PersistError::BadMagic`] if a binary file has the wrong header.
    pub fn open_reader(&self) -> Result<EventReader<BufReader<File>>, PersistError> {
        let file = File::open(&self.output.path)?;
        tracing::info!(
            path = %self.output.path.display(),
            format = %self.output.format,
            "Reading events"
        );
        EventReader::new(
            BufReader::with_capacity(self.output.buffer_bytes, file),
            self.output.format,
        )
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_path() -> PathBuf {
    PathBuf::from("events.adaq")
}

const fn default_buffer_bytes() -> usize {
    65_536
}
