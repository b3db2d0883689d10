//! Versioned persistence for ADAQ event records.
//!
//! The simulation loop fills one [`EventRecord`] per event and hands it to an
//! [`EventWriter`]; analysis reads the file back through an [`EventReader`].
//! Every stored record carries the schema version it was written with, and
//! readers refuse versions they do not know instead of guessing at the
//! layout.
//!
//! # Architecture
//!
//! ```text
//! EventRecord --visit_fields--> binary::encode_record --+
//!             \                                         +--> EventWriter --> file
//!              +--serde-------> json::encode_line ------+
//!
//! file --> EventReader --check_schema_version--> binary::decode_record / json::decode_line
//! ```
//!
//! # Modules
//!
//! - [`binary`] -- Little-endian payload codec and frame headers
//! - [`json`] -- JSON-lines codec with a version envelope
//! - [`format`] -- [`Format`] selector and the schema version gate
//! - [`writer`] / [`reader`] -- Streaming file access
//! - [`config`] -- YAML configuration
//! - [`error`] -- Shared error types
//!
//! [`EventRecord`]: adaq_event::EventRecord

pub mod binary;
pub mod config;
pub mod error;
pub mod format;
pub mod json;
pub mod reader;
pub mod writer;

// Re-export primary types for convenience.
pub use config::{OutputConfig, PersistConfig};
pub use error::{ConfigError, PersistError};
pub use format::{Format, check_schema_version};
pub use reader::EventReader;
pub use writer::EventWriter;
