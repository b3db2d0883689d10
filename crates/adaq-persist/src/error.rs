//! Error types for the persistence layer.
//!
//! All encode, decode and stream failures are reported through
//! [`PersistError`]. Configuration loading has its own [`ConfigError`].

/// Errors that can occur while encoding, decoding, or streaming records.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Reading from or writing to the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON record could not be serialized or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON line is not valid UTF-8.
    #[error("record line is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The stream does not start with the event-file magic bytes.
    #[error("not an event file: bad magic bytes")]
    BadMagic,

    /// The record was written with a schema version this reader cannot decode.
    #[error("unsupported schema version {found} (this reader supports 1..={supported})")]
    UnsupportedVersion {
        /// Version tag found on the record. JSON lines may carry tags outside
        /// the `u32` range, so this is wider than the binary frame field.
        found: i64,
        /// Highest version this build understands.
        supported: u32,
    },

    /// The payload ended before the named field was complete.
    #[error("record truncated while reading {field}")]
    Truncated {
        /// Field (or frame part) being read.
        field: &'static str,
    },

    /// The payload carried bytes past the last field of the schema.
    #[error("record has {extra} unexpected trailing bytes")]
    TrailingBytes {
        /// Number of unread bytes.
        extra: usize,
    },

    /// A timestamp sequence is too long for the 32-bit length prefix.
    #[error("{field} has {len} entries, more than a record can hold")]
    SequenceTooLong {
        /// Sequence field name.
        field: &'static str,
        /// Actual length.
        len: usize,
    },

    /// A float field holds NaN or an infinity, which JSON cannot represent.
    #[error("{field} is not finite and cannot be written as JSON")]
    NonFinite {
        /// Field holding the non-finite value.
        field: &'static str,
    },

    /// An encoded record is too large for the 32-bit frame length.
    #[error("encoded record of {len} bytes exceeds the frame limit")]
    FrameTooLarge {
        /// Encoded payload length.
        len: usize,
    },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A format name did not match any record format.
    #[error("unknown record format {0:?} (expected \"binary\" or \"json\")")]
    InvalidFormat(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
