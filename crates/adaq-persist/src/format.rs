//! Record encodings and the schema version gate.

use core::str::FromStr;

use adaq_event::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PersistError};

/// On-disk encoding of an event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Length-prefixed little-endian frames behind an 8-byte magic header.
    #[default]
    Binary,
    /// One JSON envelope per line.
    Json,
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidFormat(other.to_owned())),
        }
    }
}

impl core::fmt::Display for Format {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Check that a record's version tag is one this build can decode.
///
/// Accepts `1..=SCHEMA_VERSION`. Version 0 was never written and anything
/// newer may have a different field layout, so both are rejected before any
/// field is read.
///
/// # Errors
///
/// Returns [`PersistError::UnsupportedVersion`] for any other tag.
pub fn check_schema_version(found: u32) -> Result<(), PersistError> {
    if found == 0 || found > SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: i64::from(found),
            supported: SCHEMA_VERSION,
        });
    }
    Ok(())
}
