//! JSON-lines encoding with a version envelope.
//!
//! Each record is one line:
//!
//! ```text
//! {"schema_version":1,"record":{"event_id":42,"run_id":7,...}}
//! ```
//!
//! Decoding reads `schema_version` first and only deserializes `record` once
//! the version is known to be supported.

use adaq_event::{EventRecord, FieldDescriptor, FieldVisitor, SCHEMA_VERSION, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::format::check_schema_version;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    schema_version: u32,
    record: &'a EventRecord,
}

#[derive(Deserialize)]
struct VersionProbe {
    schema_version: i64,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    #[allow(dead_code)]
    schema_version: u32,
    record: EventRecord,
}

/// Append one JSON line (with trailing newline) for `record` to `out`.
///
/// # Errors
///
/// - [`PersistError::NonFinite`] if any float field or timestamp is NaN or
///   infinite. Nothing is appended in that case.
/// - [`PersistError::Json`] if serialization fails.
pub fn encode_line(record: &EventRecord, out: &mut Vec<u8>) -> Result<(), PersistError> {
    record.visit_fields(&mut FiniteCheck)?;
    serde_json::to_writer(
        &mut *out,
        &EnvelopeRef {
            schema_version: SCHEMA_VERSION,
            record,
        },
    )?;
    out.push(b'\n');
    Ok(())
}

/// Decode one JSON line into a record.
///
/// # Errors
///
/// - [`PersistError::Json`] if the line is not a valid envelope.
/// - [`PersistError::UnsupportedVersion`] if the envelope's version is not
///   supported, including negative tags; the record body is not decoded.
pub fn decode_line(line: &str) -> Result<EventRecord, PersistError> {
    let probe: VersionProbe = serde_json::from_str(line)?;
    let Ok(version) = u32::try_from(probe.schema_version) else {
        return Err(PersistError::UnsupportedVersion {
            found: probe.schema_version,
            supported: SCHEMA_VERSION,
        });
    };
    check_schema_version(version)?;
    let envelope: Envelope = serde_json::from_str(line)?;
    Ok(envelope.record)
}

/// Rejects the first non-finite float.
struct FiniteCheck;

impl FiniteCheck {
    const fn check(field: FieldDescriptor, value: f64) -> Result<(), PersistError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(PersistError::NonFinite { field: field.name })
        }
    }
}

impl FieldVisitor for FiniteCheck {
    type Error = PersistError;

    fn visit_int(&mut self, _field: FieldDescriptor, _value: i32) -> Result<(), PersistError> {
        Ok(())
    }

    fn visit_float(&mut self, field: FieldDescriptor, value: f64) -> Result<(), PersistError> {
        Self::check(field, value)
    }

    fn visit_float_seq(
        &mut self,
        field: FieldDescriptor,
        values: &[f64],
    ) -> Result<(), PersistError> {
        values.iter().try_for_each(|&value| Self::check(field, value))
    }

    fn visit_vec3(&mut self, field: FieldDescriptor, value: Vector3) -> Result<(), PersistError> {
        value
            .to_array()
            .into_iter()
            .try_for_each(|component| Self::check(field, component))
    }
}
