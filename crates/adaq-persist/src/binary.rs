//! Little-endian binary encoding of schema version 1.
//!
//! # Payload layout
//!
//! Fields are written in [`FIELDS`] order with no padding:
//!
//! | Kind | Bytes |
//! |------|-------|
//! | `Int` | 4, `i32` little-endian |
//! | `Float` | 8, IEEE-754 bits little-endian |
//! | `FloatSeq` | 4-byte `u32` count, then `count * 8` bytes |
//! | `Vec3` | 24, three floats `x, y, z` |
//!
//! Floats are stored by bit pattern, so every value (signed zero, NaN
//! payloads, infinities) decodes to exactly the bits that were encoded.
//!
//! # Frames
//!
//! In a stream each payload is wrapped as
//! `u32 schema_version | u32 payload_len | payload`, behind the 8-byte
//! [`MAGIC`] header written once at the start of the stream.
//!
//! [`FIELDS`]: adaq_event::FIELDS

use adaq_event::{EventRecord, FieldDescriptor, FieldVisitor, Vector3, fields};

use crate::error::PersistError;
use crate::format::check_schema_version;

/// Magic bytes opening every binary event stream.
pub const MAGIC: [u8; 8] = *b"ADAQEVNT";

/// Size of the `version | payload_len` frame header in bytes.
pub const FRAME_HEADER_LEN: usize = 8;

/// Append the binary payload of `record` to `out`.
///
/// # Errors
///
/// Returns [`PersistError::SequenceTooLong`] if a timestamp sequence has more
/// than `u32::MAX` entries. `out` may hold a partial payload in that case.
pub fn encode_record(record: &EventRecord, out: &mut Vec<u8>) -> Result<(), PersistError> {
    record.visit_fields(&mut Encoder { out })
}

/// Decode one payload written under schema `version`.
///
/// The version is checked before any byte of the payload is read.
///
/// # Errors
///
/// - [`PersistError::UnsupportedVersion`] if `version` is not supported.
/// - [`PersistError::Truncated`] if the payload ends inside a field.
/// - [`PersistError::TrailingBytes`] if bytes remain after the last field.
pub fn decode_record(version: u32, payload: &[u8]) -> Result<EventRecord, PersistError> {
    check_schema_version(version)?;

    let mut cursor = Cursor { rest: payload };
    let mut record = EventRecord::new();

    record.set_event_id(cursor.int(fields::EVENT_ID)?);
    record.set_run_id(cursor.int(fields::RUN_ID)?);
    record.set_total_energy_deposited(cursor.float(fields::TOTAL_ENERGY_DEPOSITED)?);
    record.set_photons_created(cursor.int(fields::PHOTONS_CREATED)?);
    record.set_photons_detected(cursor.int(fields::PHOTONS_DETECTED)?);
    for time in cursor.float_seq(fields::PHOTON_CREATION_TIMES)? {
        record.add_photon_creation_time(time);
    }
    for time in cursor.float_seq(fields::PHOTON_DETECTION_TIMES)? {
        record.add_photon_detection_time(time);
    }
    let position = cursor.vec3(fields::VERTEX_POSITION)?;
    record.set_vertex_position(position.x(), position.y(), position.z());
    let direction = cursor.vec3(fields::VERTEX_MOMENTUM_DIRECTION)?;
    record.set_vertex_momentum_direction(direction.x(), direction.y(), direction.z());
    record.set_vertex_kinetic_energy(cursor.float(fields::VERTEX_KINETIC_ENERGY)?);
    record.set_vertex_particle_code(cursor.int(fields::VERTEX_PARTICLE_CODE)?);

    if !cursor.rest.is_empty() {
        return Err(PersistError::TrailingBytes {
            extra: cursor.rest.len(),
        });
    }
    Ok(record)
}

/// Build the 8-byte frame header for a payload of `payload_len` bytes.
///
/// # Errors
///
/// Returns [`PersistError::FrameTooLarge`] if the length does not fit in a
/// `u32`.
pub fn frame_header(
    version: u32,
    payload_len: usize,
) -> Result<[u8; FRAME_HEADER_LEN], PersistError> {
    let Ok(len) = u32::try_from(payload_len) else {
        return Err(PersistError::FrameTooLarge { len: payload_len });
    };
    let mut header = [0_u8; FRAME_HEADER_LEN];
    let (version_bytes, len_bytes) = header.split_at_mut(4);
    version_bytes.copy_from_slice(&version.to_le_bytes());
    len_bytes.copy_from_slice(&len.to_le_bytes());
    Ok(header)
}

/// Split an 8-byte frame header into `(version, payload_len)`.
pub const fn parse_frame_header(header: [u8; FRAME_HEADER_LEN]) -> (u32, u32) {
    let [v0, v1, v2, v3, l0, l1, l2, l3] = header;
    (
        u32::from_le_bytes([v0, v1, v2, v3]),
        u32::from_le_bytes([l0, l1, l2, l3]),
    )
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

struct Encoder<'a> {
    out: &'a mut Vec<u8>,
}

impl FieldVisitor for Encoder<'_> {
    type Error = PersistError;

    fn visit_int(&mut self, _field: FieldDescriptor, value: i32) -> Result<(), PersistError> {
        self.out.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn visit_float(&mut self, _field: FieldDescriptor, value: f64) -> Result<(), PersistError> {
        self.out.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn visit_float_seq(
        &mut self,
        field: FieldDescriptor,
        values: &[f64],
    ) -> Result<(), PersistError> {
        let Ok(count) = u32::try_from(values.len()) else {
            return Err(PersistError::SequenceTooLong {
                field: field.name,
                len: values.len(),
            });
        };
        self.out.reserve(values.len().saturating_mul(8).saturating_add(4));
        self.out.extend_from_slice(&count.to_le_bytes());
        for value in values {
            self.out.extend_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    fn visit_vec3(&mut self, _field: FieldDescriptor, value: Vector3) -> Result<(), PersistError> {
        for component in value.to_array() {
            self.out.extend_from_slice(&component.to_le_bytes());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    rest: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn take<const N: usize>(&mut self, field: FieldDescriptor) -> Result<[u8; N], PersistError> {
        let Some((head, rest)) = self.rest.split_first_chunk::<N>() else {
            return Err(PersistError::Truncated { field: field.name });
        };
        self.rest = rest;
        Ok(*head)
    }

    fn take_slice(&mut self, field: FieldDescriptor, len: usize) -> Result<&'a [u8], PersistError> {
        let Some((head, rest)) = self.rest.split_at_checked(len) else {
            return Err(PersistError::Truncated { field: field.name });
        };
        self.rest = rest;
        Ok(head)
    }

    fn int(&mut self, field: FieldDescriptor) -> Result<i32, PersistError> {
        self.take::<4>(field).map(i32::from_le_bytes)
    }

    fn float(&mut self, field: FieldDescriptor) -> Result<f64, PersistError> {
        self.take::<8>(field).map(f64::from_le_bytes)
    }

    fn vec3(&mut self, field: FieldDescriptor) -> Result<Vector3, PersistError> {
        Ok(Vector3::new(
            self.float(field)?,
            self.float(field)?,
            self.float(field)?,
        ))
    }

    fn float_seq(&mut self, field: FieldDescriptor) -> Result<Vec<f64>, PersistError> {
        let count = u32::from_le_bytes(self.take::<4>(field)?);
        // A count the remaining bytes cannot satisfy is reported before any
        // allocation is sized from it.
        let byte_len = usize::try_from(count)
            .ok()
            .and_then(|n| n.checked_mul(8))
            .ok_or(PersistError::Truncated { field: field.name })?;
        let body = self.take_slice(field, byte_len)?;

        let mut values = Vec::with_capacity(byte_len / 8);
        for chunk in body.chunks_exact(8) {
            let Ok(bytes) = <[u8; 8]>::try_from(chunk) else {
                return Err(PersistError::Truncated { field: field.name });
            };
            values.push(f64::from_le_bytes(bytes));
        }
        Ok(values)
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use adaq_event::SCHEMA_VERSION;

    use super::*;

    /// Size of a record with no timestamps: five ints, two floats, two
    /// sequence counts, two vectors.
    const EMPTY_PAYLOAD_LEN: usize = 5 * 4 + 2 * 8 + 2 * 4 + 2 * 24;

    fn sample() -> EventRecord {
        let mut record = EventRecord::new();
        record.set_event_id(42);
        record.set_run_id(7);
        record.set_total_energy_deposited(1.23e-3);
        record.set_photons_created(2);
        record.set_photons_detected(1);
        record.add_photon_creation_time(0.0);
        record.add_photon_creation_time(1.5e-9);
        record.add_photon_detection_time(3.25e-9);
        record.set_vertex_position(1.0, 2.0, -3.0);
        record.set_vertex_momentum_direction(0.0, 0.6, 0.8);
        record.set_vertex_kinetic_energy(2.0);
        record.set_vertex_particle_code(22);
        record
    }

    fn encode(record: &EventRecord) -> Vec<u8> {
        let mut out = Vec::new();
        assert!(encode_record(record, &mut out).is_ok());
        out
    }

    #[test]
    fn empty_record_has_fixed_size() {
        assert_eq!(encode(&EventRecord::new()).len(), EMPTY_PAYLOAD_LEN);
    }

    #[test]
    fn sequences_add_eight_bytes_per_entry() {
        assert_eq!(encode(&sample()).len(), EMPTY_PAYLOAD_LEN + 3 * 8);
    }

    #[test]
    fn payload_starts_with_event_and_run_id() {
        let bytes = encode(&sample());
        assert_eq!(bytes.get(0..4), Some(&42_i32.to_le_bytes()[..]));
        assert_eq!(bytes.get(4..8), Some(&7_i32.to_le_bytes()[..]));
        assert_eq!(bytes.get(8..16), Some(&1.23e-3_f64.to_le_bytes()[..]));
    }

    #[test]
    fn decode_reproduces_record() {
        let record = sample();
        let decoded = decode_record(SCHEMA_VERSION, &encode(&record));
        assert_eq!(decoded.ok(), Some(record));
    }

    #[test]
    fn special_floats_survive_bit_exact() {
        let nan = f64::from_bits(0x7ff8_0000_dead_beef);
        let mut record = EventRecord::new();
        record.set_total_energy_deposited(-0.0);
        record.set_vertex_kinetic_energy(f64::INFINITY);
        record.add_photon_creation_time(nan);
        record.set_vertex_position(f64::MIN_POSITIVE, -f64::MAX, f64::NEG_INFINITY);

        let decoded = decode_record(SCHEMA_VERSION, &encode(&record)).unwrap_or_default();
        assert_eq!(decoded.total_energy_deposited().to_bits(), (-0.0_f64).to_bits());
        assert_eq!(decoded.vertex_kinetic_energy().to_bits(), f64::INFINITY.to_bits());
        let times = decoded.photon_creation_times();
        assert_eq!(times.len(), 1);
        assert_eq!(times.first().map(|t| t.to_bits()), Some(nan.to_bits()));
        assert_eq!(
            decoded.vertex_position().to_array().map(f64::to_bits),
            [f64::MIN_POSITIVE, -f64::MAX, f64::NEG_INFINITY].map(f64::to_bits)
        );
    }

    #[test]
    fn unknown_version_is_rejected_before_decoding() {
        // An empty payload would be truncated, so a version error proves the
        // check happens first.
        let result = decode_record(SCHEMA_VERSION + 1, &[]);
        assert!(matches!(
            result,
            Err(PersistError::UnsupportedVersion { found: 2, supported: 1 })
        ));
        assert!(matches!(
            decode_record(0, &[]),
            Err(PersistError::UnsupportedVersion { found: 0, .. })
        ));
    }

    #[test]
    fn truncated_payload_names_the_field() {
        let bytes = encode(&sample());
        let cut = bytes.get(..bytes.len() - 2).unwrap_or_default();
        assert!(matches!(
            decode_record(SCHEMA_VERSION, cut),
            Err(PersistError::Truncated { field: "vertex_particle_code" })
        ));
        assert!(matches!(
            decode_record(SCHEMA_VERSION, &[1, 0]),
            Err(PersistError::Truncated { field: "event_id" })
        ));
    }

    #[test]
    fn oversized_sequence_count_is_truncation() {
        let mut bytes = encode(&EventRecord::new());
        // Creation-time count sits after four ints and one float.
        let count_at = 4 + 4 + 8 + 4 + 4;
        if let Some(count) = bytes.get_mut(count_at..count_at + 4) {
            count.copy_from_slice(&u32::MAX.to_le_bytes());
        }
        assert!(matches!(
            decode_record(SCHEMA_VERSION, &bytes),
            Err(PersistError::Truncated { field: "photon_creation_times" })
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode(&sample());
        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            decode_record(SCHEMA_VERSION, &bytes),
            Err(PersistError::TrailingBytes { extra: 3 })
        ));
    }

    #[test]
    fn frame_header_round_trips() {
        let header = frame_header(SCHEMA_VERSION, 120).unwrap_or_default();
        assert_eq!(parse_frame_header(header), (SCHEMA_VERSION, 120));
    }

    #[test]
    fn magic_is_eight_ascii_bytes() {
        assert!(MAGIC.is_ascii());
        assert_eq!(&MAGIC, b"ADAQEVNT");
    }
}
