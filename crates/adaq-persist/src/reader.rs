//! Streaming reader for event files.
//!
//! The reader yields one `Result` per stored record. A record that fails to
//! decode (unknown schema version, malformed body) produces an error for
//! that record only: binary frames are length-prefixed and JSON records are
//! line-delimited, so the reader picks up again at the next record. Errors
//! that leave the stream position unknown (I/O failures, a frame cut short
//! by end of file) end the iteration.

use std::io::{BufRead, ErrorKind, Read};

use adaq_event::EventRecord;

use crate::binary::{self, FRAME_HEADER_LEN, MAGIC};
use crate::error::PersistError;
use crate::format::Format;
use crate::json;

/// Reads version-tagged event records from a buffered source.
///
/// ```
/// use adaq_event::EventRecord;
/// use adaq_persist::{EventReader, EventWriter, Format};
///
/// let mut record = EventRecord::new();
/// record.set_event_id(3);
///
/// let mut writer = EventWriter::new(Vec::new(), Format::Binary)?;
/// writer.write_record(&record)?;
/// let bytes = writer.finish()?;
///
/// let reader = EventReader::new(bytes.as_slice(), Format::Binary)?;
/// let records: Vec<EventRecord> = reader.collect::<Result<_, _>>()?;
/// assert_eq!(records, vec![record]);
/// # Ok::<(), adaq_persist::PersistError>(())
/// ```
#[derive(Debug)]
pub struct EventReader<R: BufRead> {
    inner: R,
    format: Format,
    payload: Vec<u8>,
    line: Vec<u8>,
    read: u64,
    rejected: u64,
    done: bool,
}

impl<R: BufRead> EventReader<R> {
    /// Open a stream, validating the format header if it has one.
    ///
    /// # Errors
    ///
    /// - [`PersistError::BadMagic`] if a binary stream does not start with
    ///   [`MAGIC`].
    /// - [`PersistError::Io`] if the header cannot be read.
    pub fn new(mut inner: R, format: Format) -> Result<Self, PersistError> {
        if format == Format::Binary {
            let mut magic = [0_u8; MAGIC.len()];
            match inner.read_exact(&mut magic) {
                Ok(()) if magic == MAGIC => {}
                Ok(()) => return Err(PersistError::BadMagic),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(PersistError::BadMagic);
                }
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!(%format, "Opened event stream for reading");
        Ok(Self {
            inner,
            format,
            payload: Vec::new(),
            line: Vec::new(),
            read: 0,
            rejected: 0,
            done: false,
        })
    }

    /// Number of records decoded successfully so far.
    pub const fn records_read(&self) -> u64 {
        self.read
    }

    /// Number of records that failed to decode so far.
    pub const fn records_rejected(&self) -> u64 {
        self.rejected
    }

    /// Encoding of this stream.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Give back the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_frame(&mut self) -> Option<Result<EventRecord, PersistError>> {
        match self.inner.fill_buf().map(<[u8]>::is_empty) {
            Ok(true) => return None,
            Ok(false) => {}
            Err(e) => return Some(Err(self.fail(e.into()))),
        }

        let mut header = [0_u8; FRAME_HEADER_LEN];
        if let Err(e) = self.inner.read_exact(&mut header) {
            return Some(Err(self.fail(truncated_or_io(e, "frame header"))));
        }
        let (version, len) = binary::parse_frame_header(header);

        self.payload.clear();
        let expected = u64::from(len);
        match self.inner.by_ref().take(expected).read_to_end(&mut self.payload) {
            Ok(n) if u64::try_from(n).ok() == Some(expected) => {}
            Ok(_) => {
                return Some(Err(self.fail(PersistError::Truncated {
                    field: "frame payload",
                })));
            }
            Err(e) => return Some(Err(self.fail(e.into()))),
        }

        let result = binary::decode_record(version, &self.payload);
        Some(self.tally(result))
    }

    fn next_line(&mut self) -> Option<Result<EventRecord, PersistError>> {
        loop {
            self.line.clear();
            match self.inner.read_until(b'\n', &mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(self.fail(e.into()))),
            }
            // Bad bytes spoil only their own line.
            let result = match std::str::from_utf8(&self.line) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => json::decode_line(line.trim()),
                Err(e) => Err(e.into()),
            };
            return Some(self.tally(result));
        }
    }

    /// Record a stream-level failure and stop iterating.
    fn fail(&mut self, error: PersistError) -> PersistError {
        tracing::error!(%error, records = self.read, "Event stream unreadable");
        self.done = true;
        error
    }

    fn tally(
        &mut self,
        result: Result<EventRecord, PersistError>,
    ) -> Result<EventRecord, PersistError> {
        match &result {
            Ok(record) => {
                self.read = self.read.saturating_add(1);
                tracing::trace!(
                    event_id = record.event_id(),
                    run_id = record.run_id(),
                    "Read event record"
                );
            }
            Err(PersistError::UnsupportedVersion { found, supported }) => {
                self.rejected = self.rejected.saturating_add(1);
                tracing::warn!(
                    found,
                    supported,
                    "Rejected record with unsupported schema version"
                );
            }
            Err(error) => {
                self.rejected = self.rejected.saturating_add(1);
                tracing::warn!(%error, "Rejected malformed record");
            }
        }
        result
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<EventRecord, PersistError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.format {
            Format::Binary => self.next_frame(),
            Format::Json => self.next_line(),
        };
        if item.is_none() {
            self.done = true;
            tracing::debug!(
                read = self.read,
                rejected = self.rejected,
                "Reached end of event stream"
            );
        }
        item
    }
}

fn truncated_or_io(error: std::io::Error, field: &'static str) -> PersistError {
    if error.kind() == ErrorKind::UnexpectedEof {
        PersistError::Truncated { field }
    } else {
        PersistError::Io(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use adaq_event::SCHEMA_VERSION;

    use super::*;
    use crate::writer::EventWriter;

    fn record(event_id: i32) -> EventRecord {
        let mut record = EventRecord::new();
        record.set_event_id(event_id);
        record.set_run_id(1);
        record.add_photon_creation_time(f64::from(event_id) * 1.0e-9);
        record
    }

    fn stream(format: Format, ids: &[i32]) -> Vec<u8> {
        let mut writer = EventWriter::new(Vec::new(), format).unwrap();
        for &id in ids {
            writer.write_record(&record(id)).unwrap();
        }
        writer.finish().unwrap()
    }

    /// Append a binary frame tagged with an arbitrary version.
    fn push_frame(bytes: &mut Vec<u8>, version: u32, payload: &[u8]) {
        bytes.extend_from_slice(&binary::frame_header(version, payload.len()).unwrap());
        bytes.extend_from_slice(payload);
    }

    #[test]
    fn empty_binary_stream_yields_nothing() {
        let bytes = stream(Format::Binary, &[]);
        let mut reader = EventReader::new(bytes.as_slice(), Format::Binary).unwrap();
        assert!(reader.next().is_none());
        assert_eq!(reader.records_read(), 0);
    }

    #[test]
    fn reads_back_in_write_order() {
        for format in [Format::Binary, Format::Json] {
            let bytes = stream(format, &[1, 2, 3]);
            let reader = EventReader::new(bytes.as_slice(), format).unwrap();
            let ids: Vec<i32> = reader.map(|r| r.unwrap().event_id()).collect();
            assert_eq!(ids, vec![1, 2, 3], "format {format}");
        }
    }

    #[test]
    fn bad_magic_is_rejected() {
        let err = EventReader::new(&b"NOTADAQ!rest"[..], Format::Binary).unwrap_err();
        assert!(matches!(err, PersistError::BadMagic));
        let err = EventReader::new(&b"ADAQ"[..], Format::Binary).unwrap_err();
        assert!(matches!(err, PersistError::BadMagic));
    }

    #[test]
    fn future_version_frame_is_skipped() {
        let mut bytes = stream(Format::Binary, &[1]);
        push_frame(&mut bytes, SCHEMA_VERSION + 1, b"opaque future payload");
        let mut tail = Vec::new();
        binary::encode_record(&record(3), &mut tail).unwrap();
        push_frame(&mut bytes, SCHEMA_VERSION, &tail);

        let mut reader = EventReader::new(bytes.as_slice(), Format::Binary).unwrap();
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 1);
        assert!(matches!(
            reader.next(),
            Some(Err(PersistError::UnsupportedVersion { found: 2, .. }))
        ));
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 3);
        assert!(reader.next().is_none());
        assert_eq!(reader.records_read(), 2);
        assert_eq!(reader.records_rejected(), 1);
    }

    #[test]
    fn truncated_frame_ends_iteration() {
        let mut bytes = stream(Format::Binary, &[1, 2]);
        bytes.truncate(bytes.len() - 5);

        let mut reader = EventReader::new(bytes.as_slice(), Format::Binary).unwrap();
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(
            reader.next(),
            Some(Err(PersistError::Truncated { field: "frame payload" }))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn partial_frame_header_is_truncation() {
        let mut bytes = stream(Format::Binary, &[]);
        bytes.extend_from_slice(&[1, 0, 0]);
        let mut reader = EventReader::new(bytes.as_slice(), Format::Binary).unwrap();
        assert!(matches!(
            reader.next(),
            Some(Err(PersistError::Truncated { field: "frame header" }))
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn json_skips_blank_lines_and_bad_versions() {
        let mut bytes = stream(Format::Json, &[5]);
        bytes.extend_from_slice(b"\n   \n");
        bytes.extend_from_slice(br#"{"schema_version":9,"record":{}}"#);
        bytes.push(b'\n');
        bytes.extend_from_slice(&stream(Format::Json, &[6]));

        let mut reader = EventReader::new(bytes.as_slice(), Format::Json).unwrap();
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 5);
        assert!(matches!(
            reader.next(),
            Some(Err(PersistError::UnsupportedVersion { found: 9, .. }))
        ));
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 6);
        assert!(reader.next().is_none());
    }

    #[test]
    fn json_garbage_line_does_not_stop_reading() {
        let mut bytes = b"not json at all\n".to_vec();
        bytes.extend_from_slice(&stream(Format::Json, &[8]));

        let mut reader = EventReader::new(bytes.as_slice(), Format::Json).unwrap();
        assert!(matches!(reader.next(), Some(Err(PersistError::Json(_)))));
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 8);
    }

    #[test]
    fn json_line_with_invalid_utf8_is_rejected_alone() {
        let mut bytes = stream(Format::Json, &[1]);
        bytes.extend_from_slice(b"{\"schema_version\":1,\xff}\n");
        bytes.extend_from_slice(&stream(Format::Json, &[3]));

        let mut reader = EventReader::new(bytes.as_slice(), Format::Json).unwrap();
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 1);
        assert!(matches!(reader.next(), Some(Err(PersistError::Utf8(_)))));
        assert_eq!(reader.next().unwrap().unwrap().event_id(), 3);
        assert!(reader.next().is_none());
        assert_eq!(reader.records_read(), 2);
        assert_eq!(reader.records_rejected(), 1);
    }
}
