//! Streaming writer for event files.

use std::io::Write;

use adaq_event::{EventRecord, SCHEMA_VERSION};

use crate::binary::{self, MAGIC};
use crate::error::PersistError;
use crate::format::Format;
use crate::json;

/// Writes version-tagged event records to any [`Write`] sink.
///
/// The simulation loop hands each finished record to [`write_record`] and is
/// then free to reset it for the next event. Callers should wrap unbuffered
/// sinks such as files in a [`std::io::BufWriter`].
///
/// [`write_record`]: EventWriter::write_record
#[derive(Debug)]
pub struct EventWriter<W: Write> {
    inner: W,
    format: Format,
    /// Reused encode buffer, one record at a time.
    scratch: Vec<u8>,
    written: u64,
}

impl<W: Write> EventWriter<W> {
    /// Start a new stream, writing the format header if it has one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the header cannot be written.
    pub fn new(mut inner: W, format: Format) -> Result<Self, PersistError> {
        if format == Format::Binary {
            inner.write_all(&MAGIC)?;
        }
        tracing::debug!(%format, schema_version = SCHEMA_VERSION, "Opened event stream");
        Ok(Self {
            inner,
            format,
            scratch: Vec::new(),
            written: 0,
        })
    }

    /// Encode and write one record.
    ///
    /// The record is fully encoded before anything reaches the sink, so an
    /// encoding error leaves the stream unchanged.
    ///
    /// # Errors
    ///
    /// Returns the encoding error for the record, or [`PersistError::Io`] if
    /// the sink fails.
    pub fn write_record(&mut self, record: &EventRecord) -> Result<(), PersistError> {
        self.scratch.clear();
        match self.format {
            Format::Binary => {
                binary::encode_record(record, &mut self.scratch)?;
                let header = binary::frame_header(SCHEMA_VERSION, self.scratch.len())?;
                self.inner.write_all(&header)?;
            }
            Format::Json => json::encode_line(record, &mut self.scratch)?,
        }
        self.inner.write_all(&self.scratch)?;
        self.written = self.written.saturating_add(1);

        tracing::trace!(
            event_id = record.event_id(),
            run_id = record.run_id(),
            bytes = self.scratch.len(),
            "Wrote event record"
        );
        Ok(())
    }

    /// Number of records written so far.
    pub const fn records_written(&self) -> u64 {
        self.written
    }

    /// Encoding used by this stream.
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Flush the sink and hand it back.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] if the flush fails.
    pub fn finish(mut self) -> Result<W, PersistError> {
        self.inner.flush()?;
        tracing::info!(
            records = self.written,
            format = %self.format,
            "Event stream finished"
        );
        Ok(self.inner)
    }
}
