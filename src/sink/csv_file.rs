// src/sink/csv_file.rs - Trajectory CSV output
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use super::{SampleSink, SinkError};
use crate::motion::Sample;

/// Writes `time,position,velocity,acceleration` records, no header row.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    records: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let writer = WriterBuilder::new().has_headers(false).from_path(path).inspect_err(|e| {
            tracing::error!("Failed to open '{}' for writing: {}", path.display(), e)
        })?;
        tracing::info!("Writing trajectory to {}", path.display());
        Ok(Self { writer, records: 0 })
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
            records: 0,
        }
    }

    pub fn records_written(&self) -> usize {
        self.records
    }
}

impl<W: Write> SampleSink for CsvSink<W> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        self.writer.serialize(sample)?;
        self.records += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        tracing::debug!("Flushed {} trajectory records", self.records);
        Ok(())
    }
}
