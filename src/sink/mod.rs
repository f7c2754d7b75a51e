//! # Sample sinks
//!
//! Ordered consumers of [`Sample`]s produced by the trajectory sampler.
//!
//! - [`CsvSink`] writes one `time,position,velocity,acceleration` record per sample.
//! - [`JsonLinesSink`] writes one JSON object per line.
//! - [`MirrorSink`] streams fixed-precision text records to a live viewer over TCP.
//! - [`MemorySink`] keeps everything in a `Vec`.
//! - [`FanoutSink`] offers each sample to several sinks in turn.
//!
//! Sinks see samples in strictly increasing time order. A sink error aborts the run; nothing is
//! retried.

mod csv_file;
mod json_lines;
mod mirror;

pub use csv_file::CsvSink;
pub use json_lines::JsonLinesSink;
pub use mirror::{MirrorSink, DEFAULT_MIRROR_ADDRESS, DEFAULT_PACING};

use crate::motion::Sample;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for trajectory samples.
pub trait SampleSink {
    /// Take ownership of the next sample.
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError>;

    /// Called once after the terminal sample.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        (**self).accept(sample)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

impl<S: SampleSink + ?Sized> SampleSink for Box<S> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        (**self).accept(sample)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    samples: Vec<Sample>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

impl SampleSink for MemorySink {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        self.samples.push(sample);
        Ok(())
    }
}

/// Forwards every sample to each inner sink, in insertion order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn SampleSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn SampleSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SampleSink for FanoutSink {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        for sink in &mut self.sinks {
            sink.accept(sample)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        Ok(())
    }
}
