// src/sink/json_lines.rs - One JSON object per sample
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{SampleSink, SinkError};
use crate::motion::Sample;

pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl JsonLinesSink<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path).inspect_err(|e| {
            tracing::error!("Failed to open '{}' for writing: {}", path.display(), e)
        })?;
        tracing::info!("Writing trajectory to {}", path.display());
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SampleSink for JsonLinesSink<W> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &sample)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_sample_on_its_own_line() {
        let mut sink = JsonLinesSink::from_writer(Vec::new());
        let first = Sample { time: 0.0, position: 10.0, velocity: -5.0, acceleration: 2.0 };
        let second = Sample { time: 0.1, position: 9.51, velocity: -4.8, acceleration: 2.0 };
        sink.accept(first).unwrap();
        sink.accept(second).unwrap();
        sink.finish().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let parsed: Vec<Sample> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(parsed, vec![first, second]);
        assert!(text.starts_with("{\"time\":0.0,\"position\":10.0"));
    }
}
