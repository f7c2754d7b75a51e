// src/sink/mirror.rs - Live sample stream for an external viewer
use std::fmt::Display;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

use super::{SampleSink, SinkError};
use crate::motion::Sample;

/// Address the real-time plotting script listens on.
pub const DEFAULT_MIRROR_ADDRESS: &str = "127.0.0.1:8082";

/// Delay after each mirrored sample so the viewer can keep up.
pub const DEFAULT_PACING: Duration = Duration::from_millis(100);

/// Writes [`Sample::mirror_line`] records to a byte stream, pausing after each one.
pub struct MirrorSink<W: Write> {
    stream: W,
    pacing: Duration,
    sent: usize,
}

impl MirrorSink<TcpStream> {
    pub fn connect<A: ToSocketAddrs + Display>(address: A, pacing: Duration) -> Result<Self, SinkError> {
        let stream = TcpStream::connect(&address)
            .inspect_err(|e| tracing::error!("Failed to connect to viewer at {}: {}", address, e))?;
        stream.set_nodelay(true)?;
        tracing::info!("Mirroring samples to {} every {:?}", address, pacing);
        Ok(Self::new(stream, pacing))
    }
}

impl<W: Write> MirrorSink<W> {
    pub fn new(stream: W, pacing: Duration) -> Self {
        Self {
            stream,
            pacing,
            sent: 0,
        }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }
}

impl<W: Write> SampleSink for MirrorSink<W> {
    fn accept(&mut self, sample: Sample) -> Result<(), SinkError> {
        self.stream.write_all(sample.mirror_line().as_bytes())?;
        self.sent += 1;
        if !self.pacing.is_zero() {
            thread::sleep(self.pacing);
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.stream.flush()?;
        Ok(())
    }
}
