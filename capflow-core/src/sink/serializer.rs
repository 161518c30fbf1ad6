//! Serialized access to a shared sink.

use std::io::{self, Write};

use bytes::Bytes;
use parking_lot::Mutex;

/// A sink that accepts owned, already complete chunks.
///
/// The default writes the chunk like any other bytes. Channel-backed sinks
/// override it to hand the chunk over without copying.
pub trait ChunkSink: Write {
    fn write_chunk(&mut self, chunk: Bytes) -> io::Result<()> {
        self.write_all(&chunk)
    }
}

impl ChunkSink for Vec<u8> {}

/// Wraps a sink so concurrent callers never interleave their writes.
///
/// Each [`write`](Self::write) holds the lock for the whole `write_all`, so
/// its bytes land contiguously. Callers acquire in no particular order.
#[derive(Debug)]
pub struct WriteSerializer<S: Write> {
    sink: Mutex<S>,
}

impl<S: Write> WriteSerializer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Write `bytes` as one contiguous unit.
    pub fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.sink.lock().write_all(bytes)
    }

    /// Release the sink for the terminal close.
    pub fn into_inner(self) -> S {
        self.sink.into_inner()
    }
}

impl<S: ChunkSink> WriteSerializer<S> {
    /// Write one owned chunk as a single unit.
    pub fn write_chunk(&self, chunk: Bytes) -> io::Result<()> {
        self.sink.lock().write_chunk(chunk)
    }
}
