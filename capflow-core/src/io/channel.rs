//! In-process live stream of framed records.

use std::io::{self, Write};

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender};

/// Create a bounded stream holding at most `capacity` chunks.
pub fn live_stream(capacity: usize) -> (ChannelWriter, Receiver<Bytes>) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (ChannelWriter::new(tx), rx)
}

/// `Write` adapter over a channel sender.
///
/// Every `write` call becomes exactly one chunk, so a caller that writes a
/// whole frame at once delivers it as a single message. Sends block while
/// the channel is full.
#[derive(Debug)]
pub struct ChannelWriter {
    tx: Sender<Bytes>,
    bytes_sent: u64,
}

impl ChannelWriter {
    pub fn new(tx: Sender<Bytes>) -> Self {
        Self { tx, bytes_sent: 0 }
    }

    /// Send an already-built chunk without copying.
    pub fn send(&mut self, chunk: Bytes) -> io::Result<()> {
        let len = chunk.len() as u64;
        self.tx
            .send(chunk)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "live stream consumer went away"))?;
        self.bytes_sent += len;
        Ok(())
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Drop the sender, disconnecting the consumer, and report bytes sent.
    pub fn close(self) -> u64 {
        self.bytes_sent
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.send(Bytes::copy_from_slice(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
