//! Output sinks.
//!
//! A [`SinkTarget`] is the bottom of an encoder's pipeline: a file stack
//! (optionally buffered, optionally gzipped) or a live channel. Sinks are
//! always used through a [`WriteSerializer`].

mod serializer;

pub use serializer::{ChunkSink, WriteSerializer};

use std::fs::File;
use std::io::{self, BufWriter, Write};

use bytes::Bytes;

use crate::io::{ChannelWriter, CompressWriter};

/// Raw or buffered output file.
#[derive(Debug)]
pub enum FileStream {
    Raw(File),
    Buffered(BufWriter<File>),
}

impl FileStream {
    /// Wrap `file` in a buffer of `block_size` bytes if `buffer` is set.
    pub fn new(file: File, buffer: bool, block_size: usize) -> Self {
        if buffer {
            FileStream::Buffered(BufWriter::with_capacity(block_size, file))
        } else {
            FileStream::Raw(file)
        }
    }

    /// Flush any buffered bytes and return the file.
    pub fn into_file(self) -> io::Result<File> {
        match self {
            FileStream::Raw(file) => Ok(file),
            FileStream::Buffered(writer) => writer.into_inner().map_err(|e| e.into_error()),
        }
    }
}

impl Write for FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileStream::Raw(f) => f.write(buf),
            FileStream::Buffered(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileStream::Raw(f) => f.flush(),
            FileStream::Buffered(w) => w.flush(),
        }
    }
}

/// Where an encoder's bytes end up.
pub enum SinkTarget {
    File(CompressWriter<FileStream>),
    Channel(ChannelWriter),
}

impl SinkTarget {
    pub fn is_channel(&self) -> bool {
        matches!(self, SinkTarget::Channel(_))
    }

    /// Close the sink and report its final size in bytes.
    ///
    /// For files: finish compression, flush the buffer, sync, then stat.
    /// For channels: drop the sender and report bytes sent.
    pub fn close(self) -> io::Result<u64> {
        match self {
            SinkTarget::File(writer) => {
                let file = writer.finish()?.into_file()?;
                file.sync_all()?;
                Ok(file.metadata()?.len())
            }
            SinkTarget::Channel(channel) => Ok(channel.close()),
        }
    }
}

impl ChunkSink for SinkTarget {
    /// Channels take the chunk without copying.
    fn write_chunk(&mut self, chunk: Bytes) -> io::Result<()> {
        match self {
            SinkTarget::File(w) => w.write_all(&chunk),
            SinkTarget::Channel(c) => c.send(chunk),
        }
    }
}

impl Write for SinkTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SinkTarget::File(w) => w.write(buf),
            SinkTarget::Channel(c) => c.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SinkTarget::File(w) => w.flush(),
            SinkTarget::Channel(c) => c.flush(),
        }
    }
}
