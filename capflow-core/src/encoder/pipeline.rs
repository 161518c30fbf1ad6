//! Output pipeline assembly.
//!
//! Turns an encoder descriptor plus configuration into the stack of
//! writers its records flow through.

use std::fs::File;
use std::path::PathBuf;

use bytes::Bytes;
use crossbeam_channel::Receiver;

use crate::catalog::EncoderDescriptor;
use crate::config::EncoderConfig;
use crate::error::Result;
use crate::io::{live_stream, Compression, CompressWriter};
use crate::sink::{FileStream, SinkTarget};

/// How records are rendered before hitting the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Varint length-delimited bincode frames
    Delimited,
    /// CSV rows
    Tabular,
}

impl OutputFormat {
    pub fn from_config(config: &EncoderConfig) -> Self {
        if config.tabular {
            OutputFormat::Tabular
        } else {
            OutputFormat::Delimited
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Delimited => "ncap",
            OutputFormat::Tabular => "csv",
        }
    }
}

/// File name for an encoder's output, e.g. `TCP.ncap.gz`.
pub fn output_file_name(name: &str, format: OutputFormat, compression: Compression) -> String {
    match compression.extension() {
        Some(ext) => format!("{}.{}.{}", name, format.extension(), ext),
        None => format!("{}.{}", name, format.extension()),
    }
}

/// An assembled pipeline, ready for the header.
pub(super) struct Pipeline {
    pub target: SinkTarget,
    pub stream: Option<Receiver<Bytes>>,
    pub path: Option<PathBuf>,
}

/// Build the sink stack for one encoder.
///
/// Live binary output gets a bounded channel and nothing else. Everything
/// else gets `file -> [buffer] -> [gzip]`.
pub(super) fn assemble(descriptor: &EncoderDescriptor, config: &EncoderConfig) -> Result<Pipeline> {
    if config.streams_live() {
        let (writer, rx) = live_stream(config.stream_capacity);
        return Ok(Pipeline {
            target: SinkTarget::Channel(writer),
            stream: Some(rx),
            path: None,
        });
    }

    let format = OutputFormat::from_config(config);
    let compression = if config.compress {
        Compression::Gzip
    } else {
        Compression::None
    };
    let path = config
        .output_dir
        .join(output_file_name(descriptor.name(), format, compression));

    let file = File::create(&path)?;
    let stream = FileStream::new(file, config.buffer, config.block_size);

    Ok(Pipeline {
        target: SinkTarget::File(CompressWriter::new(stream, compression, config.compression_level)),
        stream: None,
        path: Some(path),
    })
}
