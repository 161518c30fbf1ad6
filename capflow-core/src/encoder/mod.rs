//! Active protocol encoders.
//!
//! An [`Encoder`] owns one protocol's output pipeline. It is created by
//! [`Encoder::build`], receives decoded layers through [`Encoder::encode`]
//! from any number of threads, and is consumed by [`Encoder::destroy`].

mod pipeline;

pub use pipeline::{output_file_name, OutputFormat};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use bytes::Bytes;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use crate::catalog::EncoderDescriptor;
use crate::config::EncoderConfig;
use crate::error::{ConfigError, Result};
use crate::io::{encode_frame, tabular};
use crate::layer::DecodedLayer;
use crate::record::{Header, Record, Value};
use crate::schema::DataKind;
use crate::sink::{SinkTarget, WriteSerializer};

/// Final state of an encoder after [`Encoder::destroy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSummary {
    /// Encoder name, e.g. "TCP"
    pub name: &'static str,
    /// Output file, `None` for live streams
    pub path: Option<PathBuf>,
    /// Bytes on disk, or bytes sent for live streams
    pub size: u64,
    /// Data records written, excluding the header
    pub records: u64,
}

/// One protocol's active encoder.
pub struct Encoder {
    descriptor: EncoderDescriptor,
    format: OutputFormat,
    sink: WriteSerializer<SinkTarget>,
    stream: Mutex<Option<Receiver<Bytes>>>,
    stream_unclaimed: AtomicBool,
    path: Option<PathBuf>,
    include_payloads: bool,
    records: AtomicU64,
    bytes: AtomicU64,
}

impl std::fmt::Debug for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("name", &self.name())
            .field("format", &self.format)
            .field("path", &self.path)
            .field("records", &self.records_written())
            .finish_non_exhaustive()
    }
}

impl Encoder {
    /// Assemble the pipeline for `descriptor` and write its header.
    ///
    /// The configuration is validated before anything is created on disk.
    pub fn build(descriptor: EncoderDescriptor, config: &EncoderConfig) -> Result<Self> {
        config.validate()?;

        if config.tabular && config.live_stream {
            tracing::warn!(
                "{}: live stream is not supported for tabular output, writing to file",
                descriptor.name()
            );
        }

        let pipeline = pipeline::assemble(&descriptor, config)?;
        let stream_unclaimed = AtomicBool::new(pipeline.stream.is_some());
        let encoder = Self {
            descriptor,
            format: OutputFormat::from_config(config),
            sink: WriteSerializer::new(pipeline.target),
            stream: Mutex::new(pipeline.stream),
            stream_unclaimed,
            path: pipeline.path,
            include_payloads: config.include_payloads,
            records: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
        };

        encoder
            .write_header(&config.source)
            .map_err(|source| ConfigError::HeaderWrite {
                encoder: descriptor.name(),
                source,
            })?;

        tracing::debug!(
            encoder = descriptor.name(),
            path = ?encoder.path,
            format = ?encoder.format,
            buffer = config.buffer,
            compress = config.compress,
            live = encoder.is_live(),
            "encoder ready"
        );

        Ok(encoder)
    }

    fn write_header(&self, source: &str) -> io::Result<()> {
        let schema = &self.descriptor.schema;
        match self.format {
            OutputFormat::Tabular => self.sink.write(tabular::header_row(schema).as_bytes()),
            OutputFormat::Delimited => {
                let header = Header::new(schema, source, self.include_payloads);
                let frame = encode_frame(&header)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                self.sink.write_chunk(frame)
            }
        }
    }

    /// Encode one decoded layer.
    ///
    /// Layers the handler declines are skipped silently. Sink errors are
    /// returned to the caller.
    pub fn encode(&self, layer: &DecodedLayer<'_>, timestamp_us: i64) -> Result<()> {
        let mut record = match self.descriptor.encode(layer, timestamp_us) {
            Some(record) => record,
            None => return Ok(()),
        };
        if !self.include_payloads {
            self.strip_payloads(&mut record);
        }
        if self.stream_unclaimed.load(Ordering::Acquire) {
            self.release_unclaimed_stream();
        }

        let written = match self.format {
            OutputFormat::Tabular => {
                let row = tabular::record_row(&record);
                self.sink.write(row.as_bytes())?;
                row.len()
            }
            OutputFormat::Delimited => {
                let frame = encode_frame(&record)?;
                let len = frame.len();
                self.sink.write_chunk(frame)?;
                len
            }
        };

        self.records.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(written as u64, Ordering::Relaxed);
        Ok(())
    }

    fn strip_payloads(&self, record: &mut Record) {
        for (field, value) in self.descriptor.schema.fields.iter().zip(record.values.iter_mut()) {
            if field.name == "payload" && field.kind == DataKind::Binary {
                *value = Value::Null;
            }
        }
    }

    /// Hand out the live-stream receiver. Returns `Some` at most once.
    ///
    /// The receiver must be claimed before the first record is encoded.
    /// A stream nobody claimed by then is dropped, and every later send
    /// fails with `BrokenPipe` instead of blocking on a full channel.
    pub fn take_stream(&self) -> Option<Receiver<Bytes>> {
        let rx = self.stream.lock().take();
        self.stream_unclaimed.store(false, Ordering::Release);
        rx
    }

    fn release_unclaimed_stream(&self) {
        if self.stream.lock().take().is_some() {
            tracing::warn!("{}: live stream was never claimed, dropping it", self.name());
        }
        self.stream_unclaimed.store(false, Ordering::Release);
    }

    /// Close the pipeline and report what was written.
    pub fn destroy(self) -> Result<EncoderSummary> {
        let name = self.name();
        let records = self.records_written();
        let path = self.path;

        let size = self.sink.into_inner().close()?;
        tracing::debug!(encoder = name, size, records, "encoder closed");

        Ok(EncoderSummary {
            name,
            path,
            size,
            records,
        })
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &EncoderDescriptor {
        &self.descriptor
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.path.is_none()
    }

    /// Data records written so far.
    pub fn records_written(&self) -> u64 {
        self.records.load(Ordering::Relaxed)
    }

    /// Uncompressed record bytes written so far, excluding the header.
    pub fn bytes_written(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::error::Error;
    use crate::io::{split_frame, DelimitedReader, FileDecoder};
    use crate::layer::{FieldValue, LayerType};
    use crate::test_utils::{tcp_layer, udp_layer};

    fn tcp() -> EncoderDescriptor {
        EncoderDescriptor::builtin(LayerType::Tcp)
    }

    #[test]
    fn test_binary_file_has_header_then_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path()).with_source("test.pcap");
        let encoder = Encoder::build(tcp(), &config).unwrap();
        assert_eq!(encoder.path(), Some(dir.path().join("TCP.ncap").as_path()));

        encoder.encode(&tcp_layer(1000, 80), 10).unwrap();
        encoder.encode(&tcp_layer(1001, 443), 20).unwrap();
        let summary = encoder.destroy().unwrap();
        assert_eq!(summary.records, 2);

        let mut reader = DelimitedReader::new(FileDecoder::open(dir.path().join("TCP.ncap")).unwrap());
        let header: Header = reader.next_value().unwrap().unwrap();
        assert_eq!(header.record_type, "NC_TCP");
        assert_eq!(header.source, "test.pcap");

        let first: Record = reader.next_value().unwrap().unwrap();
        assert_eq!(first.get(0), Some(&Value::Timestamp(10)));
        let second: Record = reader.next_value().unwrap().unwrap();
        assert_eq!(second.get(2), Some(&Value::UInt(443)));
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_not_applicable_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = Encoder::build(tcp(), &EncoderConfig::new(dir.path())).unwrap();

        encoder.encode(&udp_layer(1, 2), 0).unwrap();
        assert_eq!(encoder.records_written(), 0);
        assert_eq!(encoder.bytes_written(), 0);
    }

    #[test]
    fn test_live_stream_conflict_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path())
            .with_live_stream(true)
            .with_buffer(true);

        let err = Encoder::build(tcp(), &config).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::LiveStreamConflict { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path().join("missing"));
        assert!(matches!(Encoder::build(tcp(), &config), Err(Error::Io(_))));
    }

    #[test]
    fn test_live_stream_chunks_are_frames() {
        let config = EncoderConfig::default().with_live_stream(true);
        let encoder = Encoder::build(tcp(), &config).unwrap();
        assert!(encoder.is_live());

        let rx = encoder.take_stream().unwrap();
        assert!(encoder.take_stream().is_none());

        encoder.encode(&tcp_layer(5, 6), 1).unwrap();
        let summary = encoder.destroy().unwrap();
        assert!(summary.path.is_none());

        let chunks: Vec<Bytes> = rx.iter().collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(summary.size, chunks.iter().map(|c| c.len() as u64).sum::<u64>());
        for chunk in &chunks {
            let (_, rest) = split_frame(chunk).unwrap();
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn test_unclaimed_live_stream_fails_instead_of_blocking() {
        let config = EncoderConfig::default()
            .with_live_stream(true)
            .with_stream_capacity(2);
        let encoder = Encoder::build(tcp(), &config).unwrap();

        // More records than the channel holds, with nobody reading.
        for i in 0..3u16 {
            match encoder.encode(&tcp_layer(i, 80), 0) {
                Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
                other => panic!("expected BrokenPipe, got {other:?}"),
            }
        }
        assert!(encoder.take_stream().is_none());
        assert_eq!(encoder.records_written(), 0);
        encoder.destroy().unwrap();
    }

    #[test]
    fn test_skipped_layer_keeps_stream_claimable() {
        let config = EncoderConfig::default().with_live_stream(true);
        let encoder = Encoder::build(tcp(), &config).unwrap();

        encoder.encode(&udp_layer(1, 2), 0).unwrap();
        let rx = encoder.take_stream().unwrap();
        encoder.encode(&tcp_layer(1, 2), 0).unwrap();
        encoder.destroy().unwrap();
        assert_eq!(rx.iter().count(), 2);
    }

    #[test]
    fn test_payload_stripping() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path()).with_payloads(false);
        let encoder = Encoder::build(tcp(), &config).unwrap();
        encoder.encode(&tcp_layer(1, 2).payload(b"secret"), 0).unwrap();
        encoder.destroy().unwrap();

        let mut reader = DelimitedReader::new(FileDecoder::open(dir.path().join("TCP.ncap")).unwrap());
        let header: Header = reader.next_value().unwrap().unwrap();
        assert!(!header.contains_payloads);
        let record: Record = reader.next_value().unwrap().unwrap();
        assert_eq!(record.values.last(), Some(&Value::Null));
    }

    #[test]
    fn test_concurrent_encode_yields_whole_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path()).with_buffer(true).with_block_size(64);
        let encoder = Arc::new(Encoder::build(tcp(), &config).unwrap());

        let handles: Vec<_> = (0..4u16)
            .map(|worker| {
                let encoder = Arc::clone(&encoder);
                thread::spawn(move || {
                    for i in 0..50u16 {
                        encoder.encode(&tcp_layer(worker, i), i64::from(i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let encoder = Arc::try_unwrap(encoder).unwrap();
        assert_eq!(encoder.destroy().unwrap().records, 200);

        let mut reader = DelimitedReader::new(FileDecoder::open(dir.path().join("TCP.ncap")).unwrap());
        let _: Header = reader.next_value().unwrap().unwrap();
        let mut count = 0;
        while let Some(record) = reader.next_value::<Record>().unwrap() {
            assert_eq!(record.len(), 12);
            count += 1;
        }
        assert_eq!(count, 200);
    }

    #[test]
    fn test_tabular_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = EncoderConfig::new(dir.path()).with_tabular(true);
        let encoder = Encoder::build(EncoderDescriptor::builtin(LayerType::Udp), &config).unwrap();
        let layer = udp_layer(53, 5353).field("checksum", FieldValue::UInt16(0xbeef));
        encoder.encode(&layer, 2_000_000).unwrap();
        encoder.destroy().unwrap();

        let text = std::fs::read_to_string(dir.path().join("UDP.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,src_port,dst_port,length,checksum,payload");
        assert_eq!(lines[1], "2.000000,53,5353,8,48879,");
    }
}
