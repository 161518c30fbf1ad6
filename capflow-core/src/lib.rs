//! # capflow-core
//!
//! Record production for network captures.
//!
//! This crate turns decoded protocol layers into structured records and
//! writes them through per-protocol output pipelines. It does not decode
//! packets itself: the capture driver hands over [`DecodedLayer`] values and
//! a timestamp, and the [`EncoderRegistry`] routes each to its encoder.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use capflow_core::prelude::*;
//!
//! let config = EncoderConfig::new("out")
//!     .with_include("TCP,UDP,DNS")
//!     .with_compress(true)
//!     .with_source("eth0");
//! let registry = EncoderRegistry::init(&default_catalog(), &config).unwrap();
//!
//! let layer = DecodedLayer::new(LayerType::Udp)
//!     .field("src_port", FieldValue::UInt16(53))
//!     .field("dst_port", FieldValue::UInt16(40000))
//!     .field("length", FieldValue::UInt16(8));
//! registry.encode(&layer, 1_700_000_000_000_000).unwrap();
//!
//! for summary in registry.destroy().unwrap() {
//!     println!("{}: {} bytes", summary.name, summary.size);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        capflow-core                                 |
//! +---------------------------------------------------------------------+
//! |  layer/     - LayerType, DecodedLayer, FieldValue (inbound)         |
//! |  schema/    - RecordSchema, FieldDescriptor, DataKind               |
//! |  handler/   - LayerHandler trait, 29 protocol handlers              |
//! |  catalog    - EncoderDescriptor, EncoderCatalog, resolve()          |
//! |  encoder/   - Encoder, pipeline assembly                            |
//! |  registry   - EncoderRegistry (init / encode / destroy)             |
//! |  sink/      - SinkTarget, WriteSerializer                           |
//! |  io/        - framing, CSV, gzip, live channel                      |
//! |  reader     - RecordReader for .ncap files                          |
//! |  error      - Error types                                           |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Output formats
//!
//! | Mode | File | Contents |
//! |------|------|----------|
//! | binary | `<name>.ncap[.gz]` | varint-delimited bincode frames, header first |
//! | tabular | `<name>.csv[.gz]` | header row, then one row per record |
//! | live | none | one `Bytes` frame per channel message |
//!
//! ## Crate Features
//!
//! - `default` - `probe-block-size`
//! - `probe-block-size` - Query the filesystem block size via statvfs (unix)

pub mod catalog;
pub mod config;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod io;
pub mod layer;
pub mod prelude;
pub mod reader;
pub mod record;
pub mod registry;
pub mod schema;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types at crate root for convenience
pub use catalog::{default_catalog, resolve, EncoderCatalog, EncoderDescriptor};
pub use config::{
    probe_block_size, EncoderConfig, DEFAULT_BLOCK_SIZE, DEFAULT_COMPRESSION_LEVEL,
    DEFAULT_STREAM_CAPACITY,
};
pub use encoder::{Encoder, EncoderSummary, OutputFormat};
pub use error::{ConfigError, Error, FrameError, Result};
pub use handler::{BuiltinHandler, LayerHandler};
pub use layer::{DecodedLayer, FieldEntry, FieldValue, LayerType};
pub use reader::RecordReader;
pub use record::{Header, Record, Value};
pub use registry::EncoderRegistry;
pub use schema::{DataKind, FieldDescriptor, RecordSchema};
pub use sink::{ChunkSink, WriteSerializer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
