//! Output and input byte plumbing.
//!
//! - [`CompressWriter`] / [`DecompressReader`] - optional gzip on either side
//! - [`delimited`] - varint length-delimited frames
//! - [`tabular`] - CSV rows
//! - [`ChannelWriter`] - live in-process stream

mod channel;
mod compress;
mod decompress;
pub mod delimited;
pub mod tabular;

pub use channel::{live_stream, ChannelWriter};
pub use compress::CompressWriter;
pub use decompress::{Compression, DecompressReader, FileDecoder};
pub use delimited::{encode_frame, frame_bytes, split_frame, DelimitedReader};
