//! Error types for capflow-core.
//!
//! This module provides structured error types for all capflow-core operations:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`ConfigError`] - Invalid configuration or failed encoder initialization
//! - [`FrameError`] - Malformed length-delimited frames when reading back
//!
//! Configuration errors only occur while encoders are being set up. Once an
//! encoder is running, failures surface as [`Error::Io`] or
//! [`Error::Serialize`] from the call that hit them.

use std::io;

use thiserror::Error;

/// Main error type for capflow-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration or encoder setup failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialize(#[from] bincode::Error),

    /// Malformed frame in a binary record file
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),
}

/// Errors related to encoder configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Name in the include or exclude list matches no encoder
    #[error("unknown encoder: {name:?}")]
    UnknownEncoder { name: String },

    /// Live streaming requested together with buffering or compression
    #[error("live stream cannot be combined with buffer ({buffer}) or compress ({compress})")]
    LiveStreamConflict { buffer: bool, compress: bool },

    /// Channel depth of zero
    #[error("stream capacity must be at least 1")]
    InvalidStreamCapacity,

    /// Gzip level outside 0..=9
    #[error("invalid compression level {level} (expected 0-9)")]
    InvalidCompressionLevel { level: u32 },

    /// Header record could not be written when the sink was opened
    #[error("{encoder}: failed to write header: {source}")]
    HeaderWrite {
        encoder: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Errors related to length-delimited framing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Stream ended partway through a frame
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Length prefix longer than ten bytes or overflowing u64
    #[error("malformed length prefix")]
    BadLength,

    /// Length prefix larger than the reader accepts
    #[error("frame of {len} bytes exceeds limit of {limit}")]
    TooLarge { len: u64, limit: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
