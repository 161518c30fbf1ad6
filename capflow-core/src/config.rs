//! Encoder configuration.
//!
//! [`EncoderConfig`] is read once at startup. It selects which encoders are
//! active and shapes every output pipeline: tabular vs. binary, buffering,
//! compression, and live streaming.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default write buffer size when the filesystem block size is unknown.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Default depth of the live-stream channel, in frames.
pub const DEFAULT_STREAM_CAPACITY: usize = 1024;

/// Default gzip level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Configuration for encoder selection and output pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Encoder names to activate. Empty means all.
    pub include: Vec<String>,
    /// Encoder names to leave out. Wins over `include`.
    pub exclude: Vec<String>,
    /// Wrap output files in a write buffer of `block_size` bytes.
    pub buffer: bool,
    /// Gzip the output files.
    pub compress: bool,
    /// Write CSV instead of length-delimited binary records.
    pub tabular: bool,
    /// Send binary frames to an in-process channel instead of a file.
    pub live_stream: bool,
    /// Directory output files are created in.
    pub output_dir: PathBuf,
    /// Write buffer size (bytes).
    pub block_size: usize,
    /// Gzip level, 0-9.
    pub compression_level: u32,
    /// Live-stream channel depth (frames).
    pub stream_capacity: usize,
    /// Input source label recorded in each file header.
    pub source: String,
    /// Whether payload columns carry packet bytes.
    pub include_payloads: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            buffer: false,
            compress: false,
            tabular: false,
            live_stream: false,
            output_dir: PathBuf::from("."),
            block_size: DEFAULT_BLOCK_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
            source: String::new(),
            include_payloads: true,
        }
    }
}

impl EncoderConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Split a comma-separated list of encoder names.
    ///
    /// Whitespace around names is trimmed and empty entries are dropped, so
    /// `"TCP, DNS,"` yields `["TCP", "DNS"]`. Duplicates keep their first
    /// position.
    pub fn parse_names(list: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    pub fn with_include(mut self, list: &str) -> Self {
        self.include = Self::parse_names(list);
        self
    }

    pub fn with_exclude(mut self, list: &str) -> Self {
        self.exclude = Self::parse_names(list);
        self
    }

    pub fn with_buffer(mut self, buffer: bool) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_tabular(mut self, tabular: bool) -> Self {
        self.tabular = tabular;
        self
    }

    pub fn with_live_stream(mut self, live_stream: bool) -> Self {
        self.live_stream = live_stream;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_stream_capacity(mut self, capacity: usize) -> Self {
        self.stream_capacity = capacity;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_payloads(mut self, include_payloads: bool) -> Self {
        self.include_payloads = include_payloads;
        self
    }

    /// Set `block_size` from the filesystem holding `output_dir`.
    ///
    /// Keeps the current value if the block size cannot be determined.
    pub fn with_probed_block_size(mut self) -> Self {
        if let Some(size) = probe_block_size(&self.output_dir) {
            self.block_size = size;
        }
        self
    }

    /// True if records go to a live channel rather than a file.
    ///
    /// Tabular output always goes to a file.
    pub fn streams_live(&self) -> bool {
        self.live_stream && !self.tabular
    }

    /// Check the pipeline options for conflicts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.streams_live() && (self.buffer || self.compress) {
            return Err(ConfigError::LiveStreamConflict {
                buffer: self.buffer,
                compress: self.compress,
            });
        }
        if self.stream_capacity == 0 {
            return Err(ConfigError::InvalidStreamCapacity);
        }
        if self.compression_level > 9 {
            return Err(ConfigError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        Ok(())
    }
}

/// Query the preferred I/O block size of the filesystem containing `dir`.
#[cfg(all(unix, feature = "probe-block-size"))]
pub fn probe_block_size(dir: &Path) -> Option<usize> {
    let stat = nix::sys::statvfs::statvfs(dir).ok()?;
    usize::try_from(stat.block_size()).ok().filter(|&size| size > 0)
}

/// Query the preferred I/O block size of the filesystem containing `dir`.
#[cfg(not(all(unix, feature = "probe-block-size")))]
pub fn probe_block_size(_dir: &Path) -> Option<usize> {
    None
}
