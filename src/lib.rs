//! capflow - Structured records from network captures.
//!
//! This crate re-exports the encoder engine from `capflow-core` and adds
//! reporting helpers for the capture driver.
//!
//! # Example
//!
//! ```no_run
//! use capflow::prelude::*;
//! use capflow::summary::write_summary;
//!
//! fn main() -> capflow::Result<()> {
//!     let config = EncoderConfig::new("out")
//!         .with_exclude("Ethernet")
//!         .with_buffer(true)
//!         .with_probed_block_size();
//!     let registry = EncoderRegistry::init(&default_catalog(), &config)?;
//!
//!     // ... hand decoded layers to registry.encode() ...
//!
//!     let summaries = registry.destroy()?;
//!     write_summary(&summaries, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod summary;

pub use capflow_core::*;
