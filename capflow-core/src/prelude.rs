//! Convenient re-exports for common usage.
//!
//! This module provides a curated set of the most commonly used types
//! from capflow-core, allowing you to import them with a single `use` statement.
//!
//! # Example
//!
//! ```rust,no_run
//! use capflow_core::prelude::*;
//!
//! // Every built-in encoder, gzip output under ./out
//! let config = EncoderConfig::new("out").with_compress(true);
//! let registry = EncoderRegistry::init(&default_catalog(), &config).unwrap();
//! ```

// Layer types
pub use crate::layer::{DecodedLayer, FieldValue, LayerType};

// Schema types
pub use crate::schema::{DataKind, FieldDescriptor, RecordSchema};

// Encoder types
pub use crate::catalog::{default_catalog, resolve, EncoderCatalog, EncoderDescriptor};
pub use crate::config::EncoderConfig;
pub use crate::encoder::{Encoder, EncoderSummary};
pub use crate::handler::LayerHandler;
pub use crate::registry::EncoderRegistry;

// Records
pub use crate::reader::RecordReader;
pub use crate::record::{Header, Record, Value};

// Error types
pub use crate::error::{Error, Result};
