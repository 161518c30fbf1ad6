//! Registry of active encoders.
//!
//! Built once at startup from the catalog and configuration, then shared
//! (typically behind an `Arc`) with every worker that encodes layers.
//! Shutting down requires ownership, so all workers must have released
//! their handles first.

use bytes::Bytes;
use crossbeam_channel::Receiver;

use crate::catalog::{resolve, EncoderCatalog};
use crate::config::EncoderConfig;
use crate::encoder::{Encoder, EncoderSummary};
use crate::error::Result;
use crate::layer::{DecodedLayer, LayerType};

/// Active encoders keyed by layer type.
#[derive(Debug)]
pub struct EncoderRegistry {
    encoders: Vec<Encoder>,
    index: [Option<usize>; LayerType::COUNT],
}

impl EncoderRegistry {
    /// Resolve the active set and build an encoder for each.
    ///
    /// On any failure the encoders built so far are dropped, closing their
    /// files, and the error is returned.
    pub fn init(catalog: &EncoderCatalog, config: &EncoderConfig) -> Result<Self> {
        let active = resolve(catalog, config)?;
        config.validate()?;

        let mut encoders = Vec::with_capacity(active.len());
        let mut index = [None; LayerType::COUNT];
        for descriptor in active {
            let encoder = Encoder::build(descriptor, config)?;
            index[descriptor.layer_type.index()] = Some(encoders.len());
            encoders.push(encoder);
        }

        tracing::info!(
            "initialized {} layer encoders | buffer size = {} bytes",
            encoders.len(),
            config.block_size
        );

        Ok(Self { encoders, index })
    }

    /// The encoder for a layer type, if active.
    #[inline]
    pub fn get(&self, layer_type: LayerType) -> Option<&Encoder> {
        self.index[layer_type.index()].map(|i| &self.encoders[i])
    }

    pub fn is_active(&self, layer_type: LayerType) -> bool {
        self.index[layer_type.index()].is_some()
    }

    /// Route a decoded layer to its encoder. Inactive layer types are a no-op.
    pub fn encode(&self, layer: &DecodedLayer<'_>, timestamp_us: i64) -> Result<()> {
        match self.get(layer.layer_type) {
            Some(encoder) => encoder.encode(layer, timestamp_us),
            None => Ok(()),
        }
    }

    /// Claim the live-stream receiver for a layer type.
    pub fn take_stream(&self, layer_type: LayerType) -> Option<Receiver<Bytes>> {
        self.get(layer_type).and_then(Encoder::take_stream)
    }

    /// Active encoders, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Encoder> {
        self.encoders.iter()
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Destroy every encoder.
    ///
    /// All encoders are closed even if some fail. Failures are logged and
    /// the first one is returned.
    pub fn destroy(self) -> Result<Vec<EncoderSummary>> {
        let mut summaries = Vec::with_capacity(self.encoders.len());
        let mut first_error = None;

        for encoder in self.encoders {
            let name = encoder.name();
            match encoder.destroy() {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    tracing::error!("failed to close {} encoder: {}", name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(summaries),
        }
    }
}
