//! The decoded-layer object passed to `Encoder::encode`.

use smallvec::SmallVec;

use super::{FieldValue, LayerType};

/// Field entry: (field_name, value).
/// Field names are static strings defined by the decoder.
pub type FieldEntry<'data> = (&'static str, FieldValue<'data>);

/// One decoded protocol layer of a captured packet.
///
/// Uses SmallVec for inline storage; most layers have fewer than 16 fields.
#[derive(Debug, Clone)]
pub struct DecodedLayer<'data> {
    /// Which protocol this layer belongs to.
    pub layer_type: LayerType,

    /// Decoded field values.
    pub fields: SmallVec<[FieldEntry<'data>; 16]>,

    /// Bytes following this layer's header.
    pub payload: &'data [u8],

    /// Decode error if the layer was only partially understood.
    pub error: Option<String>,
}

impl<'data> DecodedLayer<'data> {
    /// Create an empty layer of the given type.
    pub fn new(layer_type: LayerType) -> Self {
        Self {
            layer_type,
            fields: SmallVec::new(),
            payload: &[],
            error: None,
        }
    }

    /// Create a layer from already-decoded fields.
    pub fn with_fields(
        layer_type: LayerType,
        fields: SmallVec<[FieldEntry<'data>; 16]>,
        payload: &'data [u8],
    ) -> Self {
        Self {
            layer_type,
            fields,
            payload,
            error: None,
        }
    }

    /// Create a layer that failed to decode.
    pub fn malformed(layer_type: LayerType, error: impl Into<String>) -> Self {
        Self {
            layer_type,
            fields: SmallVec::new(),
            payload: &[],
            error: Some(error.into()),
        }
    }

    /// Builder: append a field.
    pub fn field(mut self, name: &'static str, value: FieldValue<'data>) -> Self {
        self.fields.push((name, value));
        self
    }

    /// Builder: set the payload.
    pub fn payload(mut self, payload: &'data [u8]) -> Self {
        self.payload = payload;
        self
    }

    /// Get a field value by name (linear search, but N is small).
    pub fn get(&self, name: &str) -> Option<&FieldValue<'data>> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    /// Get a numeric field value by name.
    pub fn get_u64(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(FieldValue::as_u64)
    }

    /// Check if decoding was successful.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let payload = [0xde, 0xad];
        let layer = DecodedLayer::new(LayerType::Udp)
            .field("src_port", FieldValue::UInt16(53))
            .field("dst_port", FieldValue::UInt16(49152))
            .payload(&payload);

        assert!(layer.is_ok());
        assert_eq!(layer.get("src_port"), Some(&FieldValue::UInt16(53)));
        assert_eq!(layer.get_u64("dst_port"), Some(49152));
        assert!(layer.get("length").is_none());
        assert_eq!(layer.payload, &payload);
    }

    #[test]
    fn test_malformed() {
        let layer = DecodedLayer::malformed(LayerType::Tcp, "TCP parse error: truncated");
        assert!(!layer.is_ok());
        assert!(layer.fields.is_empty());
    }
}
