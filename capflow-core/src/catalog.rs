//! Encoder catalog and configuration resolution.
//!
//! The catalog lists one [`EncoderDescriptor`] per supported layer type, in
//! a fixed order. [`resolve`] narrows it to the encoders a configuration
//! asks for.

use crate::config::EncoderConfig;
use crate::error::{ConfigError, Result};
use crate::handler::{BuiltinHandler, LayerHandler};
use crate::layer::{DecodedLayer, LayerType};
use crate::record::Record;
use crate::schema::RecordSchema;

/// Static description of one protocol encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderDescriptor {
    pub layer_type: LayerType,
    pub schema: RecordSchema,
    pub handler: BuiltinHandler,
}

impl EncoderDescriptor {
    /// Descriptor for a built-in layer type.
    pub fn builtin(layer_type: LayerType) -> Self {
        let handler = BuiltinHandler::for_layer(layer_type);
        Self {
            layer_type,
            schema: handler.schema(),
            handler,
        }
    }

    /// Encoder name, as used in include/exclude lists and file names.
    pub fn name(&self) -> &'static str {
        self.layer_type.name()
    }

    /// Run the handler on a decoded layer.
    #[inline]
    pub fn encode(&self, layer: &DecodedLayer<'_>, timestamp_us: i64) -> Option<Record> {
        self.handler.encode(layer, timestamp_us)
    }
}

/// Ordered, read-only set of encoder descriptors.
#[derive(Debug, Clone)]
pub struct EncoderCatalog {
    descriptors: Vec<EncoderDescriptor>,
}

impl EncoderCatalog {
    /// Catalog of every built-in encoder, in layer-type order.
    pub fn builtin() -> Self {
        Self {
            descriptors: LayerType::ALL
                .iter()
                .map(|&layer_type| EncoderDescriptor::builtin(layer_type))
                .collect(),
        }
    }

    /// Look up a descriptor by exact name.
    pub fn get(&self, name: &str) -> Option<&EncoderDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(EncoderDescriptor::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncoderDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for EncoderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Create a catalog with all built-in encoders.
pub fn default_catalog() -> EncoderCatalog {
    EncoderCatalog::builtin()
}

/// Compute the active encoder set for a configuration.
///
/// Every include and exclude name must exist in the catalog. The result
/// keeps catalog order; a name in both lists is excluded.
pub fn resolve(catalog: &EncoderCatalog, config: &EncoderConfig) -> Result<Vec<EncoderDescriptor>> {
    if let Some(unknown) = config
        .include
        .iter()
        .chain(config.exclude.iter())
        .find(|name| !catalog.contains(name))
    {
        return Err(ConfigError::UnknownEncoder {
            name: unknown.clone(),
        }
        .into());
    }

    let selected = |name: &str| {
        (config.include.is_empty() || config.include.iter().any(|n| n == name))
            && !config.exclude.iter().any(|n| n == name)
    };

    Ok(catalog
        .iter()
        .filter(|d| selected(d.name()))
        .copied()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn names(active: &[EncoderDescriptor]) -> Vec<&'static str> {
        active.iter().map(EncoderDescriptor::name).collect()
    }

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), LayerType::COUNT);
        let names = catalog.names();
        assert_eq!(catalog.len(), 29);
        assert_eq!(&names[..4], &["TCP", "UDP", "IPv4", "IPv6"]);
        assert_eq!(
            &names[7..11],
            &[
                "ICMPv6",
                "ICMPv6Echo",
                "ICMPv6NeighborSolicitation",
                "ICMPv6RouterSolicitation"
            ]
        );
        assert_eq!(&names[14..16], &["Dot1Q", "Dot11"]);
        assert_eq!(
            &names[23..],
            &[
                "LinkLayerDiscovery",
                "ICMPv6NeighborAdvertisement",
                "ICMPv6RouterAdvertisement",
                "EthernetCTP",
                "EthernetCTPReply",
                "LinkLayerDiscoveryInfo"
            ]
        );
    }

    #[test]
    fn test_descriptor_schema_matches_handler() {
        for descriptor in default_catalog().iter() {
            assert_eq!(descriptor.schema, descriptor.handler.schema());
            assert_eq!(descriptor.handler.layer_type(), descriptor.layer_type);
        }
    }

    #[test]
    fn test_resolve_empty_config_is_full_catalog() {
        let catalog = default_catalog();
        let active = resolve(&catalog, &EncoderConfig::default()).unwrap();
        assert_eq!(names(&active), catalog.names());
    }

    #[test]
    fn test_resolve_include_keeps_catalog_order() {
        let config = EncoderConfig::default().with_include("DNS,TCP");
        let active = resolve(&default_catalog(), &config).unwrap();
        assert_eq!(names(&active), vec!["TCP", "DNS"]);
    }

    #[test]
    fn test_resolve_exclude_wins() {
        let config = EncoderConfig::default()
            .with_include("TCP,UDP")
            .with_exclude("TCP");
        let active = resolve(&default_catalog(), &config).unwrap();
        assert_eq!(names(&active), vec!["UDP"]);
    }

    #[test]
    fn test_resolve_unknown_name() {
        let config = EncoderConfig::default().with_exclude("TCP,tcp");
        match resolve(&default_catalog(), &config) {
            Err(Error::Config(ConfigError::UnknownEncoder { name })) => assert_eq!(name, "tcp"),
            other => panic!("expected UnknownEncoder, got {other:?}"),
        }
    }
}
