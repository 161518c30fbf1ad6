//! Link layer handlers: Ethernet, ARP, 802.1Q, 802.11, LLC, SNAP, LLDP and
//! the Ethernet configuration testing protocol.

use super::{field_allows, field_matches, LayerHandler};
use crate::layer::{DecodedLayer, LayerType};
use crate::schema::{DataKind, FieldDescriptor, RecordSchema};

/// Ethernet II frame handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHandler;

const ETHERNET_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::mac_field("src_mac"),
    FieldDescriptor::mac_field("dst_mac"),
    FieldDescriptor::new("ethertype", DataKind::UInt16),
    FieldDescriptor::nullable("length", DataKind::UInt16),
    FieldDescriptor::payload(),
];

impl LayerHandler for EthernetHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Ethernet
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_Ethernet", ETHERNET_FIELDS)
    }
}

/// ARP packet handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpHandler;

const ARP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("hw_type", DataKind::UInt16),
    FieldDescriptor::new("proto_type", DataKind::UInt16),
    FieldDescriptor::new("hw_size", DataKind::UInt8),
    FieldDescriptor::new("proto_size", DataKind::UInt8),
    FieldDescriptor::new("operation", DataKind::UInt16)
        .with_description("1 = request, 2 = reply"),
    FieldDescriptor::mac_field("sender_mac"),
    FieldDescriptor::ip_field("sender_ip"),
    FieldDescriptor::mac_field("target_mac"),
    FieldDescriptor::ip_field("target_ip"),
];

impl LayerHandler for ArpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Arp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_ARP", ARP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_matches(layer, "operation", |op| op == 1 || op == 2)
    }
}

/// IEEE 802.1Q VLAN tag handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot1QHandler;

const DOT1Q_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("priority", DataKind::UInt8),
    FieldDescriptor::new("drop_eligible", DataKind::Bool),
    FieldDescriptor::new("vlan_id", DataKind::UInt16),
    FieldDescriptor::new("ethertype", DataKind::UInt16),
];

impl LayerHandler for Dot1QHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Dot1Q
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_Dot1Q", DOT1Q_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // 0xFFF is reserved; PCP is three bits.
        field_matches(layer, "vlan_id", |id| id < 0xFFF)
            && field_allows(layer, "priority", |pcp| pcp < 8)
    }
}

/// IEEE 802.11 MAC header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot11Handler;

const DOT11_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("frame_type", DataKind::UInt8)
        .with_description("0 = management, 1 = control, 2 = data, 3 = extension"),
    FieldDescriptor::new("subtype", DataKind::UInt8),
    FieldDescriptor::new("proto", DataKind::UInt8),
    FieldDescriptor::new("flags", DataKind::UInt8),
    FieldDescriptor::new("duration_id", DataKind::UInt16),
    FieldDescriptor::mac_field("address1"),
    FieldDescriptor::mac_field("address2").set_nullable(true),
    FieldDescriptor::mac_field("address3").set_nullable(true),
    FieldDescriptor::mac_field("address4").set_nullable(true),
    FieldDescriptor::nullable("sequence_number", DataKind::UInt16),
    FieldDescriptor::nullable("fragment_number", DataKind::UInt8),
    FieldDescriptor::nullable("checksum", DataKind::UInt32),
];

impl LayerHandler for Dot11Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Dot11
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_Dot11", DOT11_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Protocol version 0 is the only one defined.
        field_matches(layer, "frame_type", |t| t < 4)
            && field_matches(layer, "subtype", |st| st < 16)
            && field_allows(layer, "proto", |v| v == 0)
    }
}

/// IEEE 802.2 LLC header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlcHandler;

const LLC_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("dsap", DataKind::UInt8),
    FieldDescriptor::new("ig", DataKind::Bool),
    FieldDescriptor::new("ssap", DataKind::UInt8),
    FieldDescriptor::new("cr", DataKind::Bool),
    FieldDescriptor::new("control", DataKind::UInt16),
];

impl LayerHandler for LlcHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Llc
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_LLC", LLC_FIELDS)
    }
}

/// SNAP extension header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapHandler;

const SNAP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("oui", DataKind::UInt32)
        .with_description("Organizationally unique identifier (24 bits)"),
    FieldDescriptor::new("ethertype", DataKind::UInt16),
];

impl LayerHandler for SnapHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Snap
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_SNAP", SNAP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_allows(layer, "oui", |oui| oui <= 0xFF_FFFF)
    }
}

/// LLDP frame handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkLayerDiscoveryHandler;

const LLDP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("chassis_id", DataKind::String),
    FieldDescriptor::new("port_id", DataKind::String),
    FieldDescriptor::new("ttl", DataKind::UInt16),
    FieldDescriptor::nullable("system_name", DataKind::String),
    FieldDescriptor::nullable("values", DataKind::List(&DataKind::String))
        .with_description("Remaining TLVs, rendered as type=value"),
];

impl LayerHandler for LinkLayerDiscoveryHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::LinkLayerDiscovery
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_LinkLayerDiscovery", LLDP_FIELDS)
    }
}

/// Ethernet configuration testing protocol (loopback) header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetCtpHandler;

const ETHERNET_CTP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("skip_count", DataKind::UInt16),
];

impl LayerHandler for EthernetCtpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::EthernetCtp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_EthernetCTP", ETHERNET_CTP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // The skip count is a byte offset into 2-byte aligned function blocks.
        field_matches(layer, "skip_count", |skip| skip % 2 == 0)
    }
}

/// Ethernet CTP reply function block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetCtpReplyHandler;

const ETHERNET_CTP_REPLY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("function", DataKind::UInt16),
    FieldDescriptor::new("receipt_number", DataKind::UInt16),
    FieldDescriptor::nullable("data", DataKind::Binary),
];

impl LayerHandler for EthernetCtpReplyHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::EthernetCtpReply
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_EthernetCTPReply", ETHERNET_CTP_REPLY_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Function 1 is reply.
        field_matches(layer, "function", |f| f == 1)
    }
}

/// Decoded optional LLDP TLVs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkLayerDiscoveryInfoHandler;

const LLDP_INFO_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::nullable("port_description", DataKind::String),
    FieldDescriptor::nullable("sys_name", DataKind::String),
    FieldDescriptor::nullable("sys_description", DataKind::String),
    FieldDescriptor::nullable("sys_capabilities", DataKind::UInt16),
    FieldDescriptor::nullable("enabled_capabilities", DataKind::UInt16),
    FieldDescriptor::ip_field("mgmt_address").set_nullable(true),
    FieldDescriptor::nullable("org_tlvs", DataKind::List(&DataKind::String))
        .with_description("Organisation-specific TLVs, rendered as oui:subtype=hex"),
    FieldDescriptor::nullable("unknown", DataKind::List(&DataKind::String)),
];

impl LayerHandler for LinkLayerDiscoveryInfoHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::LinkLayerDiscoveryInfo
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_LinkLayerDiscoveryInfo", LLDP_INFO_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Enabled capabilities are a subset of the advertised ones.
        match (layer.get_u64("sys_capabilities"), layer.get_u64("enabled_capabilities")) {
            (Some(sys), Some(enabled)) => enabled & !sys == 0,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use compact_str::CompactString;

    use super::*;
    use crate::layer::FieldValue;
    use crate::record::Value;
    use crate::test_utils::ethernet_layer;

    #[test]
    fn test_ethernet_record() {
        let payload = [0x45, 0x00];
        let layer = ethernet_layer(0x0800).payload(&payload);
        let record = EthernetHandler.encode(&layer, 0).unwrap();

        assert_eq!(record.get(1), Some(&Value::Mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])));
        assert_eq!(record.get(3), Some(&Value::UInt(0x0800)));
        assert_eq!(record.get(5), Some(&Value::Bytes(payload.to_vec())));
    }

    fn arp_layer(operation: u16) -> DecodedLayer<'static> {
        DecodedLayer::new(LayerType::Arp)
            .field("hw_type", FieldValue::UInt16(1))
            .field("proto_type", FieldValue::UInt16(0x0800))
            .field("hw_size", FieldValue::UInt8(6))
            .field("proto_size", FieldValue::UInt8(4))
            .field("operation", FieldValue::UInt16(operation))
            .field("sender_mac", FieldValue::MacAddr([0, 1, 2, 3, 4, 5]))
            .field("sender_ip", FieldValue::ipv4(&[10, 0, 0, 1]))
            .field("target_mac", FieldValue::MacAddr([0; 6]))
            .field("target_ip", FieldValue::ipv4(&[10, 0, 0, 2]))
    }

    #[test]
    fn test_arp_operations() {
        let record = ArpHandler.encode(&arp_layer(1), 0).unwrap();
        assert_eq!(
            record.get(9),
            Some(&Value::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))))
        );
        assert!(ArpHandler.encode(&arp_layer(2), 0).is_some());
        assert!(ArpHandler.encode(&arp_layer(9), 0).is_none());
    }

    #[test]
    fn test_dot1q_reserved_vlan_skipped() {
        let tag = |vlan: u16| {
            DecodedLayer::new(LayerType::Dot1Q)
                .field("priority", FieldValue::UInt8(3))
                .field("drop_eligible", FieldValue::Bool(false))
                .field("vlan_id", FieldValue::UInt16(vlan))
                .field("ethertype", FieldValue::UInt16(0x0800))
        };
        assert!(Dot1QHandler.encode(&tag(100), 0).is_some());
        assert!(Dot1QHandler.encode(&tag(0xFFF), 0).is_none());
    }

    #[test]
    fn test_lldp_string_list() {
        let layer = DecodedLayer::new(LayerType::LinkLayerDiscovery)
            .field("chassis_id", FieldValue::Str("switch-1"))
            .field("port_id", FieldValue::Str("ge-0/0/1"))
            .field("ttl", FieldValue::UInt16(120))
            .field(
                "values",
                FieldValue::List(vec![FieldValue::OwnedString(CompactString::new(
                    "8=mgmt",
                ))]),
            );
        let record = LinkLayerDiscoveryHandler.encode(&layer, 0).unwrap();
        assert_eq!(record.get(4), Some(&Value::Null));
        assert_eq!(
            record.get(5),
            Some(&Value::List(vec![Value::Str("8=mgmt".into())]))
        );
    }

    fn dot11_layer(frame_type: u8) -> DecodedLayer<'static> {
        DecodedLayer::new(LayerType::Dot11)
            .field("frame_type", FieldValue::UInt8(frame_type))
            .field("subtype", FieldValue::UInt8(8))
            .field("proto", FieldValue::UInt8(0))
            .field("flags", FieldValue::UInt8(0))
            .field("duration_id", FieldValue::UInt16(0))
            .field("address1", FieldValue::MacAddr([0xff; 6]))
            .field("address2", FieldValue::MacAddr([0, 1, 2, 3, 4, 5]))
    }

    #[test]
    fn test_dot11_frame_types() {
        let record = Dot11Handler.encode(&dot11_layer(0), 0).unwrap();
        assert_eq!(record.len(), DOT11_FIELDS.len());
        assert_eq!(record.get(7), Some(&Value::Mac([0, 1, 2, 3, 4, 5])));
        assert_eq!(record.get(8), Some(&Value::Null));
        assert!(Dot11Handler.encode(&dot11_layer(4), 0).is_none());
    }

    #[test]
    fn test_ethernet_ctp_skip_count() {
        let ctp = |skip: u16| {
            DecodedLayer::new(LayerType::EthernetCtp).field("skip_count", FieldValue::UInt16(skip))
        };
        assert!(EthernetCtpHandler.encode(&ctp(0), 0).is_some());
        assert!(EthernetCtpHandler.encode(&ctp(3), 0).is_none());
    }

    #[test]
    fn test_ethernet_ctp_reply_function() {
        let reply = |function: u16| {
            DecodedLayer::new(LayerType::EthernetCtpReply)
                .field("function", FieldValue::UInt16(function))
                .field("receipt_number", FieldValue::UInt16(42))
        };
        let record = EthernetCtpReplyHandler.encode(&reply(1), 0).unwrap();
        assert_eq!(record.get(2), Some(&Value::UInt(42)));
        assert!(EthernetCtpReplyHandler.encode(&reply(2), 0).is_none());
    }

    #[test]
    fn test_lldp_info_capabilities() {
        let info = |enabled: u16| {
            DecodedLayer::new(LayerType::LinkLayerDiscoveryInfo)
                .field("sys_name", FieldValue::Str("core-sw"))
                .field("sys_capabilities", FieldValue::UInt16(0x0014))
                .field("enabled_capabilities", FieldValue::UInt16(enabled))
        };
        let record = LinkLayerDiscoveryInfoHandler.encode(&info(0x0004), 0).unwrap();
        assert_eq!(record.get(2), Some(&Value::Str("core-sw".into())));
        assert_eq!(record.get(1), Some(&Value::Null));
        assert!(LinkLayerDiscoveryInfoHandler.encode(&info(0x0001), 0).is_none());
    }
}
