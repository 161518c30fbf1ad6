//! Network layer handlers: IPv4, IPv6 and its hop-by-hop header, ICMPv4,
//! ICMPv6 with its echo and neighbor discovery messages, IGMP.

use super::{field_allows, field_matches, LayerHandler};
use crate::layer::{DecodedLayer, LayerType};
use crate::schema::{DataKind, FieldDescriptor, RecordSchema};

/// IPv4 header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Handler;

const IPV4_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("version", DataKind::UInt8),
    FieldDescriptor::new("ihl", DataKind::UInt8),
    FieldDescriptor::nullable("tos", DataKind::UInt8),
    FieldDescriptor::new("total_length", DataKind::UInt16),
    FieldDescriptor::new("identification", DataKind::UInt16),
    FieldDescriptor::new("flags", DataKind::UInt8),
    FieldDescriptor::new("frag_offset", DataKind::UInt16),
    FieldDescriptor::new("ttl", DataKind::UInt8),
    FieldDescriptor::new("protocol", DataKind::UInt8),
    FieldDescriptor::nullable("checksum", DataKind::UInt16),
    FieldDescriptor::ip_field("src_ip"),
    FieldDescriptor::ip_field("dst_ip"),
    FieldDescriptor::nullable("options", DataKind::Binary),
];

impl LayerHandler for Ipv4Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Ipv4
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_IPv4", IPV4_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_matches(layer, "version", |v| v == 4) && field_allows(layer, "ihl", |ihl| ihl >= 5)
    }
}

/// IPv6 fixed header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Handler;

const IPV6_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("version", DataKind::UInt8),
    FieldDescriptor::new("traffic_class", DataKind::UInt8),
    FieldDescriptor::new("flow_label", DataKind::UInt32),
    FieldDescriptor::new("payload_length", DataKind::UInt16),
    FieldDescriptor::new("next_header", DataKind::UInt8),
    FieldDescriptor::new("hop_limit", DataKind::UInt8),
    FieldDescriptor::ip_field("src_ip"),
    FieldDescriptor::ip_field("dst_ip"),
];

impl LayerHandler for Ipv6Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Ipv6
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_IPv6", IPV6_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_matches(layer, "version", |v| v == 6)
            && field_allows(layer, "flow_label", |label| label < (1 << 20))
    }
}

/// IPv6 hop-by-hop extension header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6HopByHopHandler;

const IPV6_HOP_BY_HOP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("next_header", DataKind::UInt8),
    FieldDescriptor::new("header_length", DataKind::UInt8),
    FieldDescriptor::nullable("options", DataKind::List(&DataKind::Binary)),
];

impl LayerHandler for Ipv6HopByHopHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Ipv6HopByHop
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_IPv6HopByHop", IPV6_HOP_BY_HOP_FIELDS)
    }
}

/// ICMPv4 message handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv4Handler;

const ICMPV4_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("icmp_type", DataKind::UInt8),
    FieldDescriptor::new("icmp_code", DataKind::UInt8),
    FieldDescriptor::nullable("checksum", DataKind::UInt16),
    FieldDescriptor::nullable("identifier", DataKind::UInt16),
    FieldDescriptor::nullable("sequence", DataKind::UInt16),
];

impl LayerHandler for Icmpv4Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv4
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_ICMPv4", ICMPV4_FIELDS)
    }
}

/// ICMPv6 message handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6Handler;

const ICMPV6_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("icmp_type", DataKind::UInt8),
    FieldDescriptor::new("icmp_code", DataKind::UInt8),
    FieldDescriptor::nullable("checksum", DataKind::UInt16),
];

impl LayerHandler for Icmpv6Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv6
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_ICMPv6", ICMPV6_FIELDS)
    }
}

/// ICMPv6 echo request and reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6EchoHandler;

const ICMPV6_ECHO_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("identifier", DataKind::UInt16),
    FieldDescriptor::new("seq_number", DataKind::UInt16),
];

impl LayerHandler for Icmpv6EchoHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv6Echo
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_ICMPv6Echo", ICMPV6_ECHO_FIELDS)
    }
}

/// Neighbor discovery options, rendered as `type=hex`.
const ND_OPTIONS: FieldDescriptor =
    FieldDescriptor::nullable("options", DataKind::List(&DataKind::String));

/// ICMPv6 neighbor solicitation (type 135).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6NeighborSolicitationHandler;

const ICMPV6_NEIGHBOR_SOLICITATION_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::ip_field("target_address"),
    ND_OPTIONS,
];

impl LayerHandler for Icmpv6NeighborSolicitationHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv6NeighborSolicitation
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new(
            "NC_ICMPv6NeighborSolicitation",
            ICMPV6_NEIGHBOR_SOLICITATION_FIELDS,
        )
    }
}

/// ICMPv6 router solicitation (type 133).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6RouterSolicitationHandler;

const ICMPV6_ROUTER_SOLICITATION_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::timestamp(), ND_OPTIONS];

impl LayerHandler for Icmpv6RouterSolicitationHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv6RouterSolicitation
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new(
            "NC_ICMPv6RouterSolicitation",
            ICMPV6_ROUTER_SOLICITATION_FIELDS,
        )
    }
}

/// ICMPv6 neighbor advertisement (type 136).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6NeighborAdvertisementHandler;

const ICMPV6_NEIGHBOR_ADVERTISEMENT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("flags", DataKind::UInt8)
        .with_description("R, S and O bits in the top three bits"),
    FieldDescriptor::ip_field("target_address"),
    ND_OPTIONS,
];

impl LayerHandler for Icmpv6NeighborAdvertisementHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv6NeighborAdvertisement
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new(
            "NC_ICMPv6NeighborAdvertisement",
            ICMPV6_NEIGHBOR_ADVERTISEMENT_FIELDS,
        )
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // The low five bits are reserved.
        field_allows(layer, "flags", |flags| flags & 0x1f == 0)
    }
}

/// ICMPv6 router advertisement (type 134).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6RouterAdvertisementHandler;

const ICMPV6_ROUTER_ADVERTISEMENT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("hop_limit", DataKind::UInt8),
    FieldDescriptor::new("flags", DataKind::UInt8),
    FieldDescriptor::new("router_lifetime", DataKind::UInt16),
    FieldDescriptor::new("reachable_time", DataKind::UInt32),
    FieldDescriptor::new("retrans_timer", DataKind::UInt32),
    ND_OPTIONS,
];

impl LayerHandler for Icmpv6RouterAdvertisementHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Icmpv6RouterAdvertisement
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new(
            "NC_ICMPv6RouterAdvertisement",
            ICMPV6_ROUTER_ADVERTISEMENT_FIELDS,
        )
    }
}

/// IGMP message handler (v1 to v3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgmpHandler;

const IGMP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("igmp_type", DataKind::UInt8),
    FieldDescriptor::new("version", DataKind::UInt8),
    FieldDescriptor::nullable("max_response_time", DataKind::UInt8),
    FieldDescriptor::nullable("checksum", DataKind::UInt16),
    FieldDescriptor::ip_field("group_address").set_nullable(true),
    FieldDescriptor::nullable("num_records", DataKind::UInt16),
];

impl LayerHandler for IgmpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Igmp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_IGMP", IGMP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_matches(layer, "version", |v| (1..=3).contains(&v))
    }
}
