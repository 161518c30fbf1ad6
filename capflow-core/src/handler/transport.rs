//! Transport layer handlers: TCP, UDP, SCTP.

use super::{field_allows, LayerHandler};
use crate::layer::{DecodedLayer, LayerType};
use crate::schema::{DataKind, FieldDescriptor, RecordSchema};

/// TCP segment handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpHandler;

const TCP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::src_port(),
    FieldDescriptor::dst_port(),
    FieldDescriptor::new("seq_num", DataKind::UInt32),
    FieldDescriptor::new("ack_num", DataKind::UInt32),
    FieldDescriptor::new("data_offset", DataKind::UInt8)
        .with_description("Header length in 32-bit words"),
    FieldDescriptor::new("flags", DataKind::UInt16),
    FieldDescriptor::new("window", DataKind::UInt16),
    FieldDescriptor::nullable("checksum", DataKind::UInt16),
    FieldDescriptor::nullable("urgent_ptr", DataKind::UInt16),
    FieldDescriptor::nullable("options", DataKind::Binary),
    FieldDescriptor::payload(),
];

impl LayerHandler for TcpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Tcp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_TCP", TCP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Minimum header is five words; anything smaller is garbage.
        field_allows(layer, "data_offset", |off| (5..=15).contains(&off))
    }
}

/// UDP datagram handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHandler;

const UDP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::src_port(),
    FieldDescriptor::dst_port(),
    FieldDescriptor::new("length", DataKind::UInt16),
    FieldDescriptor::nullable("checksum", DataKind::UInt16),
    FieldDescriptor::payload(),
];

impl LayerHandler for UdpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Udp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_UDP", UDP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_allows(layer, "length", |len| len >= 8)
    }
}

/// SCTP common header handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SctpHandler;

const SCTP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::src_port(),
    FieldDescriptor::dst_port(),
    FieldDescriptor::new("verification_tag", DataKind::UInt32),
    FieldDescriptor::nullable("checksum", DataKind::UInt32),
];

impl LayerHandler for SctpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Sctp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_SCTP", SCTP_FIELDS)
    }
}
