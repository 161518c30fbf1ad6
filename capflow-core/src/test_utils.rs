//! Test utilities for encoder tests.
//!
//! Builders for decoded layers shaped the way the capture decoder hands
//! them over, with sensible defaults for every required column. The
//! builders are generic over the packet lifetime so tests can attach
//! payloads borrowed from locals.

use crate::layer::{DecodedLayer, FieldValue, LayerType};

/// A TCP layer with a plain 20-byte header and the ACK flag set.
pub fn tcp_layer<'data>(src_port: u16, dst_port: u16) -> DecodedLayer<'data> {
    DecodedLayer::new(LayerType::Tcp)
        .field("src_port", FieldValue::UInt16(src_port))
        .field("dst_port", FieldValue::UInt16(dst_port))
        .field("seq_num", FieldValue::UInt32(1000))
        .field("ack_num", FieldValue::UInt32(2000))
        .field("data_offset", FieldValue::UInt8(5))
        .field("flags", FieldValue::UInt16(0x010))
        .field("window", FieldValue::UInt16(65535))
}

/// A UDP layer with an empty payload.
pub fn udp_layer<'data>(src_port: u16, dst_port: u16) -> DecodedLayer<'data> {
    DecodedLayer::new(LayerType::Udp)
        .field("src_port", FieldValue::UInt16(src_port))
        .field("dst_port", FieldValue::UInt16(dst_port))
        .field("length", FieldValue::UInt16(8))
}

/// An IPv4 layer carrying TCP. `version` is always the first field.
pub fn ipv4_layer<'data>(src: [u8; 4], dst: [u8; 4]) -> DecodedLayer<'data> {
    DecodedLayer::new(LayerType::Ipv4)
        .field("version", FieldValue::UInt8(4))
        .field("ihl", FieldValue::UInt8(5))
        .field("total_length", FieldValue::UInt16(40))
        .field("identification", FieldValue::UInt16(0x1234))
        .field("flags", FieldValue::UInt8(0x2))
        .field("frag_offset", FieldValue::UInt16(0))
        .field("ttl", FieldValue::UInt8(64))
        .field("protocol", FieldValue::UInt8(6))
        .field("src_ip", FieldValue::ipv4(&src))
        .field("dst_ip", FieldValue::ipv4(&dst))
}

/// An Ethernet II layer from 00:11:22:33:44:55 to broadcast.
pub fn ethernet_layer<'data>(ethertype: u16) -> DecodedLayer<'data> {
    DecodedLayer::new(LayerType::Ethernet)
        .field("src_mac", FieldValue::MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]))
        .field("dst_mac", FieldValue::MacAddr([0xff; 6]))
        .field("ethertype", FieldValue::UInt16(ethertype))
}

/// A standard DNS query for the given names.
pub fn dns_layer<'data>(id: u16, questions: &[&'data str]) -> DecodedLayer<'data> {
    let layer = DecodedLayer::new(LayerType::Dns)
        .field("id", FieldValue::UInt16(id))
        .field("is_response", FieldValue::Bool(false))
        .field("opcode", FieldValue::UInt8(0))
        .field("recursion_desired", FieldValue::Bool(true))
        .field("rcode", FieldValue::UInt8(0))
        .field("qd_count", FieldValue::UInt16(questions.len() as u16))
        .field("an_count", FieldValue::UInt16(0))
        .field("ns_count", FieldValue::UInt16(0))
        .field("ar_count", FieldValue::UInt16(0));

    if questions.is_empty() {
        layer
    } else {
        layer.field(
            "questions",
            FieldValue::List(questions.iter().map(|q| FieldValue::Str(*q)).collect()),
        )
    }
}
