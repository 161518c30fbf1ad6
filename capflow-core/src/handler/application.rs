//! Application layer handlers: DNS, DHCPv4, DHCPv6, NTP, SIP.

use super::{field_matches, LayerHandler};
use crate::layer::{DecodedLayer, LayerType};
use crate::schema::{DataKind, FieldDescriptor, RecordSchema};

/// DNS message handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsHandler;

const DNS_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("id", DataKind::UInt16),
    FieldDescriptor::new("is_response", DataKind::Bool),
    FieldDescriptor::new("opcode", DataKind::UInt8),
    FieldDescriptor::nullable("authoritative", DataKind::Bool),
    FieldDescriptor::nullable("truncated", DataKind::Bool),
    FieldDescriptor::nullable("recursion_desired", DataKind::Bool),
    FieldDescriptor::nullable("recursion_available", DataKind::Bool),
    FieldDescriptor::new("rcode", DataKind::UInt8),
    FieldDescriptor::new("qd_count", DataKind::UInt16),
    FieldDescriptor::new("an_count", DataKind::UInt16),
    FieldDescriptor::new("ns_count", DataKind::UInt16),
    FieldDescriptor::new("ar_count", DataKind::UInt16),
    FieldDescriptor::nullable("questions", DataKind::List(&DataKind::String)),
    FieldDescriptor::nullable("answers", DataKind::List(&DataKind::String)),
];

impl LayerHandler for DnsHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Dns
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_DNS", DNS_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Opcode is four bits, rcode four bits outside EDNS.
        field_matches(layer, "opcode", |op| op < 16) && field_matches(layer, "rcode", |rc| rc < 16)
    }
}

/// DHCPv4 (BOOTP) message handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dhcpv4Handler;

const DHCPV4_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("op", DataKind::UInt8).with_description("1 = request, 2 = reply"),
    FieldDescriptor::new("hw_type", DataKind::UInt8),
    FieldDescriptor::new("hw_len", DataKind::UInt8),
    FieldDescriptor::new("hops", DataKind::UInt8),
    FieldDescriptor::new("xid", DataKind::UInt32),
    FieldDescriptor::new("secs", DataKind::UInt16),
    FieldDescriptor::new("flags", DataKind::UInt16),
    FieldDescriptor::ip_field("client_ip"),
    FieldDescriptor::ip_field("your_ip"),
    FieldDescriptor::ip_field("server_ip"),
    FieldDescriptor::ip_field("relay_ip"),
    FieldDescriptor::mac_field("client_mac"),
    FieldDescriptor::nullable("server_name", DataKind::String),
    FieldDescriptor::nullable("boot_file", DataKind::String),
    FieldDescriptor::nullable("message_type", DataKind::UInt8),
    FieldDescriptor::nullable("options", DataKind::List(&DataKind::String)),
];

impl LayerHandler for Dhcpv4Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Dhcpv4
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_DHCPv4", DHCPV4_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_matches(layer, "op", |op| op == 1 || op == 2)
    }
}

/// DHCPv6 message handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dhcpv6Handler;

const DHCPV6_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("msg_type", DataKind::UInt8),
    FieldDescriptor::nullable("transaction_id", DataKind::UInt32),
    FieldDescriptor::nullable("hop_count", DataKind::UInt8),
    FieldDescriptor::ip_field("link_addr").set_nullable(true),
    FieldDescriptor::ip_field("peer_addr").set_nullable(true),
    FieldDescriptor::nullable("options", DataKind::List(&DataKind::String)),
];

impl LayerHandler for Dhcpv6Handler {
    fn layer_type(&self) -> LayerType {
        LayerType::Dhcpv6
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_DHCPv6", DHCPV6_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Transaction ids are 24 bits wide.
        field_matches(layer, "msg_type", |t| t != 0)
            && super::field_allows(layer, "transaction_id", |xid| xid <= 0xFF_FFFF)
    }
}

/// NTP packet handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NtpHandler;

const NTP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("leap_indicator", DataKind::UInt8),
    FieldDescriptor::new("version", DataKind::UInt8),
    FieldDescriptor::new("mode", DataKind::UInt8),
    FieldDescriptor::new("stratum", DataKind::UInt8),
    FieldDescriptor::new("poll", DataKind::Int64),
    FieldDescriptor::new("precision", DataKind::Int64),
    FieldDescriptor::new("root_delay", DataKind::UInt32),
    FieldDescriptor::new("root_dispersion", DataKind::UInt32),
    FieldDescriptor::new("reference_id", DataKind::UInt32),
    FieldDescriptor::new("reference_ts", DataKind::UInt64),
    FieldDescriptor::new("origin_ts", DataKind::UInt64),
    FieldDescriptor::new("receive_ts", DataKind::UInt64),
    FieldDescriptor::new("transmit_ts", DataKind::UInt64),
];

impl LayerHandler for NtpHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Ntp
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_NTP", NTP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        field_matches(layer, "version", |v| (1..=4).contains(&v))
            && field_matches(layer, "mode", |m| m < 8)
    }
}

/// SIP request/response handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SipHandler;

const SIP_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::timestamp(),
    FieldDescriptor::new("is_response", DataKind::Bool),
    FieldDescriptor::nullable("method", DataKind::String),
    FieldDescriptor::nullable("request_uri", DataKind::String),
    FieldDescriptor::nullable("status_code", DataKind::UInt16),
    FieldDescriptor::nullable("call_id", DataKind::String),
    FieldDescriptor::nullable("headers", DataKind::List(&DataKind::String)),
];

impl LayerHandler for SipHandler {
    fn layer_type(&self) -> LayerType {
        LayerType::Sip
    }

    fn schema(&self) -> RecordSchema {
        RecordSchema::new("NC_SIP", SIP_FIELDS)
    }

    fn applies_to(&self, layer: &DecodedLayer<'_>) -> bool {
        // Requests carry a method, responses a status code.
        match layer.get("is_response").and_then(|v| v.as_bool()) {
            Some(true) => field_matches(layer, "status_code", |c| (100..700).contains(&c)),
            Some(false) => layer.get("method").and_then(|v| v.as_str()).is_some(),
            None => false,
        }
    }
}
