//! Field values carried by decoded layers.
//!
//! `FieldValue` references packet data directly where the decoder can
//! (Str, Bytes) and owns data only when a value had to be constructed
//! (OwnedString, OwnedBytes).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use compact_str::CompactString;

/// A single decoded field value.
///
/// The lifetime parameter `'data` ties borrowed variants to the packet buffer.
#[derive(Debug, Clone)]
pub enum FieldValue<'data> {
    // === Primitives ===
    /// Unsigned 8-bit integer
    UInt8(u8),
    /// Unsigned 16-bit integer
    UInt16(u16),
    /// Unsigned 32-bit integer
    UInt32(u32),
    /// Unsigned 64-bit integer
    UInt64(u64),
    /// Signed 64-bit integer
    Int64(i64),
    /// Boolean value
    Bool(bool),

    // === Network types ===
    /// IP address (v4 or v6)
    IpAddr(IpAddr),
    /// MAC address (6 bytes)
    MacAddr([u8; 6]),

    // === Zero-copy references into the packet ===
    /// String that exists verbatim in the packet (SIP method, SNI, ...).
    Str(&'data str),
    /// Bytes that exist verbatim in the packet (payloads, option blobs).
    Bytes(&'data [u8]),

    // === Constructed values ===
    /// Constructed string (DNS names, joined lists, enum names).
    OwnedString(CompactString),
    /// Constructed or decoded bytes.
    OwnedBytes(Vec<u8>),

    /// Multi-valued field (DNS answers, LLDP TLVs).
    List(Vec<FieldValue<'data>>),

    /// Null/missing value
    Null,
}

impl<'data> FieldValue<'data> {
    /// Create a MAC address from bytes.
    pub fn mac(bytes: &[u8]) -> Self {
        if bytes.len() >= 6 {
            let mut mac = [0u8; 6];
            mac.copy_from_slice(&bytes[..6]);
            FieldValue::MacAddr(mac)
        } else {
            FieldValue::Null
        }
    }

    /// Create an IPv4 address from bytes.
    pub fn ipv4(bytes: &[u8]) -> Self {
        if bytes.len() >= 4 {
            FieldValue::IpAddr(IpAddr::V4(Ipv4Addr::new(
                bytes[0], bytes[1], bytes[2], bytes[3],
            )))
        } else {
            FieldValue::Null
        }
    }

    /// Create an IPv6 address from bytes.
    pub fn ipv6(bytes: &[u8]) -> Self {
        if bytes.len() >= 16 {
            let mut arr = [0u8; 16];
            arr.copy_from_slice(&bytes[..16]);
            FieldValue::IpAddr(IpAddr::V6(Ipv6Addr::from(arr)))
        } else {
            FieldValue::Null
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt8(v) => Some(*v as u64),
            FieldValue::UInt16(v) => Some(*v as u64),
            FieldValue::UInt32(v) => Some(*v as u64),
            FieldValue::UInt64(v) => Some(*v),
            FieldValue::Int64(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int64(v) => Some(*v),
            FieldValue::UInt8(v) => Some(*v as i64),
            FieldValue::UInt16(v) => Some(*v as i64),
            FieldValue::UInt32(v) => Some(*v as i64),
            FieldValue::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Try to get as bool. Integers 0/1 are accepted as flags.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            other => match other.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
        }
    }

    /// Try to get as str reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            FieldValue::OwnedString(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get as bytes reference.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            FieldValue::OwnedBytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Try to get as IP address.
    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            FieldValue::IpAddr(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Try to get as MAC address.
    pub fn as_mac(&self) -> Option<[u8; 6]> {
        match self {
            FieldValue::MacAddr(mac) => Some(*mac),
            FieldValue::Bytes(b) if b.len() == 6 => {
                let mut mac = [0u8; 6];
                mac.copy_from_slice(b);
                Some(mac)
            }
            _ => None,
        }
    }

    /// Try to get as list reference.
    pub fn as_list(&self) -> Option<&[FieldValue<'data>]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl<'a, 'b> PartialEq<FieldValue<'b>> for FieldValue<'a> {
    fn eq(&self, other: &FieldValue<'b>) -> bool {
        match (self, other) {
            (FieldValue::UInt8(a), FieldValue::UInt8(b)) => a == b,
            (FieldValue::UInt16(a), FieldValue::UInt16(b)) => a == b,
            (FieldValue::UInt32(a), FieldValue::UInt32(b)) => a == b,
            (FieldValue::UInt64(a), FieldValue::UInt64(b)) => a == b,
            (FieldValue::Int64(a), FieldValue::Int64(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::IpAddr(a), FieldValue::IpAddr(b)) => a == b,
            (FieldValue::MacAddr(a), FieldValue::MacAddr(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (FieldValue::Null, FieldValue::Null) => true,
            (a, b) => match (a.as_str(), b.as_str()) {
                (Some(x), Some(y)) => x == y,
                _ => matches!((a.as_bytes(), b.as_bytes()), (Some(x), Some(y)) if x == y),
            },
        }
    }
}
