//! Column data kinds for record schemas.

/// Data kinds a record column can carry.
///
/// Kinds are `Copy` so that whole schemas can live in `static` tables.
/// Nested lists point at another static kind instead of boxing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Boolean (true/false)
    Bool,

    /// Unsigned 8-bit integer
    UInt8,

    /// Unsigned 16-bit integer
    UInt16,

    /// Unsigned 32-bit integer
    UInt32,

    /// Unsigned 64-bit integer
    UInt64,

    /// Signed 64-bit integer
    Int64,

    /// UTF-8 string
    String,

    /// Variable-length binary data
    Binary,

    /// IPv4 or IPv6 address
    IpAddr,

    /// 6-byte hardware address
    MacAddr,

    /// Capture timestamp, microseconds since the Unix epoch
    TimestampMicros,

    /// Variable-length list of elements of the same kind
    List(&'static DataKind),
}

impl DataKind {
    /// Human-readable type name for display.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataKind::Bool => "bool",
            DataKind::UInt8 => "u8",
            DataKind::UInt16 => "u16",
            DataKind::UInt32 => "u32",
            DataKind::UInt64 => "u64",
            DataKind::Int64 => "i64",
            DataKind::String => "string",
            DataKind::Binary => "binary",
            DataKind::IpAddr => "ip",
            DataKind::MacAddr => "mac",
            DataKind::TimestampMicros => "timestamp",
            DataKind::List(_) => "list",
        }
    }

    /// Whether values of this kind are stored as unsigned integers.
    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            DataKind::UInt8 | DataKind::UInt16 | DataKind::UInt32 | DataKind::UInt64
        )
    }

    /// Upper bound for unsigned kinds, None for everything else.
    pub fn unsigned_max(&self) -> Option<u64> {
        match self {
            DataKind::UInt8 => Some(u8::MAX as u64),
            DataKind::UInt16 => Some(u16::MAX as u64),
            DataKind::UInt32 => Some(u32::MAX as u64),
            DataKind::UInt64 => Some(u64::MAX),
            _ => None,
        }
    }

    /// Get the inner kind for List, or None if not a List.
    pub fn list_inner(&self) -> Option<&'static DataKind> {
        match self {
            DataKind::List(inner) => Some(inner),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataKind::List(inner) => write!(f, "list<{}>", inner),
            other => write!(f, "{}", other.type_name()),
        }
    }
}
