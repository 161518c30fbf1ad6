//! Field descriptor for record schemas.

use super::DataKind;

/// One column of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name (snake_case, e.g., "src_port")
    pub name: &'static str,

    /// Data kind
    pub kind: DataKind,

    /// Whether the field may be missing from a decoded layer
    pub nullable: bool,

    /// Optional description for documentation
    pub description: Option<&'static str>,
}

impl FieldDescriptor {
    /// Create a new required field.
    pub const fn new(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
            description: None,
        }
    }

    /// Create a new nullable field.
    pub const fn nullable(name: &'static str, kind: DataKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
            description: None,
        }
    }

    /// Add a description to the field.
    pub const fn with_description(mut self, desc: &'static str) -> Self {
        self.description = Some(desc);
        self
    }

    /// Builder: set nullability.
    pub const fn set_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Common columns shared by many protocol schemas.
impl FieldDescriptor {
    /// Timestamp column, always first in a record.
    pub const fn timestamp() -> Self {
        Self::new("timestamp", DataKind::TimestampMicros)
            .with_description("Packet capture time (UTC)")
    }

    /// Source port field.
    pub const fn src_port() -> Self {
        Self::new("src_port", DataKind::UInt16).with_description("Source port number")
    }

    /// Destination port field.
    pub const fn dst_port() -> Self {
        Self::new("dst_port", DataKind::UInt16).with_description("Destination port number")
    }

    /// IP address field.
    pub const fn ip_field(name: &'static str) -> Self {
        Self::new(name, DataKind::IpAddr)
    }

    /// MAC address field.
    pub const fn mac_field(name: &'static str) -> Self {
        Self::new(name, DataKind::MacAddr)
    }

    /// Payload bytes following the layer header.
    pub const fn payload() -> Self {
        Self::nullable("payload", DataKind::Binary).with_description("Layer payload bytes")
    }
}
