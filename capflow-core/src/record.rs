//! Structured records produced by encoders.
//!
//! A [`Record`] is a row of owned [`Value`]s aligned with a
//! [`RecordSchema`]. Records are what cross the sink boundary: they are
//! bincode-encoded into frames for binary sinks and rendered as CSV
//! rows for tabular sinks. Every binary file starts with a [`Header`].

use std::fmt;
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::layer::{DecodedLayer, FieldValue};
use crate::schema::{DataKind, RecordSchema};

/// Owned column value of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    /// Microseconds since the Unix epoch
    Timestamp(i64),
    Str(String),
    Bytes(Vec<u8>),
    Ip(IpAddr),
    Mac([u8; 6]),
    List(Vec<Value>),
}

impl Value {
    /// Convert a decoded field into a column value of the given kind.
    ///
    /// Returns `None` when the field cannot represent the kind, e.g. a
    /// string where a port number is expected or a value out of range.
    pub fn from_field(field: &FieldValue<'_>, kind: DataKind) -> Option<Value> {
        if field.is_null() {
            return Some(Value::Null);
        }
        match kind {
            DataKind::Bool => field.as_bool().map(Value::Bool),
            DataKind::UInt8 | DataKind::UInt16 | DataKind::UInt32 | DataKind::UInt64 => {
                let v = field.as_u64()?;
                match kind.unsigned_max() {
                    Some(max) if v <= max => Some(Value::UInt(v)),
                    _ => None,
                }
            }
            DataKind::Int64 => field.as_i64().map(Value::Int),
            DataKind::TimestampMicros => field.as_i64().map(Value::Timestamp),
            DataKind::String => field.as_str().map(|s| Value::Str(s.to_string())),
            DataKind::Binary => field.as_bytes().map(|b| Value::Bytes(b.to_vec())),
            DataKind::IpAddr => field.as_ip().map(Value::Ip),
            DataKind::MacAddr => field.as_mac().map(Value::Mac),
            DataKind::List(inner) => field
                .as_list()?
                .iter()
                .map(|item| Value::from_field(item, *inner))
                .collect::<Option<Vec<_>>>()
                .map(Value::List),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Render a timestamp as `seconds.micros`.
pub fn format_timestamp(timestamp_us: i64) -> String {
    format!(
        "{}.{:06}",
        timestamp_us.div_euclid(1_000_000),
        timestamp_us.rem_euclid(1_000_000)
    )
}

/// Format a MAC address as colon-separated hex.
pub fn format_mac(mac: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

/// Tabular rendering of a value. Null renders as an empty cell.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Timestamp(ts) => f.write_str(&format_timestamp(*ts)),
            Value::Str(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&hex::encode(b)),
            Value::Ip(addr) => write!(f, "{addr}"),
            Value::Mac(mac) => f.write_str(&format_mac(mac)),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// One structured record, values in schema column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Project a decoded layer onto a schema.
    ///
    /// The `timestamp` column is filled from `timestamp_us`. A `payload`
    /// column the decoder did not supply is filled from the layer's
    /// payload bytes. Returns `None` if a required column is missing or
    /// has the wrong kind.
    pub fn project(
        schema: &RecordSchema,
        layer: &DecodedLayer<'_>,
        timestamp_us: i64,
    ) -> Option<Record> {
        let mut values = Vec::with_capacity(schema.len());

        for field in schema.fields {
            let value = match (field.name, field.kind) {
                ("timestamp", DataKind::TimestampMicros) => Value::Timestamp(timestamp_us),
                ("payload", DataKind::Binary) if layer.get("payload").is_none() => {
                    if layer.payload.is_empty() {
                        Value::Null
                    } else {
                        Value::Bytes(layer.payload.to_vec())
                    }
                }
                (name, kind) => match layer.get(name).and_then(|v| Value::from_field(v, kind)) {
                    Some(Value::Null) | None if !field.nullable => return None,
                    Some(v) => v,
                    None => Value::Null,
                },
            };
            values.push(value);
        }

        Some(Record { values })
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a column value by index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Schema-identifying record written once at the start of every binary sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Record type identifier of the schema.
    pub record_type: String,

    /// Column names in record order.
    pub columns: Vec<String>,

    /// When the sink was created, microseconds since the Unix epoch.
    pub created_us: i64,

    /// Input source label (interface or capture file).
    pub source: String,

    /// Library version that wrote the file.
    pub version: String,

    /// Whether payload columns carry data.
    pub contains_payloads: bool,
}

impl Header {
    /// Create a header for a schema, stamped with the current time.
    pub fn new(schema: &RecordSchema, source: impl Into<String>, contains_payloads: bool) -> Self {
        let created_us = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or_default();

        Self {
            record_type: schema.id.to_string(),
            columns: schema.column_names().into_iter().map(String::from).collect(),
            created_us,
            source: source.into(),
            version: crate::VERSION.to_string(),
            contains_payloads,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::layer::LayerType;
    use crate::schema::FieldDescriptor;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::timestamp(),
        FieldDescriptor::src_port(),
        FieldDescriptor::nullable("note", DataKind::String),
        FieldDescriptor::payload(),
    ];
    const SCHEMA: RecordSchema = RecordSchema::new("NC_Test", FIELDS);

    #[test]
    fn test_project_fills_timestamp_and_payload() {
        let payload = [0xca, 0xfe];
        let layer = DecodedLayer::new(LayerType::Udp)
            .field("src_port", FieldValue::UInt16(53))
            .payload(&payload);

        let record = Record::project(&SCHEMA, &layer, 1_500_000).unwrap();
        assert_eq!(
            record.values,
            vec![
                Value::Timestamp(1_500_000),
                Value::UInt(53),
                Value::Null,
                Value::Bytes(vec![0xca, 0xfe]),
            ]
        );
    }

    #[test]
    fn test_project_rejects_missing_required() {
        let layer = DecodedLayer::new(LayerType::Udp).field("note", FieldValue::Str("x"));
        assert!(Record::project(&SCHEMA, &layer, 0).is_none());
    }

    #[test]
    fn test_project_rejects_out_of_range() {
        let layer = DecodedLayer::new(LayerType::Udp).field("src_port", FieldValue::UInt32(70_000));
        assert!(Record::project(&SCHEMA, &layer, 0).is_none());
    }

    #[test]
    fn test_tabular_rendering() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Timestamp(1_234_567).to_string(), "1.234567");
        assert_eq!(Value::Timestamp(-1).to_string(), "-1.999999");
        assert_eq!(Value::Bytes(vec![0x0a, 0xff]).to_string(), "0aff");
        assert_eq!(
            Value::Ip(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))).to_string(),
            "10.0.0.1"
        );
        assert_eq!(
            Value::Mac([0, 0x11, 0x22, 0x33, 0x44, 0x55]).to_string(),
            "00:11:22:33:44:55"
        );
        assert_eq!(
            Value::List(vec![Value::UInt(1), Value::UInt(2)]).to_string(),
            "1|2"
        );
    }

    #[test]
    fn test_header_columns_follow_schema() {
        let header = Header::new(&SCHEMA, "eth0", false);
        assert_eq!(header.record_type, "NC_Test");
        assert_eq!(header.columns, vec!["timestamp", "src_port", "note", "payload"]);
        assert_eq!(header.source, "eth0");
        assert!(header.created_us > 0);
    }
}
