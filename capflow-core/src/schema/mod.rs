//! Record schema types.
//!
//! Every encoder writes records of one fixed schema. The schema is a
//! static table, so descriptors stay `Copy` and the catalog needs no
//! allocation.
//!
//! # Example
//!
//! ```rust
//! use capflow_core::schema::{DataKind, FieldDescriptor, RecordSchema};
//!
//! static FIELDS: &[FieldDescriptor] = &[
//!     FieldDescriptor::timestamp(),
//!     FieldDescriptor::new("version", DataKind::UInt8),
//!     FieldDescriptor::payload(),
//! ];
//!
//! let schema = RecordSchema::new("NC_Example", FIELDS);
//! assert_eq!(schema.column_names(), vec!["timestamp", "version", "payload"]);
//! ```

mod field;
mod kind;

pub use field::FieldDescriptor;
pub use kind::DataKind;

/// A record type's complete schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    /// Record type identifier written into the header.
    pub id: &'static str,

    /// Columns in output order. The first column is always the timestamp.
    pub fields: &'static [FieldDescriptor],
}

impl RecordSchema {
    pub const fn new(id: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { id, fields }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in output order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Look up a column by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
