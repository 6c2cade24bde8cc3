//! JSON‑deserializable schema description.
//!
//! These types describe a record layout as data, for example a schema file
//! shipped with your application, and are compiled into a [crate::schema::Schema]
//! with `Schema::try_from`.
//!
//! ```
//! use bitform::{order::ByteOrder, schema::Schema, serde::SchemaDef};
//!
//! let def: SchemaDef = serde_json::from_str(r#"{
//!     "name": "Header",
//!     "fields": [
//!         { "name": "flag", "width_bits": 1 },
//!         { "name": "mode", "width_bits": 2 },
//!         { "name": "counter", "width_bits": 5 }
//!     ],
//!     "record_config": { "byte_order": "little" }
//! }"#).unwrap();
//!
//! assert_eq!(def.byte_order(), ByteOrder::Little);
//! let schema = Schema::try_from(def).unwrap();
//! assert_eq!(schema.total_bits(), 8);
//! ```

use serde::{Deserialize, Serialize, ser::SerializeMap};

use crate::{
    errors::CompileError, field::FieldDecl, order::ByteOrder, record::Record, schema::Schema,
};

/// Top‑level schema definition: a name plus fields in wire order.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchemaDef {
    /// Name used when rendering records.
    pub name: String,
    /// Fields in declaration order; the first one occupies the most‑significant bits.
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub record_config: Option<RecordConfigDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    pub name: String,
    /// Width of the field in bits (1..=64).
    pub width_bits: usize,
}

/// How records of this schema are serialized.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecordConfigDef {
    #[serde(default)]
    pub byte_order: ByteOrder,
}

impl SchemaDef {
    /// Configured byte order, big‑endian when not given.
    pub fn byte_order(&self) -> ByteOrder {
        self.record_config
            .as_ref()
            .map(|config| config.byte_order)
            .unwrap_or_default()
    }
}

impl TryFrom<SchemaDef> for Schema {
    type Error = CompileError;

    fn try_from(value: SchemaDef) -> Result<Self, Self::Error> {
        let fields: Vec<FieldDecl> = value.fields.into_iter().map(Into::into).collect();
        Schema::compile(value.name, &fields)
    }
}

impl From<&Schema> for SchemaDef {
    fn from(schema: &Schema) -> Self {
        SchemaDef {
            name: schema.name().to_string(),
            fields: schema
                .fields()
                .iter()
                .map(|field| FieldDef {
                    name: field.name.clone(),
                    width_bits: field.width_bits,
                })
                .collect(),
            record_config: None,
        }
    }
}

/// Records serialize as a map of field names to values, in declaration order.
impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.schema().len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
