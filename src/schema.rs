//! Schema: compiled, ordered set of fields shared by every record of one layout.

use std::collections::HashMap;

use log::debug;

use crate::{
    bits::bytes_for_bits,
    compiled::CompiledField,
    errors::{CompileError, FieldError},
    field::FieldDecl,
};

/// A compiled schema: [CompiledField]s in declaration order plus the total bit length.
///
/// Use [Schema::compile] or [Schema::builder] to build one, then share it
/// (usually behind an `Arc`) between any number of [crate::record::Record]s.
/// A schema is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    total_bits: usize,
    fields: Vec<CompiledField>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Compiles `fields` in the order given.
    ///
    /// Each field's offset is the sum of the widths declared before it, so the
    /// first declaration occupies the most-significant bits of the record.
    pub fn compile(name: impl Into<String>, fields: &[FieldDecl]) -> Result<Self, CompileError> {
        let name = name.into();
        let mut compiled_fields: Vec<CompiledField> = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());
        let mut total_bits = 0;

        for decl in fields {
            let compiled_field = CompiledField::try_from((decl, total_bits))?;

            if index
                .insert(compiled_field.name.clone(), compiled_fields.len())
                .is_some()
            {
                return Err(CompileError::DuplicateField(compiled_field.name));
            }

            total_bits += compiled_field.width_bits;
            compiled_fields.push(compiled_field);
        }

        debug!(
            "compiled schema {name}: {} fields, {total_bits} bits [{}]",
            compiled_fields.len(),
            compiled_fields
                .iter()
                .map(|f| format!("{}@{}+{}", f.name, f.offset_bits, f.width_bits))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            name,
            total_bits,
            fields: compiled_fields,
            index,
        })
    }

    /// Starts an empty [SchemaBuilder] for a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of all field widths.
    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Size of a packed record in bytes.
    pub fn byte_len(&self) -> usize {
        bytes_for_bits(self.total_bits)
    }

    /// Compiled fields in declaration order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.index_of(name).map(|i| &self.fields[i])
    }

    /// Declaration index of `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn lookup(&self, name: &str) -> Result<usize, FieldError> {
        self.index_of(name).ok_or_else(|| FieldError::UnknownField {
            schema: self.name.clone(),
            name: name.to_string(),
        })
    }
}

/// Collects field declarations in order and compiles them into a [Schema].
///
/// ```
/// use bitform::schema::Schema;
///
/// let schema = Schema::builder("Header")
///     .field("flag", 1)
///     .field("mode", 2)
///     .field("counter", 5)
///     .build()
///     .unwrap();
/// assert_eq!(schema.total_bits(), 8);
/// assert_eq!(schema.field("counter").unwrap().offset_bits, 3);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDecl>,
}

impl SchemaBuilder {
    /// Appends a field after every field added so far.
    pub fn field(mut self, name: impl Into<String>, width_bits: usize) -> Self {
        self.fields.push(FieldDecl::new(name, width_bits));
        self
    }

    pub fn build(self) -> Result<Schema, CompileError> {
        Schema::compile(self.name, &self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: &[(&str, usize)]) -> Vec<FieldDecl> {
        pairs.iter().map(|&(n, w)| FieldDecl::new(n, w)).collect()
    }

    #[test]
    fn test_compile_empty() {
        let schema = Schema::compile("Empty", &[]).unwrap();
        assert_eq!(schema.total_bits(), 0);
        assert_eq!(schema.byte_len(), 0);
        assert!(schema.is_empty());
    }

    #[test]
    fn test_offsets_accumulate_in_declaration_order() {
        let schema = Schema::compile(
            "Header",
            &decls(&[("flag", 1), ("mode", 2), ("counter", 5)]),
        )
        .unwrap();

        let layout: Vec<_> = schema
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), f.offset_bits, f.width_bits))
            .collect();
        assert_eq!(
            layout,
            vec![("flag", 0, 1), ("mode", 1, 2), ("counter", 3, 5)]
        );
        assert_eq!(schema.total_bits(), 8);
        assert_eq!(schema.byte_len(), 1);
    }

    #[test]
    fn test_order_is_not_sorted() {
        let schema = Schema::compile("Z", &decls(&[("z", 7), ("a", 3), ("m", 12)])).unwrap();
        assert_eq!(schema.field("z").unwrap().offset_bits, 0);
        assert_eq!(schema.field("a").unwrap().offset_bits, 7);
        assert_eq!(schema.field("m").unwrap().offset_bits, 10);
        assert_eq!(schema.index_of("m"), Some(2));
        assert_eq!(schema.total_bits(), 22);
        assert_eq!(schema.byte_len(), 3);
    }

    #[test]
    fn test_duplicate_field() {
        assert_eq!(
            Schema::compile("Dup", &decls(&[("a", 1), ("b", 2), ("a", 3)])).unwrap_err(),
            CompileError::DuplicateField("a".to_string())
        );
    }

    #[test]
    fn test_invalid_width() {
        assert_eq!(
            Schema::compile("Zero", &decls(&[("a", 1), ("b", 0)])).unwrap_err(),
            CompileError::InvalidWidth {
                name: "b".to_string(),
                width_bits: 0
            }
        );
    }

    #[test]
    fn test_unknown_lookup() {
        let schema = Schema::builder("Header").field("flag", 1).build().unwrap();
        assert_eq!(
            schema.lookup("flga").unwrap_err(),
            FieldError::UnknownField {
                schema: "Header".to_string(),
                name: "flga".to_string()
            }
        );
        assert!(schema.field("flga").is_none());
    }

    #[test]
    fn test_wide_record() {
        let schema = Schema::builder("Wide")
            .field("a", 64)
            .field("b", 64)
            .field("c", 3)
            .build()
            .unwrap();
        assert_eq!(schema.total_bits(), 131);
        assert_eq!(schema.byte_len(), 17);
        assert_eq!(schema.field("c").unwrap().range(), 128..131);
    }
}
