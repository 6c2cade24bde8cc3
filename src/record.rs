//! Runtime records: named field values kept in lockstep with their packed [BitBuffer].

use std::{fmt, sync::Arc};

use log::trace;

use crate::{
    buffer::BitBuffer,
    compiled::CompiledField,
    errors::{FieldError, RangeError},
    order::ByteOrder,
    schema::Schema,
};

/// One packed instance of a [Schema].
///
/// A record always holds a value for every declared field. Field values are
/// cached next to the packed buffer; [Record::set] writes through to both, so
/// the buffer returned by [Record::bits] always reflects the latest values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    schema: Arc<Schema>,
    bits: BitBuffer,
    values: Vec<u64>,
}

fn too_wide(field: &CompiledField, value: u64) -> FieldError {
    FieldError::ValueTooWide {
        name: field.name.clone(),
        value,
        width_bits: field.width_bits,
    }
}

impl Record {
    /// Builds a record from a value for every declared field.
    ///
    /// Undeclared names, repeated names, missing fields and values wider than
    /// their field are all rejected; no record is produced on failure.
    pub fn from_values<I, K>(schema: &Arc<Schema>, values: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = (K, u64)>,
        K: AsRef<str>,
    {
        let mut slots: Vec<Option<u64>> = vec![None; schema.len()];

        for (name, value) in values {
            let name = name.as_ref();
            let index = schema.lookup(name)?;
            if slots[index].replace(value).is_some() {
                return Err(FieldError::DuplicateValue(name.to_string()));
            }
        }

        let mut cache = Vec::with_capacity(slots.len());
        for (field, slot) in schema.fields().iter().zip(slots) {
            let value = slot.ok_or_else(|| FieldError::MissingField(field.name.clone()))?;
            cache.push(value);
        }

        let mut bits = BitBuffer::new(schema.total_bits());
        for (field, &value) in schema.fields().iter().zip(&cache) {
            if !field.fits(value) {
                return Err(too_wide(field, value));
            }
            field.write(&mut bits, value)?;
        }

        trace!("packed {} into {bits}", schema.name());

        Ok(Self {
            schema: Arc::clone(schema),
            bits,
            values: cache,
        })
    }

    /// Decodes a record from an existing buffer, which must be exactly as wide as the schema.
    pub fn from_buffer(schema: &Arc<Schema>, bits: BitBuffer) -> Result<Self, FieldError> {
        if bits.len() != schema.total_bits() {
            return Err(RangeError::LengthMismatch {
                expected: schema.total_bits(),
                actual: bits.len(),
            }
            .into());
        }

        let values = schema
            .fields()
            .iter()
            .map(|field| field.read(&bits))
            .collect::<Result<Vec<_>, _>>()?;

        trace!("unpacked {} from {bits}", schema.name());

        Ok(Self {
            schema: Arc::clone(schema),
            bits,
            values,
        })
    }

    /// Decodes a record from bytes written in `order`.
    pub fn from_bytes(
        schema: &Arc<Schema>,
        bytes: &[u8],
        order: ByteOrder,
    ) -> Result<Self, FieldError> {
        let bits = BitBuffer::from_bytes(bytes, order, schema.total_bits())?;
        Self::from_buffer(schema, bits)
    }

    /// Decodes a record from the integer value of the whole packed record.
    pub fn from_int(schema: &Arc<Schema>, value: u64) -> Result<Self, FieldError> {
        let bits = BitBuffer::from_value(value, schema.total_bits())?;
        Self::from_buffer(schema, bits)
    }

    /// Like [Record::from_int], for records up to 128 bits wide.
    ///
    /// Wider records are decoded from their big-endian image with [Record::from_bytes].
    pub fn from_u128(schema: &Arc<Schema>, value: u128) -> Result<Self, FieldError> {
        let bits = BitBuffer::from_u128(value, schema.total_bits())?;
        Self::from_buffer(schema, bits)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The packed representation.
    pub fn bits(&self) -> &BitBuffer {
        &self.bits
    }

    pub fn into_bits(self) -> BitBuffer {
        self.bits
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        self.bits.to_bytes(order)
    }

    pub fn get(&self, name: &str) -> Result<u64, FieldError> {
        let index = self.schema.lookup(name)?;
        Ok(self.values[index])
    }

    /// Sets one field, updating the packed buffer immediately.
    ///
    /// On error neither the field value nor the buffer is modified.
    pub fn set(&mut self, name: &str, value: u64) -> Result<(), FieldError> {
        let index = self.schema.lookup(name)?;
        let field = &self.schema.fields()[index];

        if !field.fits(value) {
            return Err(too_wide(field, value));
        }

        field.write(&mut self.bits, value)?;
        self.values[index] = value;

        trace!("{}.{name} = {value}", self.schema.name());

        Ok(())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.schema
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, &value)| (field.name.as_str(), value))
    }
}

impl fmt::Display for Record {
    /// `Header(flag=1, mode=2, counter=9)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}
