use crate::{
    bits::{bit_length, max_value},
    buffer::BitBuffer,
    errors::{CompileError, RangeError},
    field::FieldDecl,
};

/// A field with its position resolved: bits `offset_bits..offset_bits + width_bits` of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub name: String,
    pub offset_bits: usize,
    pub width_bits: usize,
}

impl TryFrom<(&FieldDecl, usize)> for CompiledField {
    type Error = CompileError;

    fn try_from((decl, offset_bits): (&FieldDecl, usize)) -> Result<Self, Self::Error> {
        if decl.name.is_empty() {
            return Err(CompileError::InvalidFieldName);
        }

        if decl.width_bits == 0 || decl.width_bits > 64 {
            return Err(CompileError::InvalidWidth {
                name: decl.name.clone(),
                width_bits: decl.width_bits,
            });
        }

        Ok(CompiledField {
            name: decl.name.clone(),
            offset_bits,
            width_bits: decl.width_bits,
        })
    }
}

impl CompiledField {
    /// First bit past the field.
    pub fn end_bits(&self) -> usize {
        self.offset_bits + self.width_bits
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset_bits..self.end_bits()
    }

    /// Largest value the field can hold.
    pub fn max_value(&self) -> u64 {
        max_value(self.width_bits)
    }

    pub fn fits(&self, value: u64) -> bool {
        bit_length(value) <= self.width_bits
    }

    pub fn read(&self, buffer: &BitBuffer) -> Result<u64, RangeError> {
        buffer.get(self.offset_bits, self.end_bits())
    }

    pub fn write(&self, buffer: &mut BitBuffer, value: u64) -> Result<(), RangeError> {
        buffer.set(self.offset_bits, self.end_bits(), value)
    }
}
