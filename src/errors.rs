//! Error types for schema compilation, bit-range access and record operations.

use thiserror::Error;

/// Errors produced when compiling [crate::field::FieldDecl]s into a [crate::schema::Schema].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Two declarations share the same name.
    #[error("field {0:?} is declared more than once")]
    DuplicateField(String),
    /// Field width is 0 or greater than 64 bits.
    #[error("field {name:?} has invalid width {width_bits} (must be 1..=64)")]
    InvalidWidth { name: String, width_bits: usize },
    /// Field name is empty.
    #[error("field names must not be empty")]
    InvalidFieldName,
}

/// Errors produced by bit-range operations on a [crate::buffer::BitBuffer].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// `start >= end`.
    #[error("bit range {start}..{end} is empty or inverted")]
    InvalidRange { start: usize, end: usize },
    /// Requested bits lie beyond the end of the buffer.
    #[error("bit {end} is out of bounds for a {len}-bit buffer")]
    OutOfBounds { end: usize, len: usize },
    /// More than 64 bits were requested through a `u64` accessor; use `slice` for wider ranges.
    #[error("cannot access {0} bits at once (max 64)")]
    TooManyBits(usize),
    /// The value needs more bits than the target range provides.
    #[error("{value} does not fit in {bits} bits")]
    ValueOverflow { value: u128, bits: usize },
    /// A buffer written into a range has set bits above the range width.
    #[error("{width}-bit value does not fit in {bits} bits")]
    SliceOverflow { width: usize, bits: usize },
    /// Decoded bytes carry non-zero bits above the declared width.
    #[error("bytes do not fit in {bits} bits")]
    BytesOverflow { bits: usize },
    /// Buffer width differs from the schema width.
    #[error("buffer is {actual} bits wide, schema expects {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Errors produced when building, reading or writing a [crate::record::Record].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Name is not declared by the schema.
    #[error("{name:?} isn't a field of {schema}")]
    UnknownField { schema: String, name: String },
    /// Construction from values omitted a declared field.
    #[error("missing field {0:?}")]
    MissingField(String),
    /// The same field was supplied more than once.
    #[error("field {0:?} supplied more than once")]
    DuplicateValue(String),
    /// Value needs more bits than the field declares.
    #[error("{value} doesn't fit in {width_bits} bits of field {name:?}")]
    ValueTooWide {
        name: String,
        value: u64,
        width_bits: usize,
    },
    /// A bit-range failure from the underlying buffer.
    #[error(transparent)]
    Range(#[from] RangeError),
}
