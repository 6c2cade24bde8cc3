//! Field declarations used to build a [crate::schema::Schema].

/// A single named field: its name and how many bits it occupies.
///
/// Offsets are never declared; they follow from the order in which
/// declarations are handed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Name used to read and write the field on a record.
    pub name: String,
    /// Width in bits (1..=64).
    pub width_bits: usize,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, width_bits: usize) -> Self {
        FieldDecl {
            name: name.into(),
            width_bits,
        }
    }
}

impl<S: Into<String>> From<(S, usize)> for FieldDecl {
    fn from((name, width_bits): (S, usize)) -> Self {
        FieldDecl::new(name, width_bits)
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for FieldDecl {
    fn from(value: crate::serde::FieldDef) -> Self {
        FieldDecl {
            name: value.name,
            width_bits: value.width_bits,
        }
    }
}
