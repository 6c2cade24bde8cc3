//! Byte order used when a packed record crosses the byte boundary.

/// How the fixed-width integer value of a buffer is chunked into bytes.
///
/// Byte order never affects the logical bit layout of a record, only the
/// order in which its bytes are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ByteOrder {
    /// Most-significant byte first.
    Big,
    /// Least-significant byte first.
    Little,
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::Big
    }
}

impl ByteOrder {
    /// Converts a big-endian byte image into this order (and back: the mapping is its own inverse).
    pub(crate) fn arrange(self, bytes: &mut [u8]) {
        if self == ByteOrder::Little {
            bytes.reverse();
        }
    }
}
