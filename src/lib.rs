//! # bitform
//!
//! Declarative fixed-width bit-field records.
//!
//! Describe a record as an ordered list of named fields with bit widths. The
//! schema compiler gives every field its offset by summing the widths declared
//! before it, so the first field occupies the most-significant bits. Records
//! hold one value per field, bounds-checked against its width, and keep a
//! packed [buffer::BitBuffer] in sync that converts losslessly to and from
//! bytes in either byte order, whatever the total bit length.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bitform::{order::ByteOrder, record::Record, schema::Schema};
//!
//! let schema = Arc::new(
//!     Schema::builder("Header")
//!         .field("flag", 1)
//!         .field("mode", 2)
//!         .field("counter", 5)
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut record =
//!     Record::from_values(&schema, [("flag", 1), ("mode", 2), ("counter", 9)]).unwrap();
//! assert_eq!(record.to_bytes(ByteOrder::Big), vec![0xC9]);
//!
//! record.set("counter", 0).unwrap();
//! assert_eq!(record.to_bytes(ByteOrder::Big), vec![0xC0]);
//!
//! let decoded = Record::from_bytes(&schema, &[0xC9], ByteOrder::Big).unwrap();
//! assert_eq!(decoded.get("counter").unwrap(), 9);
//! assert_eq!(decoded.to_string(), "Header(flag=1, mode=2, counter=9)");
//! ```

pub mod bits;
pub mod buffer;
pub mod compiled;
pub mod errors;
pub mod field;
pub mod order;
pub mod record;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
