//! Fixed-width, bit-addressable storage backing one record.
//!
//! Bit 0 is the most-significant bit of the buffer's integer value. The value
//! is stored as its big-endian byte image; when the width is not a multiple
//! of 8 the leading bits of the first byte are padding and always zero.

use std::fmt;

use crate::{
    bits::{self, bit_length, bytes_for_bits},
    errors::RangeError,
    order::ByteOrder,
};

/// A zero-initialized, fixed-width bit string.
///
/// The width is chosen at construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    len_bits: usize,
    data: Vec<u8>,
}

impl BitBuffer {
    /// Creates an all-zero buffer of `len_bits` bits.
    pub fn new(len_bits: usize) -> Self {
        Self {
            len_bits,
            data: vec![0u8; bytes_for_bits(len_bits)],
        }
    }

    /// Creates a buffer of `len_bits` bits holding `value`, zero-padded at the high end.
    pub fn from_value(value: u64, len_bits: usize) -> Result<Self, RangeError> {
        Self::from_u128(value.into(), len_bits)
    }

    /// Like [BitBuffer::from_value], for values up to 128 bits.
    ///
    /// Wider integers are built from their big-endian image with [BitBuffer::from_bytes].
    pub fn from_u128(value: u128, len_bits: usize) -> Result<Self, RangeError> {
        if (u128::BITS - value.leading_zeros()) as usize > len_bits {
            return Err(RangeError::ValueOverflow {
                value,
                bits: len_bits,
            });
        }

        Self::from_bytes(&value.to_be_bytes(), ByteOrder::Big, len_bits)
    }

    /// Decodes `bytes` written in `order` into a buffer of exactly `len_bits` bits.
    ///
    /// `len_bits` must be known up front: the byte count only bounds it from below.
    /// Shorter inputs are zero-extended; any set bit above `len_bits` is an error.
    pub fn from_bytes(
        bytes: &[u8],
        order: ByteOrder,
        len_bits: usize,
    ) -> Result<Self, RangeError> {
        let mut image = bytes.to_vec();
        order.arrange(&mut image);

        let needed = bytes_for_bits(len_bits);
        let overflow = RangeError::BytesOverflow { bits: len_bits };

        let data = if image.len() > needed {
            let extra = image.len() - needed;
            if image[..extra].iter().any(|&b| b != 0) {
                return Err(overflow);
            }
            image.split_off(extra)
        } else {
            let mut data = vec![0u8; needed - image.len()];
            data.extend_from_slice(&image);
            data
        };

        let pad = needed * 8 - len_bits;
        if pad > 0 && data[0] >> (8 - pad) != 0 {
            return Err(overflow);
        }

        Ok(Self { len_bits, data })
    }

    /// Width of the buffer in bits.
    pub fn len(&self) -> usize {
        self.len_bits
    }

    pub fn is_empty(&self) -> bool {
        self.len_bits == 0
    }

    /// Number of bytes produced by [BitBuffer::to_bytes].
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Big-endian byte image of the buffer's value.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn padding(&self) -> usize {
        self.data.len() * 8 - self.len_bits
    }

    fn check_bounds(&self, start: usize, end: usize) -> Result<(), RangeError> {
        if start >= end {
            return Err(RangeError::InvalidRange { start, end });
        }
        if end > self.len_bits {
            return Err(RangeError::OutOfBounds {
                end,
                len: self.len_bits,
            });
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<(), RangeError> {
        self.check_bounds(start, end)?;
        if end - start > 64 {
            return Err(RangeError::TooManyBits(end - start));
        }

        Ok(())
    }

    /// Returns the unsigned value of bits `start..end` (at most 64 of them).
    pub fn get(&self, start: usize, end: usize) -> Result<u64, RangeError> {
        self.check_range(start, end)?;

        bits::read_bits_at(&self.data, self.padding() + start, end - start)
    }

    /// Replaces bits `start..end` with `value`, leaving every other bit unchanged.
    ///
    /// Fails without modifying the buffer if `value` needs more than `end - start` bits.
    pub fn set(&mut self, start: usize, end: usize, value: u64) -> Result<(), RangeError> {
        self.check_range(start, end)?;

        let pad = self.padding();
        bits::write_bits_at(&mut self.data, pad + start, end - start, value)
    }

    /// Returns bits `start..end` as a new buffer of `end - start` bits. Any width.
    pub fn slice(&self, start: usize, end: usize) -> Result<BitBuffer, RangeError> {
        self.check_bounds(start, end)?;

        let mut out = BitBuffer::new(end - start);
        let out_pad = out.padding();
        bits::copy_bits(
            &self.data,
            self.padding() + start,
            &mut out.data,
            out_pad,
            end - start,
        )?;

        Ok(out)
    }

    /// Replaces bits `start..end` with the value held in `value`, zero-extended.
    ///
    /// `value` may be wider than the range as long as its extra high bits are zero.
    /// Fails without modifying the buffer otherwise.
    pub fn set_slice(
        &mut self,
        start: usize,
        end: usize,
        value: &BitBuffer,
    ) -> Result<(), RangeError> {
        self.check_bounds(start, end)?;

        let n = end - start;
        let value_pad = value.padding();
        let (src_pos, copied) = if value.len_bits > n {
            let extra = value.len_bits - n;
            if !bits::bits_are_zero(&value.data, value_pad, extra)? {
                return Err(RangeError::SliceOverflow {
                    width: value.len_bits,
                    bits: n,
                });
            }
            (value_pad + extra, n)
        } else {
            (value_pad, value.len_bits)
        };

        let pad = self.padding();
        bits::clear_bits(&mut self.data, pad + start, n - copied)?;
        bits::copy_bits(&value.data, src_pos, &mut self.data, pad + end - copied, copied)
    }

    /// Returns bit `index`.
    pub fn bit(&self, index: usize) -> Result<bool, RangeError> {
        self.check_range(index, index.saturating_add(1))?;

        bits::read_bit_at(&self.data, self.padding() + index)
    }

    /// Sets bit `index` to `bit`.
    pub fn set_bit(&mut self, index: usize, bit: bool) -> Result<(), RangeError> {
        self.check_range(index, index.saturating_add(1))?;

        let pad = self.padding();
        bits::write_bit_at(&mut self.data, pad + index, bit)
    }

    /// The whole buffer as an integer, if it is at most 64 bits wide.
    pub fn to_u64(&self) -> Option<u64> {
        match self.len_bits {
            0 => Some(0),
            1..=64 => self.get(0, self.len_bits).ok(),
            _ => None,
        }
    }

    /// The whole buffer as an integer, if it is at most 128 bits wide.
    pub fn to_u128(&self) -> Option<u128> {
        match self.len_bits {
            0..=64 => self.to_u64().map(u128::from),
            65..=128 => {
                let split = self.len_bits - 64;
                let high = self.get(0, split).ok()?;
                let low = self.get(split, self.len_bits).ok()?;
                Some((u128::from(high) << 64) | u128::from(low))
            }
            _ => None,
        }
    }

    /// Serializes the buffer into `ceil(len / 8)` bytes in `order`.
    pub fn to_bytes(&self, order: ByteOrder) -> Vec<u8> {
        let mut out = self.data.clone();
        order.arrange(&mut out);
        out
    }
}

impl fmt::Display for BitBuffer {
    /// Renders every bit, most-significant first, e.g. `0b110`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0b")?;
        let pad = self.padding();
        for pos in pad..pad + self.len_bits {
            let bit = (self.data[pos / 8] >> (7 - pos % 8)) & 1;
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }

        Ok(())
    }
}
