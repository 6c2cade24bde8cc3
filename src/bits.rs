//! Low-level bit read and write utilities for byte slices.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.

use crate::errors::RangeError;

/// Number of bytes needed to hold `bits` bits.
pub fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Minimal number of bits needed to represent `value` (0 for 0).
pub fn bit_length(value: u64) -> usize {
    (u64::BITS - value.leading_zeros()) as usize
}

/// Largest value representable in `bits` bits (`bits` must be `<= 64`).
pub fn max_value(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn check_span(data: &[u8], bit_pos: usize, n: usize) -> Result<(), RangeError> {
    if n > 64 {
        return Err(RangeError::TooManyBits(n));
    }

    let len = data.len() * 8;
    match bit_pos.checked_add(n) {
        Some(end) if end <= len => Ok(()),
        Some(end) => Err(RangeError::OutOfBounds { end, len }),
        None => Err(RangeError::OutOfBounds {
            end: usize::MAX,
            len,
        }),
    }
}

/// Reads a single bit at `bit_pos` (0 = MSB of first byte).
pub fn read_bit_at(data: &[u8], bit_pos: usize) -> Result<bool, RangeError> {
    check_span(data, bit_pos, 1)?;

    Ok((data[bit_pos / 8] >> (7 - bit_pos % 8)) & 1 == 1)
}

/// Writes a single bit at `bit_pos` (0 = MSB of first byte).
pub fn write_bit_at(data: &mut [u8], bit_pos: usize, bit: bool) -> Result<(), RangeError> {
    check_span(data, bit_pos, 1)?;

    let mask = 1u8 << (7 - bit_pos % 8);
    if bit {
        data[bit_pos / 8] |= mask;
    } else {
        data[bit_pos / 8] &= !mask;
    }

    Ok(())
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value (max 64 bits). MSB-first.
pub fn read_bits_at(data: &[u8], bit_pos: usize, n: usize) -> Result<u64, RangeError> {
    check_span(data, bit_pos, n)?;

    let mut value = 0u64;
    let mut pos = bit_pos;
    let end = bit_pos + n;

    while pos < end {
        let bit_in_byte = pos % 8;
        let take = (8 - bit_in_byte).min(end - pos);
        let chunk = (data[pos / 8] >> (8 - bit_in_byte - take)) as u64 & max_value(take);

        // `take` is at most 8 and the total is at most 64, so the shift never drops set bits
        value = (value << take) | chunk;
        pos += take;
    }

    Ok(value)
}

/// Writes the low `n` bits of `value` starting at `bit_pos`, MSB-first.
/// Bits outside the range are left untouched.
pub fn write_bits_at(
    data: &mut [u8],
    bit_pos: usize,
    n: usize,
    value: u64,
) -> Result<(), RangeError> {
    check_span(data, bit_pos, n)?;
    if bit_length(value) > n {
        return Err(RangeError::ValueOverflow {
            value: value.into(),
            bits: n,
        });
    }

    let mut pos = bit_pos;
    let end = bit_pos + n;

    while pos < end {
        let bit_in_byte = pos % 8;
        let take = (8 - bit_in_byte).min(end - pos);
        let remaining_after = end - pos - take;
        let chunk = ((value >> remaining_after) & max_value(take)) as u8;
        let shift = 8 - bit_in_byte - take;
        let mask = (max_value(take) as u8) << shift;

        data[pos / 8] = (data[pos / 8] & !mask) | (chunk << shift);
        pos += take;
    }

    Ok(())
}

fn check_wide_span(data: &[u8], bit_pos: usize, n: usize) -> Result<(), RangeError> {
    let len = data.len() * 8;
    match bit_pos.checked_add(n) {
        Some(end) if end <= len => Ok(()),
        end => Err(RangeError::OutOfBounds {
            end: end.unwrap_or(usize::MAX),
            len,
        }),
    }
}

/// Copies `n` bits (any count) from `src` at `src_pos` into `dst` at `dst_pos`, 64 at a time.
pub fn copy_bits(
    src: &[u8],
    src_pos: usize,
    dst: &mut [u8],
    dst_pos: usize,
    n: usize,
) -> Result<(), RangeError> {
    check_wide_span(src, src_pos, n)?;
    check_wide_span(dst, dst_pos, n)?;

    let mut done = 0;
    while done < n {
        let take = (n - done).min(64);
        let chunk = read_bits_at(src, src_pos + done, take)?;
        write_bits_at(dst, dst_pos + done, take, chunk)?;
        done += take;
    }

    Ok(())
}

/// Clears `n` bits (any count) starting at `bit_pos`.
pub fn clear_bits(data: &mut [u8], bit_pos: usize, n: usize) -> Result<(), RangeError> {
    check_wide_span(data, bit_pos, n)?;

    let mut done = 0;
    while done < n {
        let take = (n - done).min(64);
        write_bits_at(data, bit_pos + done, take, 0)?;
        done += take;
    }

    Ok(())
}

/// Whether all `n` bits starting at `bit_pos` are zero.
pub fn bits_are_zero(data: &[u8], bit_pos: usize, n: usize) -> Result<bool, RangeError> {
    check_wide_span(data, bit_pos, n)?;

    let mut done = 0;
    while done < n {
        let take = (n - done).min(64);
        if read_bits_at(data, bit_pos + done, take)? != 0 {
            return Ok(false);
        }
        done += take;
    }

    Ok(true)
}
