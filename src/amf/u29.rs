//! Variable-length 29-bit integer (U29) codec
//!
//! ```text
//! 0x00000000 - 0x0000007F : 0xxxxxxx
//! 0x00000080 - 0x00003FFF : 1xxxxxxx 0xxxxxxx
//! 0x00004000 - 0x001FFFFF : 1xxxxxxx 1xxxxxxx 0xxxxxxx
//! 0x00200000 - 0x3FFFFFFF : 1xxxxxxx 1xxxxxxx 1xxxxxxx xxxxxxxx
//! ```
//!
//! The fourth byte carries a full 8 bits. Lengths, reference indices and
//! Integer values all travel through this encoding.

use bytes::{Buf, BufMut};

use crate::error::AmfError;

const MIN_2_BYTE: u32 = 0x80;
const MIN_3_BYTE: u32 = 0x4000;
const MIN_4_BYTE: u32 = 0x20_0000;
const U29_LIMIT: u32 = 0x4000_0000;

/// Bit 28, the sign bit of a signed 29-bit Integer
const SIGN_BIT: u32 = 0x1000_0000;

/// Mask for the 29 payload bits of an Integer
pub const INT_MASK: i64 = 0x1FFF_FFFF;

/// Number of bytes `value` occupies on the wire, or `None` if it cannot be encoded
pub fn encoded_len(value: u32) -> Option<usize> {
    match value {
        v if v < MIN_2_BYTE => Some(1),
        v if v < MIN_3_BYTE => Some(2),
        v if v < MIN_4_BYTE => Some(3),
        v if v < U29_LIMIT => Some(4),
        _ => None,
    }
}

/// Write a U29 value
pub fn write_u29<B: BufMut>(buf: &mut B, value: u32) -> Result<(), AmfError> {
    match encoded_len(value) {
        Some(1) => buf.put_u8(value as u8),
        Some(2) => {
            buf.put_u8(((value >> 7) | 0x80) as u8);
            buf.put_u8((value & 0x7F) as u8);
        }
        Some(3) => {
            buf.put_u8(((value >> 14) | 0x80) as u8);
            buf.put_u8((((value >> 7) & 0x7F) | 0x80) as u8);
            buf.put_u8((value & 0x7F) as u8);
        }
        Some(_) => {
            buf.put_u8((((value >> 22) & 0x7F) | 0x80) as u8);
            buf.put_u8((((value >> 15) & 0x7F) | 0x80) as u8);
            buf.put_u8((((value >> 8) & 0x7F) | 0x80) as u8);
            buf.put_u8((value & 0xFF) as u8);
        }
        None => return Err(AmfError::IntegerOutOfRange(value as i64)),
    }
    Ok(())
}

/// Write a signed Integer payload, masked to 29 bits
pub fn write_i29<B: BufMut>(buf: &mut B, value: i64) -> Result<(), AmfError> {
    write_u29(buf, (value & INT_MASK) as u32)
}

/// Read an unsigned U29 value
pub fn read_u29<B: Buf>(buf: &mut B) -> Result<u32, AmfError> {
    let mut result: u32 = 0;

    for _ in 0..3 {
        if !buf.has_remaining() {
            return Err(AmfError::BufferUnderrun);
        }
        let b = buf.get_u8() as u32;
        if b & 0x80 == 0 {
            return Ok((result << 7) | b);
        }
        result = (result << 7) | (b & 0x7F);
    }

    if !buf.has_remaining() {
        return Err(AmfError::BufferUnderrun);
    }
    Ok((result << 8) | buf.get_u8() as u32)
}

/// Read a U29 value and sign-extend it as a 29-bit Integer
pub fn read_i29<B: Buf>(buf: &mut B) -> Result<i32, AmfError> {
    read_u29(buf).map(sign_extend)
}

/// Sign-extend a 29-bit value whose bit 28 is the sign bit
pub fn sign_extend(value: u32) -> i32 {
    if value & SIGN_BIT != 0 {
        value as i32 - 0x2000_0000
    } else {
        value as i32
    }
}
