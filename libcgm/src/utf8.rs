//! Streaming UTF-8 scalar decoder.
//!
//! The decoder is deliberately relaxed: it only rejects byte patterns that make
//! it impossible to split the input into sequences. Overlong forms, surrogates
//! and values above U+10FFFF all decode to whatever their bits spell.

use crate::error::DecodeError;

/// Longest UTF-8 sequence in bytes.
pub const MAX_BYTES: usize = 4;

/// Largest value a four byte sequence can carry.
pub const MAX_SCALAR: u32 = 0x1F_FFFF;

/// Payload bits of a lead byte, indexed by sequence length - 1.
const LEAD_PAYLOAD: [u8; MAX_BYTES] = [0x7f, 0x1f, 0x0f, 0x07];

/// Returns the sequence length announced by a lead byte, or `None` if the byte
/// cannot start a sequence.
pub fn sequence_length(lead: u8) -> Option<usize> {
    if lead & 0x80 == 0x00 {
        Some(1) // 0xxxxxxx
    } else if lead & 0xe0 == 0xc0 {
        Some(2) // 110xxxxx
    } else if lead & 0xf0 == 0xe0 {
        Some(3) // 1110xxxx
    } else if lead & 0xf8 == 0xf0 {
        Some(4) // 11110xxx
    } else {
        None
    }
}

/// Decode one scalar value starting at `*pos`, advancing `*pos` past it.
///
/// The end of `buf` is the exclusive bound. On `InvalidByte` for a bad lead
/// byte the cursor is left just past that byte.
pub fn decode_scalar(buf: &[u8], pos: &mut usize) -> Result<u32, DecodeError> {
    let lead = *buf.get(*pos).ok_or(DecodeError::NoData)?;
    *pos += 1;

    let len = sequence_length(lead).ok_or(DecodeError::InvalidByte)?;
    let mut value = u32::from(lead & LEAD_PAYLOAD[len - 1]);

    for _ in 1..len {
        let byte = *buf.get(*pos).ok_or(DecodeError::TruncatedByte)?;
        if byte & 0xc0 != 0x80 {
            return Err(DecodeError::InvalidByte);
        }
        *pos += 1;
        value = (value << 6) | u32::from(byte & 0x3f);
    }

    Ok(value)
}

/// Append the shortest UTF-8 form of `value` to `out`.
///
/// Returns the number of bytes written, or `None` for values that do not fit
/// in four bytes. Surrogates are encoded like any other value.
pub fn encode_scalar(value: u32, out: &mut Vec<u8>) -> Option<usize> {
    match value {
        0..=0x7f => {
            out.push(value as u8);
            Some(1)
        }
        0x80..=0x7ff => {
            out.push(0xc0 | (value >> 6) as u8);
            out.push(continuation(value));
            Some(2)
        }
        0x800..=0xffff => {
            out.push(0xe0 | (value >> 12) as u8);
            out.push(continuation(value >> 6));
            out.push(continuation(value));
            Some(3)
        }
        0x1_0000..=MAX_SCALAR => {
            out.push(0xf0 | (value >> 18) as u8);
            out.push(continuation(value >> 12));
            out.push(continuation(value >> 6));
            out.push(continuation(value));
            Some(4)
        }
        _ => None,
    }
}

fn continuation(bits: u32) -> u8 {
    0x80 | (bits & 0x3f) as u8
}
