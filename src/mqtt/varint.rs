//! Remaining-length field codec.
//!
//! MQTT encodes the byte count that follows the fixed header as a base-128
//! integer: seven value bits per byte, least significant group first, with the
//! high bit set on every byte except the last. At most four bytes are allowed.
//!
//! | Bytes | Range                        |
//! |-------|------------------------------|
//! | 1     | 0 ..= 127                    |
//! | 2     | 128 ..= 16,383               |
//! | 3     | 16,384 ..= 2,097,151         |
//! | 4     | 2,097,152 ..= 268,435,455    |

use super::error::{DecodeError, EncodeError};
use heapless::Vec;

/// Largest value the 4-byte encoding can carry.
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Maximum number of bytes in an encoded remaining length.
pub const MAX_LENGTH_BYTES: usize = 4;

/// Continuation bit of a length byte.
pub const CONTINUATION: u8 = 0x80;

const VALUE_MASK: u8 = 0x7F;

/// Encode `len` using the minimal number of bytes.
///
/// # Errors
///
/// [`EncodeError::PacketTooLarge`] if `len` exceeds [`MAX_REMAINING_LENGTH`].
///
/// # Examples
///
/// ```rust
/// use libmqtt::mqtt::varint;
///
/// assert_eq!(&varint::encode(127).unwrap()[..], &[0x7F]);
/// assert_eq!(&varint::encode(128).unwrap()[..], &[0x80, 0x01]);
/// ```
pub fn encode(mut len: usize) -> Result<Vec<u8, MAX_LENGTH_BYTES>, EncodeError> {
    if len > MAX_REMAINING_LENGTH {
        return Err(EncodeError::PacketTooLarge);
    }
    let mut out = Vec::new();
    loop {
        let mut byte = (len % 128) as u8;
        len /= 128;
        if len > 0 {
            byte |= CONTINUATION;
        }
        // At most four pushes for values up to MAX_REMAINING_LENGTH.
        out.push(byte).map_err(|_| EncodeError::PacketTooLarge)?;
        if len == 0 {
            break;
        }
    }
    Ok(out)
}

/// Number of bytes [`encode`] produces for `len`.
pub fn encoded_len(len: usize) -> usize {
    match len {
        0..=127 => 1,
        128..=16_383 => 2,
        16_384..=2_097_151 => 3,
        _ => 4,
    }
}

/// Decode a remaining length from the start of `bytes`.
///
/// Returns the value and the number of bytes it occupied.
///
/// # Errors
///
/// - [`DecodeError::MalformedLength`] if four bytes all carry the continuation bit.
/// - [`DecodeError::Truncated`] if `bytes` ends before the terminating byte.
pub fn decode(bytes: &[u8]) -> Result<(usize, usize), DecodeError> {
    let mut value = 0usize;
    let mut multiplier = 1usize;
    for (i, &byte) in bytes.iter().take(MAX_LENGTH_BYTES).enumerate() {
        value += (byte & VALUE_MASK) as usize * multiplier;
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
        multiplier *= 128;
    }
    if bytes.len() >= MAX_LENGTH_BYTES {
        Err(DecodeError::MalformedLength)
    } else {
        Err(DecodeError::Truncated)
    }
}
