//! Lowercase hex encoding and case-insensitive decoding.

use crate::HashError;

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Value of a single ASCII hex digit, or `None` for anything else.
const fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Hex-encode `bytes` into `buf`, which must hold `bytes.len() * 2` bytes.
///
/// # Panics
///
/// Panics if `buf` is too short.
pub fn hex_encode(bytes: &[u8], buf: &mut [u8]) {
    assert!(buf.len() >= bytes.len() * 2, "hex_encode: buffer too short");
    for (pair, &b) in buf.chunks_exact_mut(2).zip(bytes) {
        pair[0] = DIGITS[usize::from(b >> 4)];
        pair[1] = DIGITS[usize::from(b & 0x0f)];
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(DIGITS[usize::from(b >> 4)]));
        out.push(char::from(DIGITS[usize::from(b & 0x0f)]));
    }
    out
}

/// Decode `hex` into `buf`. The string must be exactly `buf.len() * 2` long.
pub fn hex_decode(hex: &str, buf: &mut [u8]) -> Result<(), HashError> {
    let hex = hex.as_bytes();
    if hex.len() != buf.len() * 2 {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (i, out) in buf.iter_mut().enumerate() {
        let digit = |pos: usize| {
            nibble(hex[pos]).ok_or(HashError::InvalidHex {
                position: pos,
                character: char::from(hex[pos]),
            })
        };
        *out = (digit(i * 2)? << 4) | digit(i * 2 + 1)?;
    }
    Ok(())
}

/// Decode a hex string of any even length into a new `Vec<u8>`.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, HashError> {
    if hex.len() % 2 != 0 {
        return Err(HashError::InvalidHexLength {
            expected: hex.len() + 1,
            actual: hex.len(),
        });
    }
    let mut buf = vec![0u8; hex.len() / 2];
    hex_decode(hex, &mut buf)?;
    Ok(buf)
}

/// Even length and nothing but hex digits.
pub fn is_valid_hex(s: &str) -> bool {
    s.len() % 2 == 0 && s.bytes().all(|b| nibble(b).is_some())
}
