use crate::{ObjectError, ObjectKind};

/// Parse an object header from the front of a canonical form.
///
/// The header format is `"<kind> <size>\0"`. Returns
/// `(kind, payload_size, header_length)` where `header_length` includes the
/// NUL terminator.
pub fn parse_header(data: &[u8]) -> Result<(ObjectKind, usize, usize), ObjectError> {
    let nul_pos = data
        .iter()
        .position(|&b| b == 0)
        .ok_or(ObjectError::MissingNul)?;

    let header = &data[..nul_pos];
    let space_pos = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ObjectError::InvalidHeader {
            reason: "missing space between kind and size".into(),
        })?;

    let kind = ObjectKind::from_bytes(&header[..space_pos])?;
    let size = parse_size(&header[space_pos + 1..])?;

    Ok((kind, size, nul_pos + 1))
}

/// Decimal ASCII digits only: no sign, no whitespace, not empty.
fn parse_size(digits: &[u8]) -> Result<usize, ObjectError> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(ObjectError::InvalidHeader {
            reason: format!("invalid size: {:?}", String::from_utf8_lossy(digits)),
        });
    }
    // All-digit input is valid UTF-8 and can only fail on overflow.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ObjectError::InvalidHeader {
            reason: "size overflows usize".into(),
        })
}

/// Write an object header: `"<kind> <size>\0"`.
pub fn write_header(kind: ObjectKind, payload_size: usize) -> Vec<u8> {
    format!("{kind} {payload_size}\0").into_bytes()
}
