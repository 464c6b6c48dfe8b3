//! Human-readable rendering of blob payloads.
//!
//! This is a display transform only. It never touches the stored bytes and
//! so never affects an object's identifier.

use crate::ObjectError;

/// Strip leading and trailing ASCII whitespace and return the rest as text.
///
/// Fails if the stripped content is not valid UTF-8; invalid sequences are
/// never replaced.
pub fn display_text(payload: &[u8]) -> Result<&str, ObjectError> {
    let start = payload
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(payload.len());
    let end = payload
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    std::str::from_utf8(&payload[start..end]).map_err(|_| ObjectError::InvalidUtf8 {
        context: "blob content",
    })
}
