use lit_hash::{Hasher, ObjectId};

use crate::header::{parse_header, write_header};
use crate::{ObjectError, ObjectKind};

/// How [`decode_with`] treats bytes beyond the declared payload length.
///
/// Our own encoder never produces them; they only show up in externally
/// supplied or damaged data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Ignore trailing bytes; the payload is cut at the declared length.
    #[default]
    Lenient,
    /// Reject trailing bytes with [`ObjectError::TrailingBytes`].
    Strict,
}

/// Build the canonical form `"<kind> <len>\0<payload>"`.
pub fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let hdr = write_header(kind, payload.len());
    let mut out = Vec::with_capacity(hdr.len() + payload.len());
    out.extend_from_slice(&hdr);
    out.extend_from_slice(payload);
    out
}

/// Split a canonical form into kind and payload, ignoring trailing bytes.
pub fn decode(data: &[u8]) -> Result<(ObjectKind, &[u8]), ObjectError> {
    decode_with(data, DecodeMode::Lenient)
}

/// Split a canonical form into kind and payload.
pub fn decode_with(data: &[u8], mode: DecodeMode) -> Result<(ObjectKind, &[u8]), ObjectError> {
    let (kind, size, header_len) = parse_header(data)?;
    let rest = &data[header_len..];
    if rest.len() < size {
        return Err(ObjectError::Truncated {
            expected: size,
            actual: rest.len(),
        });
    }
    if rest.len() > size && mode == DecodeMode::Strict {
        return Err(ObjectError::TrailingBytes {
            expected: size,
            actual: rest.len(),
        });
    }
    Ok((kind, &rest[..size]))
}

/// An owned object: a kind tag plus its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjectKind,
    pub payload: Vec<u8>,
}

impl Object {
    pub fn new(kind: ObjectKind, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Decode an owned object from its canonical form.
    pub fn decode(data: &[u8], mode: DecodeMode) -> Result<Self, ObjectError> {
        let (kind, payload) = decode_with(data, mode)?;
        Ok(Self::new(kind, payload))
    }

    /// The canonical form of this object.
    pub fn encode(&self) -> Vec<u8> {
        encode(self.kind, &self.payload)
    }

    /// The identifier this object is stored under.
    pub fn id(&self) -> ObjectId {
        Hasher::hash_object(self.kind.as_str(), &self.payload)
    }
}
