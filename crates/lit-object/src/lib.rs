//! Object model for lit: canonical encoding, blobs, and tree parsing.
//!
//! Every object is stored as its canonical form, `"<kind> <len>\0<payload>"`.
//! This crate builds and takes apart that byte sequence, and decodes the
//! payload of tree objects into entries. It performs no I/O.

pub mod blob;
mod codec;
pub mod header;
mod tree;

pub use codec::{decode, decode_with, encode, DecodeMode, Object};
pub use tree::{parse_tree, EntryKind, Tree, TreeEntry, TREE_MODE};

use bstr::BString;
use lit_hash::HashError;

/// Structural violations found while decoding objects.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("malformed object: no NUL byte after header")]
    MissingNul,

    #[error("malformed object header: {reason}")]
    InvalidHeader { reason: String },

    #[error("unknown object kind: {0}")]
    UnknownKind(BString),

    #[error("truncated object: expected {expected} payload bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("object has trailing data: expected {expected} payload bytes, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("{context} is not valid UTF-8")]
    InvalidUtf8 { context: &'static str },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The kinds of object this store understands.
///
/// Commits and tags are not modelled; their headers decode as
/// [`ObjectError::UnknownKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
}

impl ObjectKind {
    /// Parse the kind name used in object headers.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            _ => Err(ObjectError::UnknownKind(BString::from(s))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}
