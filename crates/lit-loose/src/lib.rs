//! Loose object storage: write-once, zlib-compressed objects on disk.
//!
//! Each object lives at `objects/XX/YYYY...` where `XX` is the first byte of
//! its identifier in hex and `YYYY...` the remaining 38 characters. The file
//! holds the zlib-compressed canonical form `"<kind> <size>\0<payload>"`.
//!
//! Files are published atomically and never rewritten: storing content that
//! is already present is a successful no-op, including when two writers
//! race on the same identifier.

mod enumerate;
mod file;
mod read;
mod write;
pub mod zlib;

pub use enumerate::LooseObjectIter;
pub use file::hash_file;
pub use write::WriteOutcome;

use std::path::{Path, PathBuf};

use lit_hash::ObjectId;
use lit_object::{DecodeMode, ObjectError, ObjectKind};

/// Tunables for a [`LooseObjectStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Zlib compression level, 0–9.
    pub compression_level: u32,
    /// How reads treat bytes past an object's declared length.
    pub decode_mode: DecodeMode,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            compression_level: flate2::Compression::default().level(),
            decode_mode: DecodeMode::default(),
        }
    }
}

/// Interface to the loose object directory (`<root>/objects/`).
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    objects_dir: PathBuf,
    options: StoreOptions,
}

impl LooseObjectStore {
    /// Open the store rooted at the given objects directory.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self::with_options(objects_dir, StoreOptions::default())
    }

    pub fn with_options(objects_dir: impl AsRef<Path>, options: StoreOptions) -> Self {
        let mut store = Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            options,
        };
        store.set_compression_level(options.compression_level);
        store
    }

    /// Set the zlib compression level, clamped to 0–9.
    pub fn set_compression_level(&mut self, level: u32) {
        self.options.compression_level = level.min(9);
    }

    pub fn set_decode_mode(&mut self, mode: DecodeMode) {
        self.options.decode_mode = mode;
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// The file path for a given identifier. Pure; does not touch the disk.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }

    /// Whether an object file exists for `oid`.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }
}

/// Errors from loose object operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {oid}")]
    NotFound { oid: ObjectId },

    #[error("corrupt object {oid}: {source}")]
    Corrupt {
        oid: ObjectId,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed object {oid}: {source}")]
    Malformed {
        oid: ObjectId,
        #[source]
        source: ObjectError,
    },

    #[error("object {oid} is a {actual}, not a {expected}")]
    UnexpectedKind {
        oid: ObjectId,
        expected: ObjectKind,
        actual: ObjectKind,
    },

    #[error("hash mismatch for {}: expected {expected}, got {actual}", path.display())]
    HashMismatch {
        path: PathBuf,
        expected: ObjectId,
        actual: ObjectId,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_fans_out_on_first_byte() {
        let store = LooseObjectStore::open("/tmp/objects");
        let oid = ObjectId::from_hex("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();
        assert_eq!(
            store.object_path(&oid),
            PathBuf::from("/tmp/objects/ce/013625030ba8dba906f756967f9e9ca394464a")
        );
    }

    #[test]
    fn compression_level_is_clamped() {
        let mut store = LooseObjectStore::open("/tmp/objects");
        store.set_compression_level(42);
        assert_eq!(store.options().compression_level, 9);
    }

    #[test]
    fn default_options() {
        let opts = StoreOptions::default();
        assert_eq!(opts.compression_level, 6);
        assert_eq!(opts.decode_mode, DecodeMode::Lenient);
    }
}
