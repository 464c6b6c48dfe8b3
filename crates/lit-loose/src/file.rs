use std::fs;
use std::io;
use std::path::Path;

use lit_hash::{Hasher, ObjectId};
use lit_object::ObjectKind;

use crate::{LooseObjectStore, StoreError};

/// Identifier a file's contents would get as a blob, without storing it.
///
/// The file is streamed through the hasher rather than read into memory,
/// and must not change length while it is read.
pub fn hash_file(path: impl AsRef<Path>) -> Result<ObjectId, StoreError> {
    let path = path.as_ref();
    let mut file = fs::File::open(path).map_err(StoreError::io(path))?;
    let len = file.metadata().map_err(StoreError::io(path))?.len();

    let mut hasher = Hasher::new();
    hasher.update_header(ObjectKind::Blob.as_str(), len);
    let copied = io::copy(&mut file, &mut hasher).map_err(StoreError::io(path))?;
    if copied != len {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file changed while hashing: expected {len} bytes, read {copied}"),
            ),
        });
    }
    Ok(hasher.finalize())
}

impl LooseObjectStore {
    /// See [`hash_file`]; nothing is written to the store.
    pub fn hash_file(&self, path: impl AsRef<Path>) -> Result<ObjectId, StoreError> {
        hash_file(path)
    }

    /// Store a file's contents as a blob.
    ///
    /// Yields the same identifier [`hash_file`](Self::hash_file) computes for
    /// the same contents.
    pub fn put_file(&self, path: impl AsRef<Path>) -> Result<ObjectId, StoreError> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(StoreError::io(path))?;
        self.put(ObjectKind::Blob, &data)
    }
}
