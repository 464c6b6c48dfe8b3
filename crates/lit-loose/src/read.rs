use std::fs;
use std::io::{self, Read};

use flate2::read::ZlibDecoder;
use lit_hash::{Hasher, ObjectId};
use lit_object::header::parse_header;
use lit_object::{Object, ObjectKind, Tree};
use tracing::trace;

use crate::{zlib, LooseObjectStore, StoreError};

/// Headers are a kind name, a decimal size and a NUL; 64 bytes is plenty.
const MAX_HEADER_LEN: usize = 64;

impl LooseObjectStore {
    /// Read and decompress an object's canonical form.
    pub fn get_raw(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { oid: *oid })
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };

        let raw = zlib::decompress(&compressed)
            .map_err(|source| StoreError::Corrupt { oid: *oid, source })?;
        trace!(%oid, compressed = compressed.len(), raw = raw.len(), "read object");
        Ok(raw)
    }

    /// Read an object and split it into kind and payload.
    pub fn get(&self, oid: &ObjectId) -> Result<Object, StoreError> {
        let raw = self.get_raw(oid)?;
        self.decode(oid, &raw)
    }

    /// Like [`get`](Self::get), but also checks that the stored bytes hash
    /// back to `oid`.
    pub fn get_verified(&self, oid: &ObjectId) -> Result<Object, StoreError> {
        let raw = self.get_raw(oid)?;
        let actual = Hasher::digest(&raw);
        if actual != *oid {
            return Err(StoreError::HashMismatch {
                path: self.object_path(oid),
                expected: *oid,
                actual,
            });
        }
        self.decode(oid, &raw)
    }

    /// Read an object that must be a tree and parse its entries.
    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree, StoreError> {
        let obj = self.get(oid)?;
        if obj.kind != ObjectKind::Tree {
            return Err(StoreError::UnexpectedKind {
                oid: *oid,
                expected: ObjectKind::Tree,
                actual: obj.kind,
            });
        }
        Tree::parse(&obj.payload).map_err(|source| StoreError::Malformed { oid: *oid, source })
    }

    /// Read just the kind and payload size, decompressing only the header.
    pub fn read_header(&self, oid: &ObjectId) -> Result<(ObjectKind, usize), StoreError> {
        let path = self.object_path(oid);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound { oid: *oid })
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };

        let mut decoder = ZlibDecoder::new(file);
        let mut buf = [0u8; MAX_HEADER_LEN];
        let mut filled = 0;

        while !buf[..filled].contains(&0) {
            if filled == buf.len() {
                return Err(StoreError::Corrupt {
                    oid: *oid,
                    source: io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("header exceeds {MAX_HEADER_LEN} bytes"),
                    ),
                });
            }
            let n = decoder
                .read(&mut buf[filled..])
                .map_err(|source| StoreError::Corrupt { oid: *oid, source })?;
            if n == 0 {
                return Err(StoreError::Corrupt {
                    oid: *oid,
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream ended before header terminator",
                    ),
                });
            }
            filled += n;
        }

        let (kind, size, _) = parse_header(&buf[..filled])
            .map_err(|source| StoreError::Malformed { oid: *oid, source })?;
        Ok((kind, size))
    }

    fn decode(&self, oid: &ObjectId, raw: &[u8]) -> Result<Object, StoreError> {
        Object::decode(raw, self.options.decode_mode)
            .map_err(|source| StoreError::Malformed { oid: *oid, source })
    }
}
