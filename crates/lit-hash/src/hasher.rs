use digest::Digest;
use sha1::Sha1;

use crate::ObjectId;

/// Streaming SHA-1 computation producing an [`ObjectId`].
///
/// Data can be fed incrementally with [`update`](Hasher::update) or through
/// the [`std::io::Write`] implementation, then finalised.
#[derive(Clone, Default)]
pub struct Hasher {
    inner: Sha1,
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed data into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalize and return the identifier.
    pub fn finalize(self) -> ObjectId {
        let result = self.inner.finalize();
        let mut bytes = [0u8; ObjectId::LEN];
        bytes.copy_from_slice(result.as_slice());
        ObjectId::new(bytes)
    }

    /// Convenience: hash data in one call.
    pub fn digest(data: &[u8]) -> ObjectId {
        let mut h = Self::new();
        h.update(data);
        h.finalize()
    }

    /// Hash an object without building its canonical form in memory:
    /// `"{kind} {len}\0{payload}"`.
    pub fn hash_object(kind: &str, payload: &[u8]) -> ObjectId {
        let mut h = Self::new();
        h.update_header(kind, payload.len() as u64);
        h.update(payload);
        h.finalize()
    }

    /// Feed just the canonical header for an object of `len` payload bytes.
    pub fn update_header(&mut self, kind: &str, len: u64) {
        self.update(format!("{kind} {len}\0").as_bytes());
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
