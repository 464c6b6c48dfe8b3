use std::fs;
use std::io;
use std::path::Path;

use lit_hash::{Hasher, ObjectId};
use lit_object::header::write_header;
use lit_object::ObjectKind;
use tracing::debug;

use crate::{zlib, LooseObjectStore, StoreError};

/// Whether a write created the object file or found it already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    AlreadyPresent,
}

impl LooseObjectStore {
    /// Store an object and return its identifier.
    ///
    /// No-op if the object already exists.
    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, StoreError> {
        self.insert(kind, payload).map(|(oid, _)| oid)
    }

    /// Store an object, reporting whether a file was actually written.
    ///
    /// The compressed bytes go to a temp file in the fan-out directory, which
    /// is then published under its final name with a no-clobber link. An
    /// object published by a concurrent writer in the meantime is reported as
    /// [`WriteOutcome::AlreadyPresent`]; an existing file is never replaced.
    pub fn insert(
        &self,
        kind: ObjectKind,
        payload: &[u8],
    ) -> Result<(ObjectId, WriteOutcome), StoreError> {
        let hdr = write_header(kind, payload.len());

        let oid = {
            let mut hasher = Hasher::new();
            hasher.update(&hdr);
            hasher.update(payload);
            hasher.finalize()
        };

        let final_path = self.object_path(&oid);
        if final_path.is_file() {
            debug!(%oid, %kind, "object already stored");
            return Ok((oid, WriteOutcome::AlreadyPresent));
        }

        let fanout = final_path
            .parent()
            .unwrap_or(self.objects_dir.as_path());
        // Tolerates the directory appearing concurrently.
        fs::create_dir_all(fanout).map_err(StoreError::io(fanout))?;

        let mut tmp = tempfile::Builder::new()
            .prefix("tmp_obj_")
            .tempfile_in(fanout)
            .map_err(StoreError::io(fanout))?;
        let tmp_path = tmp.path().to_path_buf();
        zlib::compress_to(
            tmp.as_file_mut(),
            self.options.compression_level,
            &[&hdr, payload],
        )
        .map_err(StoreError::io(&tmp_path))?;
        make_read_only(&tmp_path)?;

        let outcome = match tmp.persist_noclobber(&final_path) {
            Ok(_) => WriteOutcome::Created,
            // The temp file is removed when the returned handle drops.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                WriteOutcome::AlreadyPresent
            }
            Err(e) => return Err(StoreError::io(&final_path)(e.error)),
        };

        debug!(%oid, %kind, size = payload.len(), ?outcome, "stored object");
        Ok((oid, outcome))
    }
}

/// Object files are immutable once published: 0444 on Unix.
fn make_read_only(path: &Path) -> Result<(), StoreError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o444))
            .map_err(StoreError::io(path))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
