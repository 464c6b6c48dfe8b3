use std::fs;
use std::path::{Path, PathBuf};

use lit_hash::hex::is_valid_hex;
use lit_hash::ObjectId;

use crate::{LooseObjectStore, StoreError};

/// Iterator over stored object identifiers, in ascending order.
///
/// Walks the fan-out directories (`00`–`ff`) one at a time. Anything that
/// does not form a 40-character hex identifier, such as an in-flight temp
/// file, is skipped.
pub struct LooseObjectIter {
    /// Fan-out directories still to visit, in reverse order.
    pending_dirs: Vec<(String, PathBuf)>,
    /// Identifiers from the current fan-out directory, in reverse order.
    current: Vec<ObjectId>,
}

impl LooseObjectIter {
    fn new(objects_dir: &Path) -> Result<Self, StoreError> {
        let mut pending_dirs = Vec::new();
        if objects_dir.is_dir() {
            for entry in fs::read_dir(objects_dir).map_err(StoreError::io(objects_dir))? {
                let entry = entry.map_err(StoreError::io(objects_dir))?;
                let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
                if name.len() == 2 && is_valid_hex(&name) && entry.path().is_dir() {
                    pending_dirs.push((name, entry.path()));
                }
            }
        }
        pending_dirs.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        Ok(Self {
            pending_dirs,
            current: Vec::new(),
        })
    }

    fn load_dir(&mut self, prefix: &str, dir: &Path) -> Result<(), StoreError> {
        for entry in fs::read_dir(dir).map_err(StoreError::io(dir))? {
            let entry = entry.map_err(StoreError::io(dir))?;
            let name = entry.file_name();
            let Some(rest) = name.to_str() else { continue };
            if let Ok(oid) = ObjectId::from_hex(&format!("{prefix}{rest}")) {
                self.current.push(oid);
            }
        }
        self.current.sort_unstable_by(|a, b| b.cmp(a));
        Ok(())
    }
}

impl Iterator for LooseObjectIter {
    type Item = Result<ObjectId, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(oid) = self.current.pop() {
                return Some(Ok(oid));
            }
            let (prefix, dir) = self.pending_dirs.pop()?;
            if let Err(e) = self.load_dir(&prefix, &dir) {
                return Some(Err(e));
            }
        }
    }
}

impl LooseObjectStore {
    /// Iterate over all stored object identifiers.
    pub fn iter(&self) -> Result<LooseObjectIter, StoreError> {
        LooseObjectIter::new(&self.objects_dir)
    }
}
