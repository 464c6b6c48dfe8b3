//! Repository initialization and the central repository handle for lit.
//!
//! A repository is a root directory holding `HEAD`, `refs/` and the loose
//! object store under `objects/`. The root is always passed explicitly;
//! nothing here consults the current working directory.

mod error;
mod init;

pub use error::RepoError;

use std::fs;
use std::path::{Path, PathBuf};

use lit_hash::ObjectId;
use lit_loose::{LooseObjectStore, StoreOptions};
use lit_object::{Object, ObjectKind, Tree};

/// Branch `HEAD` points at in a fresh repository.
pub const DEFAULT_BRANCH: &str = "main";

/// Options for repository initialization.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Branch `HEAD` should reference; [`DEFAULT_BRANCH`] if unset.
    pub default_branch: Option<String>,
}

/// An opened repository.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    store: LooseObjectStore,
}

impl Repository {
    /// Create an empty repository at `root`, which must not exist yet.
    pub fn init(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::init_opts(root, &InitOptions::default())
    }

    /// Create an empty repository at `root` with the given options.
    pub fn init_opts(root: impl AsRef<Path>, options: &InitOptions) -> Result<Self, RepoError> {
        let root = root.as_ref();
        init::init_layout(root, options)?;
        Self::open(root)
    }

    /// Open an existing repository with default store options.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::open_with(root, StoreOptions::default())
    }

    /// Open an existing repository. `root/objects` must be a directory.
    pub fn open_with(root: impl AsRef<Path>, options: StoreOptions) -> Result<Self, RepoError> {
        let root = root.as_ref().to_path_buf();
        let objects_dir = root.join("objects");
        if !objects_dir.is_dir() {
            return Err(RepoError::NotARepository(root));
        }
        Ok(Self {
            store: LooseObjectStore::with_options(objects_dir, options),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &LooseObjectStore {
        &self.store
    }

    /// The ref `HEAD` points at, e.g. `refs/heads/main`.
    pub fn head_ref(&self) -> Result<String, RepoError> {
        let path = self.root.join("HEAD");
        let content = fs::read_to_string(&path).map_err(RepoError::io(&path))?;
        content
            .strip_prefix("ref: ")
            .and_then(|rest| rest.strip_suffix('\n'))
            .map(str::to_string)
            .ok_or_else(|| RepoError::InvalidHead(content.trim_end().to_string()))
    }

    pub fn put(&self, kind: ObjectKind, payload: &[u8]) -> Result<ObjectId, RepoError> {
        Ok(self.store.put(kind, payload)?)
    }

    pub fn get(&self, oid: &ObjectId) -> Result<Object, RepoError> {
        Ok(self.store.get(oid)?)
    }

    pub fn put_file(&self, path: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
        Ok(self.store.put_file(path)?)
    }

    pub fn hash_file(&self, path: impl AsRef<Path>) -> Result<ObjectId, RepoError> {
        Ok(self.store.hash_file(path)?)
    }

    pub fn read_tree(&self, oid: &ObjectId) -> Result<Tree, RepoError> {
        Ok(self.store.read_tree(oid)?)
    }
}
