use std::path::PathBuf;

use lit_loose::StoreError;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("already initialized: {} exists", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("not a lit repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("invalid branch name: {0:?}")]
    InvalidBranchName(String),

    #[error("unable to read HEAD: {0}")]
    InvalidHead(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
