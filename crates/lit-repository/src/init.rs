use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::{InitOptions, RepoError, DEFAULT_BRANCH};

/// Create a new, empty repository layout at `root`:
///
/// - `HEAD` (pointing at the default branch)
/// - `objects/`
/// - `refs/`
///
/// `root` itself must not exist yet. If it does, nothing on disk is touched.
pub(crate) fn init_layout(root: &Path, options: &InitOptions) -> Result<(), RepoError> {
    let branch = options.default_branch.as_deref().unwrap_or(DEFAULT_BRANCH);
    validate_branch_name(branch)?;

    if root.symlink_metadata().is_ok() {
        return Err(RepoError::AlreadyInitialized(root.to_path_buf()));
    }

    if let Some(parent) = root.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(RepoError::io(parent))?;
    }
    // Creating the root itself is the atomic claim on the path.
    match fs::create_dir(root) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(RepoError::AlreadyInitialized(root.to_path_buf()));
        }
        Err(e) => return Err(RepoError::io(root)(e)),
    }

    // Past this point the root is ours; a failure must not leave it behind.
    undo_on_error(root, || write_layout(root, branch))?;

    info!(root = %root.display(), branch, "initialized empty repository");
    Ok(())
}

fn write_layout(root: &Path, branch: &str) -> Result<(), RepoError> {
    for dir in ["objects", "refs"] {
        let path = root.join(dir);
        fs::create_dir(&path).map_err(RepoError::io(&path))?;
    }

    let head = root.join("HEAD");
    fs::write(&head, format!("ref: refs/heads/{branch}\n")).map_err(RepoError::io(&head))
}

/// Run `f`, removing `root` entirely if it fails.
fn undo_on_error(
    root: &Path,
    f: impl FnOnce() -> Result<(), RepoError>,
) -> Result<(), RepoError> {
    let result = f();
    if result.is_err() {
        if let Err(e) = fs::remove_dir_all(root) {
            warn!(root = %root.display(), error = %e, "could not remove partial repository");
        }
    }
    result
}

/// Branch names end up inside `HEAD` and under `refs/heads/`, so they must
/// be a single printable line without path tricks.
fn validate_branch_name(name: &str) -> Result<(), RepoError> {
    let bad = name.is_empty()
        || name.starts_with('/')
        || name.ends_with('/')
        || name.contains("..")
        || name.contains("//")
        || name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\')
        });
    if bad {
        return Err(RepoError::InvalidBranchName(name.to_string()));
    }
    Ok(())
}
