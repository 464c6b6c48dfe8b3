use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use lit_hash::{Hasher, ObjectId};
use lit_object::ObjectKind;
use lit_repository::Repository;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct HashObjectArgs {
    /// Read the object from stdin
    #[arg(long)]
    stdin: bool,

    /// Actually write the object into the object store
    #[arg(short = 'w')]
    write: bool,

    /// Object kind (default: blob)
    #[arg(short = 't', default_value = "blob")]
    kind: ObjectKind,

    /// Files to hash
    #[arg(value_name = "file")]
    files: Vec<PathBuf>,
}

pub fn run(args: &HashObjectArgs, cli: &Cli) -> Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Only writing needs a repository.
    let repo = if args.write { Some(open_repo(cli)?) } else { None };

    if args.stdin {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        let oid = hash_and_maybe_write(args.kind, &data, repo.as_ref())?;
        writeln!(out, "{oid}")?;
    }

    for file in &args.files {
        let oid = match (&repo, args.kind) {
            (Some(repo), ObjectKind::Blob) => repo.put_file(file)?,
            (Some(repo), kind) => {
                let data = read_file(file)?;
                repo.put(kind, &data)?
            }
            (None, ObjectKind::Blob) => lit_loose::hash_file(file)?,
            (None, kind) => Hasher::hash_object(kind.as_str(), &read_file(file)?),
        };
        writeln!(out, "{oid}")?;
    }

    Ok(0)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("could not open '{}' for reading", path.display()))
}

fn hash_and_maybe_write(
    kind: ObjectKind,
    data: &[u8],
    repo: Option<&Repository>,
) -> Result<ObjectId> {
    match repo {
        Some(repo) => Ok(repo.put(kind, data)?),
        None => Ok(Hasher::hash_object(kind.as_str(), data)),
    }
}
