use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::Args;
use lit_hash::ObjectId;
use lit_object::{ObjectKind, Tree, TreeEntry};

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct MktreeArgs {
    /// Allow entries that point at objects missing from the store
    #[arg(long)]
    missing: bool,
}

pub fn run(args: &MktreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut tree = Tree::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let entry = parse_tree_line(&line)?;
        if !args.missing && !repo.store().contains(&entry.oid) {
            bail!("missing object {}", entry.oid);
        }
        tree.entries.push(entry);
    }

    // Entries keep their input order.
    let oid = repo.put(ObjectKind::Tree, &tree.serialize_content())?;
    writeln!(out, "{oid}")?;
    Ok(0)
}

/// Parse `<mode> SP <kind> SP <id> TAB <name>`, the `ls-tree` output format.
fn parse_tree_line(line: &str) -> Result<TreeEntry> {
    let Some((header, name)) = line.split_once('\t') else {
        bail!("invalid tree entry: missing tab in {line:?}");
    };
    let parts: Vec<&str> = header.split(' ').collect();
    let [mode, kind, oid] = parts.as_slice() else {
        bail!("invalid tree entry: expected 'mode kind id' in {line:?}");
    };

    // ls-tree pads the tree mode to six digits. Any other mode is printed
    // as stored, leading zeros included.
    let mode = if *kind == "tree" { mode.trim_start_matches('0') } else { *mode };
    let entry = TreeEntry::new(mode, name, ObjectId::from_hex(oid)?)?;
    if entry.kind().as_str() != *kind {
        bail!(
            "entry '{name}' object type ({kind}) doesn't match mode type ({})",
            entry.kind()
        );
    }
    Ok(entry)
}
