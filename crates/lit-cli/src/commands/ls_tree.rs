use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use lit_hash::ObjectId;

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct LsTreeArgs {
    /// Show only names
    #[arg(long)]
    name_only: bool,

    /// Tree to list
    #[arg(value_name = "tree")]
    tree: String,
}

pub fn run(args: &LsTreeArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let oid = ObjectId::from_hex(&args.tree)
        .map_err(|_| anyhow::anyhow!("not a tree object: {}", args.tree))?;
    let tree = repo.read_tree(&oid)?;

    for entry in &tree {
        if args.name_only {
            writeln!(out, "{}", entry.name_str()?)?;
        } else {
            writeln!(out, "{}", entry.display_line()?)?;
        }
    }

    Ok(0)
}
