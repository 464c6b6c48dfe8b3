use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use lit_hash::ObjectId;
use lit_object::{blob, Object, ObjectKind, Tree};

use crate::Cli;
use super::open_repo;

#[derive(Args)]
pub struct CatFileArgs {
    /// Show object kind
    #[arg(short = 't', conflicts_with_all = ["size", "pretty"])]
    type_only: bool,

    /// Show object size
    #[arg(short = 's', conflicts_with_all = ["type_only", "pretty"])]
    size: bool,

    /// Pretty-print the object content
    #[arg(short = 'p', conflicts_with_all = ["type_only", "size"])]
    pretty: bool,

    /// Positional args: either <object> (with -t/-s/-p) or <kind> <object>
    #[arg(value_name = "arg")]
    positional: Vec<String>,
}

pub fn run(args: &CatFileArgs, cli: &Cli) -> Result<i32> {
    let repo = open_repo(cli)?;
    let store = repo.store();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let (kind, object_str) = match args.positional.as_slice() {
        [object] if args.type_only || args.size || args.pretty => (None, object.as_str()),
        [kind, object] if !(args.type_only || args.size || args.pretty) => {
            let kind: ObjectKind = kind
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid object type \"{kind}\""))?;
            (Some(kind), object.as_str())
        }
        _ => bail!("usage: lit cat-file (-t | -s | -p | <kind>) <object>"),
    };

    let oid = ObjectId::from_hex(object_str)
        .map_err(|_| anyhow::anyhow!("not a valid object name {object_str}"))?;

    if args.type_only || args.size {
        let (kind, size) = store.read_header(&oid)?;
        if args.type_only {
            writeln!(out, "{kind}")?;
        } else {
            writeln!(out, "{size}")?;
        }
        return Ok(0);
    }

    let obj = store.get(&oid)?;

    if let Some(expected) = kind {
        if obj.kind != expected {
            bail!("{object_str}: bad file (expected {expected}, found {})", obj.kind);
        }
        out.write_all(&obj.payload)?;
        return Ok(0);
    }

    pretty_print(&obj, &mut out)?;
    Ok(0)
}

fn pretty_print(obj: &Object, out: &mut impl Write) -> Result<()> {
    match obj.kind {
        ObjectKind::Blob => {
            writeln!(out, "{}", blob::display_text(&obj.payload)?)?;
        }
        ObjectKind::Tree => {
            let tree = Tree::parse(&obj.payload)?;
            for entry in tree.iter() {
                writeln!(out, "{}", entry.display_line()?)?;
            }
        }
    }
    Ok(())
}
