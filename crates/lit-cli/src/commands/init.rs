use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use lit_repository::{InitOptions, Repository};

use crate::Cli;

#[derive(Args)]
pub struct InitArgs {
    /// Override the name of the initial branch
    #[arg(short = 'b', long, value_name = "branch-name")]
    initial_branch: Option<String>,

    /// Be quiet, only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Repository root to create (defaults to --lit-dir)
    directory: Option<PathBuf>,
}

pub fn run(args: &InitArgs, cli: &Cli) -> Result<i32> {
    let target = args.directory.as_ref().unwrap_or(&cli.lit_dir);

    let opts = InitOptions {
        default_branch: args.initial_branch.clone(),
    };
    let repo = Repository::init_opts(target, &opts)?;

    if !args.quiet {
        let stderr = io::stderr();
        let mut err = stderr.lock();
        let root = std::fs::canonicalize(repo.root()).unwrap_or_else(|_| repo.root().to_path_buf());
        let mut display_path = root.display().to_string();
        if !display_path.ends_with('/') {
            display_path.push('/');
        }
        writeln!(err, "Initialized empty repository in {display_path}")?;
    }

    Ok(0)
}
