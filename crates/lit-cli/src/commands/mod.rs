pub mod cat_file;
pub mod hash_object;
pub mod init;
pub mod ls_tree;
pub mod mktree;

use anyhow::Result;
use clap::Subcommand;
use lit_loose::StoreOptions;
use lit_object::DecodeMode;
use lit_repository::Repository;
use tracing::debug;

use crate::Cli;

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty repository
    Init(init::InitArgs),
    /// Compute object ID and optionally create a blob from a file
    HashObject(hash_object::HashObjectArgs),
    /// Provide content or kind and size information for repository objects
    CatFile(cat_file::CatFileArgs),
    /// List the contents of a tree object
    LsTree(ls_tree::LsTreeArgs),
    /// Build a tree object from ls-tree formatted text
    Mktree(mktree::MktreeArgs),
}

/// Store options derived from the global flags.
pub fn store_options(cli: &Cli) -> StoreOptions {
    let mut opts = StoreOptions::default();
    if cli.strict {
        opts.decode_mode = DecodeMode::Strict;
    }
    if let Some(level) = cli.compression {
        opts.compression_level = level;
    }
    opts
}

pub fn open_repo(cli: &Cli) -> Result<Repository> {
    debug!(lit_dir = %cli.lit_dir.display(), strict = cli.strict, "opening repository");
    Ok(Repository::open_with(&cli.lit_dir, store_options(cli))?)
}

pub fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Commands::Init(args) => init::run(args, cli),
        Commands::HashObject(args) => hash_object::run(args, cli),
        Commands::CatFile(args) => cat_file::run(args, cli),
        Commands::LsTree(args) => ls_tree::run(args, cli),
        Commands::Mktree(args) => mktree::run(args, cli),
    }
}
