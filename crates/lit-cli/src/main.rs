mod commands;

use std::path::PathBuf;
use std::process;

use clap::{error::ErrorKind, Parser};
use tracing_subscriber::EnvFilter;

use commands::Commands;

#[derive(Parser)]
#[command(
    name = "lit",
    about = "A content-addressed object store",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the repository root
    #[arg(long = "lit-dir", env = "LIT_DIR", default_value = ".lit", global = true)]
    lit_dir: PathBuf,

    /// Reject objects with bytes past their declared length
    #[arg(long, global = true)]
    strict: bool,

    /// Zlib compression level for written objects (0-9)
    #[arg(
        long,
        value_name = "level",
        global = true,
        value_parser = clap::value_parser!(u32).range(0..=9)
    )]
    compression: Option<u32>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("LIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(128),
            }
        }
    };

    init_logging();

    match commands::run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("fatal: {e}");
            process::exit(128);
        }
    }
}
