use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for the persisted catalog and favorites (default: $SIKUM_DATA_DIR or `sikum-data`).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session reading one command per line from stdin.
    Run(RunArgs),
    /// Print a single page in a fresh, logged-out session.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Fragment to start at (e.g. `#/browse`).
    #[arg(long, default_value = "")]
    pub fragment: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Fragment to render (e.g. `#/book/3`). Unknown fragments render the home page.
    #[arg(default_value = "")]
    pub fragment: String,
}
