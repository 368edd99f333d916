use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::extra::ExtraStorageSpec;

#[derive(Parser)]
#[command(
    name = "cask",
    about = "Content-addressable blob store for container image data",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory.
    #[arg(long, global = true, default_value = ".cask")]
    pub root: PathBuf,

    /// Extra-storage area as `<path>,<device>,<type>`.
    #[arg(long, global = true, value_name = "PATH,DEV,TYPE")]
    pub extra_storage: Option<ExtraStorageSpec>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store directory layout
    Init,
    /// Store a file (or stdin with `-`) and print its digest
    Put(PutArgs),
    /// Write a blob's bytes to stdout
    Cat(CatArgs),
    /// Remove a blob and all of its metadata
    Rm(RmArgs),
    /// List stored digests
    Ls,
    /// Read or modify per-blob metadata
    Meta(MetaArgs),
}

#[derive(Args)]
pub struct PutArgs {
    /// File to store; `-` reads standard input
    pub file: String,
}

#[derive(Args)]
pub struct CatArgs {
    pub digest: String,
}

#[derive(Args)]
pub struct RmArgs {
    pub digest: String,
}

#[derive(Args)]
pub struct MetaArgs {
    #[command(subcommand)]
    pub action: MetaAction,
}

#[derive(Subcommand)]
pub enum MetaAction {
    /// Set a metadata value for a blob
    Set {
        digest: String,
        key: String,
        value: String,
    },
    /// Print a metadata value
    Get { digest: String, key: String },
    /// Remove a metadata entry
    Rm { digest: String, key: String },
}
