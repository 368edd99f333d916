use std::fs;
use std::io::{self, Read, Write};

use anyhow::Context;
use colored::Colorize;

use cask_store::{FsStore, GetOptions, StoreBackend};
use cask_types::Digest;

use crate::cli::{Cli, Command, MetaAction};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let extra_root = cli
        .extra_storage
        .as_ref()
        .map(|spec| spec.extra_path.clone());
    let store = FsStore::open(&cli.root, extra_root)
        .with_context(|| format!("opening store at {}", cli.root.display()))?;
    let options = GetOptions {
        use_extra_storage: cli.extra_storage.is_some(),
    };

    match cli.command {
        Command::Init => {
            println!("initialized store at {}", cli.root.display());
        }
        Command::Put(args) => {
            let data = if args.file == "-" {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf)?;
                buf
            } else {
                fs::read(&args.file).with_context(|| format!("reading {}", args.file))?
            };
            let digest = store.set(&data)?;
            println!("{digest}");
        }
        Command::Cat(args) => {
            let digest = parse_digest(&args.digest)?;
            let data = store.get(&digest, options)?;
            io::stdout().write_all(&data)?;
        }
        Command::Rm(args) => {
            store.delete(&parse_digest(&args.digest)?)?;
        }
        Command::Ls => {
            store.walk(&mut |digest: &Digest| {
                println!("{}  {}", digest.short_hex().cyan(), digest);
                Ok(())
            })?;
        }
        Command::Meta(args) => match args.action {
            MetaAction::Set { digest, key, value } => {
                store.set_metadata(&parse_digest(&digest)?, &key, value.as_bytes())?;
            }
            MetaAction::Get { digest, key } => {
                let data = store.get_metadata(&parse_digest(&digest)?, &key)?;
                io::stdout().write_all(&data)?;
            }
            MetaAction::Rm { digest, key } => {
                store.delete_metadata(&parse_digest(&digest)?, &key)?;
            }
        },
    }

    Ok(())
}

fn parse_digest(s: &str) -> anyhow::Result<Digest> {
    Digest::parse(s).with_context(|| format!("invalid digest {s:?}"))
}
