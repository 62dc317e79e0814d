//=====================================================
// File: main.rs
//=====================================================
// Author: VeldWorks
// License: MIT
// Goal: Autoloader probe CLI
// Objective: Configure namespace roots from the command line and either
//            print the derived path for a symbol or perform the load
//=====================================================

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use veld_autoload::{Autoloader, Resolution, SourceHost};

#[derive(Parser, Debug)]
#[command(name = "veld-autoload", about = "Veld namespace autoloader probe")]
struct Args {
    /// Namespace root mapping, formatted NS=DIR. Repeatable; roots are
    /// registered in the order given.
    #[arg(long = "root", value_name = "NS=DIR", required = true)]
    roots: Vec<String>,

    /// Use PSR-4 instead of PSR-0 for every root.
    #[arg(long)]
    psr4: bool,

    /// Namespace separator, backslash by default.
    #[arg(long, default_value = "\\")]
    separator: char,

    /// Check that candidate files exist before loading them.
    #[arg(long = "check-files-exist")]
    check_files_exist: bool,

    /// Print each root's derived path without touching the file system.
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Fully-qualified symbol to resolve.
    symbol: String,
}

struct PrintingHost;

impl SourceHost for PrintingHost {
    fn define(&mut self, symbol: &str, path: &Path, source: &str) -> Result<(), String> {
        println!("loaded {symbol} from {} ({} bytes)", path.display(), source.len());
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let registry = Autoloader::new();

    // Kept in the order the roots were given; `Autoloader::loaders` makes
    // no ordering promise.
    let mut loaders = Vec::new();
    for root in &args.roots {
        let (namespace, dir) = root
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid root '{root}': expected NS=DIR"))?;
        let loader = registry.loader(namespace);
        loader
            .set_path(dir)
            .set_separator(args.separator)
            .set_check_files_exist(args.check_files_exist);
        loader.set_psr4(args.psr4)?;
        loader
            .register()
            .with_context(|| format!("registering root '{namespace}'"))?;
        loaders.push(loader);
    }

    if args.dry_run {
        for loader in &loaders {
            match loader.resolve(&args.symbol) {
                Some(relative) => println!(
                    "{}: {}",
                    loader.namespace(),
                    loader
                        .path()
                        .map(|base| base.join(&relative))
                        .unwrap_or(relative)
                        .display()
                ),
                None => println!("{}: no match", loader.namespace()),
            }
        }
        return Ok(());
    }

    match registry.resolve(&args.symbol, &mut PrintingHost)? {
        Resolution::Handled => Ok(()),
        Resolution::Declined => Err(anyhow!("no registered root claimed '{}'", args.symbol)),
    }
}

//=====================================================
// End of file
//=====================================================
