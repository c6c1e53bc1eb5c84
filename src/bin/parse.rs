// Copyright (C) Brian G. Milnes 2025

//! Parse a C# file and dump its syntax tree
//!
//! Binary: tostring-lint-parse

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tostring-lint-parse")]
#[command(about = "Dump the syntax tree of a C# file", long_about = None)]
struct Args {
    /// Path to the C# file to parse
    path: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let errors = tostring_lint::dump_tree(&args.path)?;
    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
