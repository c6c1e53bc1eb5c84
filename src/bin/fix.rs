// Copyright (C) Brian G. Milnes 2025

//! Fix: remove ToString() calls on strings, rewriting files in place
//!
//! Binary: tostring-lint-fix

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tostring_lint::{args::args::check_paths, find_source_files, fix_path, format_number, run_tool, ToolConfig, ToolOutcome};

#[derive(Parser)]
#[command(name = "tostring-lint-fix")]
#[command(about = "Remove ToString() calls on strings in C# sources", long_about = None)]
struct Args {
    /// Files or directories to fix
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Dry run - report what would change without modifying files
    #[arg(short, long)]
    dry_run: bool,

    /// Write a run log under logs/<tool>/<date>/
    #[arg(short, long)]
    log: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    check_paths(&args.paths)?;
    let files = find_source_files(&args.paths);
    let base_dir = tostring_lint::args::args::base_dir(&args.paths);

    let config = ToolConfig::new("tostring-lint-fix", base_dir).with_logging(args.log);

    run_tool(config, |logger| {
        let mut fixed_files = 0;
        let mut total_fixes = 0;
        let mut skipped = 0;

        for file in &files {
            match fix_path(file, !args.dry_run) {
                Ok(outcome) if outcome.applied > 0 => {
                    let verb = if args.dry_run { "would fix" } else { "fixed" };
                    logger.log(&format!("{}: {verb} {} call(s)", file.display(), outcome.applied));
                    fixed_files += 1;
                    total_fixes += outcome.applied;
                }
                Ok(_) => {}
                Err(e) => {
                    logger.log(&format!("{}: skipped: {e:#}", file.display()));
                    skipped += 1;
                }
            }
        }

        let mode = if args.dry_run { " (dry run)" } else { "" };
        Ok(ToolOutcome {
            summary: format!(
                "Summary{mode}: {} files checked, {} fixes in {} files, {} skipped",
                format_number(files.len()),
                format_number(total_fixes),
                format_number(fixed_files),
                format_number(skipped)
            ),
            findings: total_fixes,
        })
    })?;

    Ok(())
}
