// Copyright (C) Brian G. Milnes 2025

//! Review: report ToString() calls on expressions that are already strings
//!
//! Usage:
//!   tostring-lint-review src/             # text, one line per warning
//!   tostring-lint-review -f json App.cs   # JSON reports
//!   tostring-lint-review --log .          # also write logs/<tool>/<date>/
//!
//! Exits with status 1 when any warning is reported.
//!
//! Binary: tostring-lint-review

use anyhow::Result;
use tostring_lint::{
    analyze_paths, find_source_files, format_number, run_tool, FileReport, OutputFormat, StandardArgs,
    ToolConfig, ToolOutcome,
};

fn main() -> Result<()> {
    let args = StandardArgs::parse()?;
    let files = find_source_files(&args.paths);

    let config = ToolConfig::new("tostring-lint-review", args.base_dir())
        .with_logging(args.log)
        .quiet(args.format == OutputFormat::Json);

    let outcome = run_tool(config, |logger| {
        let mut reports: Vec<FileReport> = Vec::new();
        let mut unreadable = 0;
        for result in analyze_paths(&files) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    eprintln!("error: {e:#}");
                    logger.log_silent(&format!("error: {e:#}"));
                    unreadable += 1;
                }
            }
        }

        let warnings: usize = reports.iter().map(|r| r.diagnostics.len()).sum();

        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            OutputFormat::Text => {
                for report in &reports {
                    for line in report.lines() {
                        logger.log(&line);
                    }
                    if !report.parse_errors.is_empty() {
                        logger.log(&format!(
                            "{}: note: {} syntax error(s), results may be incomplete",
                            report.path.display(),
                            report.parse_errors.len()
                        ));
                    }
                }
            }
        }

        let mut summary = format!(
            "Summary: {} files checked, {} warnings",
            format_number(files.len()),
            format_number(warnings)
        );
        if unreadable > 0 {
            summary.push_str(&format!(", {} unreadable", format_number(unreadable)));
        }
        Ok(ToolOutcome {
            summary,
            findings: warnings,
        })
    })?;

    if outcome.findings > 0 {
        std::process::exit(1);
    }
    Ok(())
}
