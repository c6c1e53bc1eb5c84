// Copyright (C) Brian G. Milnes 2025

//! Tool runner shared by the tostring-lint binaries
//!
//! Wraps a tool body with:
//! - Timing measurement
//! - Directory context for compile-mode style editors
//! - Optional logging to files

pub mod tool_runner {
    use std::path::PathBuf;
    use std::time::Instant;

    use anyhow::Result;

    use crate::logging::logging::ToolLogger;

    /// Configuration for a tool run
    pub struct ToolConfig {
        /// Name of the tool (for the logging directory)
        pub tool_name: String,
        /// Directory printed in "Entering directory"
        pub base_dir: PathBuf,
        pub enable_logging: bool,
        /// Suppress banner and timing, for machine-readable output
        pub quiet: bool,
    }

    impl ToolConfig {
        pub fn new(tool_name: &str, base_dir: PathBuf) -> Self {
            ToolConfig {
                tool_name: tool_name.to_string(),
                base_dir,
                enable_logging: false,
                quiet: false,
            }
        }

        pub fn with_logging(mut self, enable_logging: bool) -> Self {
            self.enable_logging = enable_logging;
            self
        }

        pub fn quiet(mut self, quiet: bool) -> Self {
            self.quiet = quiet;
            self
        }
    }

    /// What a tool body reports back.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ToolOutcome {
        pub summary: String,
        /// Diagnostics found or fixes applied; drives the exit status.
        pub findings: usize,
    }

    /// Run a tool body with standard timing, context and optional logging
    pub fn run_tool<F>(config: ToolConfig, tool_fn: F) -> Result<ToolOutcome>
    where
        F: FnOnce(&mut ToolLogger) -> Result<ToolOutcome>,
    {
        let start = Instant::now();

        if !config.quiet {
            println!("Entering directory '{}'", config.base_dir.display());
            println!();
        }

        let mut logger = if config.enable_logging {
            ToolLogger::new(&config.tool_name)
        } else {
            ToolLogger::disabled()
        };
        logger.log_silent(&format!("Entering directory '{}'", config.base_dir.display()));

        let outcome = tool_fn(&mut logger)?;

        if !config.quiet {
            println!();
            println!("{}", outcome.summary);
            println!("Completed in {}ms", start.elapsed().as_millis());
        }

        if config.enable_logging {
            logger.finalize(&outcome.summary);
        }

        Ok(outcome)
    }

}
