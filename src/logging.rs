// Copyright (C) Brian G. Milnes 2025

//! Run logs for tostring-lint tools
//!
//! Each run can write a log file organized by tool and date:
//! - logs/<tool-name>/<YYYY-MM-DD>/run-<HH-MM-SS>.log
//!
//! Messages always go to stdout; the file is a copy.

pub mod logging {
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use chrono::{DateTime, Local};

    struct LogFile {
        writer: BufWriter<File>,
        path: PathBuf,
    }

    /// Logger for one tool run
    pub struct ToolLogger {
        file: Option<LogFile>,
        tool_name: String,
        start_time: DateTime<Local>,
    }

    impl ToolLogger {
        /// Logger that only prints to stdout
        pub fn disabled() -> Self {
            ToolLogger {
                file: None,
                tool_name: String::new(),
                start_time: Local::now(),
            }
        }

        /// Logger writing under `logs/` in the working directory
        pub fn new(tool_name: &str) -> Self {
            Self::in_dir(Path::new("logs"), tool_name)
        }

        /// Logger writing under `root`; falls back to stdout only when the
        /// file cannot be created.
        pub fn in_dir(root: &Path, tool_name: &str) -> Self {
            let start_time = Local::now();
            let file = match Self::open(root, tool_name, &start_time) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("Warning: Could not create log file: {e:#}");
                    eprintln!("Continuing without logging...");
                    None
                }
            };
            ToolLogger {
                file,
                tool_name: tool_name.to_string(),
                start_time,
            }
        }

        fn open(root: &Path, tool_name: &str, start_time: &DateTime<Local>) -> Result<LogFile> {
            let dir = root
                .join(tool_name)
                .join(start_time.format("%Y-%m-%d").to_string());
            fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
            let path = dir.join(format!("run-{}.log", start_time.format("%H-%M-%S")));
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            Ok(LogFile {
                writer: BufWriter::new(file),
                path,
            })
        }

        pub fn is_enabled(&self) -> bool {
            self.file.is_some()
        }

        pub fn tool_name(&self) -> &str {
            &self.tool_name
        }

        /// Print a message and copy it to the log file
        pub fn log(&mut self, message: &str) {
            println!("{message}");
            self.log_silent(message);
        }

        /// Log file only
        pub fn log_silent(&mut self, message: &str) {
            if let Some(file) = self.file.as_mut() {
                let _ = writeln!(file.writer, "{message}");
            }
        }

        pub fn log_path(&self) -> Option<&Path> {
            self.file.as_ref().map(|file| file.path.as_path())
        }

        /// Append the run summary with start, end and duration
        pub fn finalize(&mut self, summary: &str) {
            let end_time = Local::now();
            let duration = end_time.signed_duration_since(self.start_time);

            self.log_silent("");
            self.log_silent("=== Run Summary ===");
            self.log_silent(summary);
            self.log_silent(&format!("Started: {}", self.start_time.format("%Y-%m-%d %H:%M:%S")));
            self.log_silent(&format!("Ended: {}", end_time.format("%Y-%m-%d %H:%M:%S")));
            self.log_silent(&format!("Duration: {}ms", duration.num_milliseconds()));

            if let Some(path) = self.log_path().map(Path::to_path_buf) {
                println!("Log saved to: {}", path.display());
            }
            if let Some(file) = self.file.as_mut() {
                let _ = file.writer.flush();
            }
        }
    }

    impl Drop for ToolLogger {
        fn drop(&mut self) {
            if let Some(file) = self.file.as_mut() {
                let _ = file.writer.flush();
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_log_file_layout_and_summary() {
            let dir = tempfile::tempdir().unwrap();
            let mut logger = ToolLogger::in_dir(dir.path(), "tostring-lint-review");
            assert!(logger.is_enabled());
            logger.log("Checked 3 files");
            logger.finalize("Summary: 1 warning");
            let path = logger.log_path().unwrap().to_path_buf();
            drop(logger);

            let relative = path.strip_prefix(dir.path()).unwrap();
            let parts: Vec<String> = relative.iter().map(|p| p.to_string_lossy().into_owned()).collect();
            assert_eq!(parts[0], "tostring-lint-review");
            assert_eq!(parts[1].len(), "YYYY-MM-DD".len());
            assert!(parts[2].starts_with("run-") && parts[2].ends_with(".log"));

            let content = fs::read_to_string(&path).unwrap();
            assert!(content.contains("Checked 3 files"));
            assert!(content.contains("=== Run Summary ==="));
            assert!(content.contains("Summary: 1 warning"));
        }

        #[test]
        fn test_disabled_logger_has_no_file() {
            let mut logger = ToolLogger::disabled();
            logger.log_silent("nowhere");
            assert!(!logger.is_enabled());
            assert!(logger.log_path().is_none());
        }
    }
}
