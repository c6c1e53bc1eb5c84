// Copyright (C) Brian G. Milnes 2025

//! Command line arguments shared by the tostring-lint binaries
//!
//! Paths may be files or directories; directories are searched recursively
//! for `.cs` sources.

pub mod args {
    use std::path::{Path, PathBuf};

    use anyhow::{bail, Result};
    use clap::{Parser, ValueEnum};
    use walkdir::WalkDir;

    /// Directories never searched for sources (build output, VCS metadata).
    const SKIPPED_DIRS: &[&str] = &["bin", "obj", "node_modules"];

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
    pub enum OutputFormat {
        #[default]
        Text,
        Json,
    }

    #[derive(Debug, Clone, Parser)]
    #[command(version, about = "Report redundant ToString() calls on strings in C# sources")]
    pub struct StandardArgs {
        /// Files or directories to analyze
        #[arg(default_value = ".")]
        pub paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        pub format: OutputFormat,

        /// Write a run log under logs/<tool>/<date>/
        #[arg(short, long)]
        pub log: bool,
    }

    impl StandardArgs {
        /// Parse the process arguments and check that every path exists.
        pub fn parse() -> Result<Self> {
            let args = <Self as Parser>::parse();
            check_paths(&args.paths)?;
            Ok(args)
        }

        /// Directory reported in "Entering directory".
        pub fn base_dir(&self) -> PathBuf {
            base_dir(&self.paths)
        }

        pub fn get_search_dirs(&self) -> Vec<PathBuf> {
            get_search_dirs(&self.paths)
        }
    }

    pub fn check_paths(paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            if !path.exists() {
                bail!("Path does not exist: {}", path.display());
            }
        }
        Ok(())
    }

    pub fn base_dir(paths: &[PathBuf]) -> PathBuf {
        let first = paths.first().map(PathBuf::as_path).unwrap_or(Path::new("."));
        let dir = if first.is_file() {
            first.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
        } else {
            first
        };
        dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
    }

    /// The directories to search: directories as given, files' parents.
    pub fn get_search_dirs(paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = paths
            .iter()
            .map(|path| {
                if path.is_file() {
                    path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
                } else {
                    path.clone()
                }
            })
            .collect();
        dirs.dedup();
        dirs
    }

    fn is_source_file(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some("cs")
    }

    fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
    }

    /// Every `.cs` file named directly or found under a directory, sorted.
    pub fn find_source_files(paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_file() {
                if is_source_file(path) {
                    files.push(path.clone());
                }
                continue;
            }
            files.extend(
                WalkDir::new(path)
                    .into_iter()
                    .filter_entry(|entry| !is_skipped_dir(entry))
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()))
                    .map(|entry| entry.into_path()),
            );
        }
        files.sort();
        files.dedup();
        files
    }

    /// `1234567` as `1,234,567`.
    pub fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::fs;

        #[test]
        fn test_format_number() {
            assert_eq!(format_number(0), "0");
            assert_eq!(format_number(999), "999");
            assert_eq!(format_number(1000), "1,000");
            assert_eq!(format_number(1234567), "1,234,567");
        }

        #[test]
        fn test_find_source_files_skips_build_output() {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path();
            fs::create_dir_all(root.join("src/nested")).unwrap();
            fs::create_dir_all(root.join("obj")).unwrap();
            fs::create_dir_all(root.join(".git")).unwrap();
            fs::write(root.join("src/A.cs"), "").unwrap();
            fs::write(root.join("src/nested/B.cs"), "").unwrap();
            fs::write(root.join("src/notes.txt"), "").unwrap();
            fs::write(root.join("obj/Gen.cs"), "").unwrap();
            fs::write(root.join(".git/X.cs"), "").unwrap();

            let files = find_source_files(&[root.to_path_buf()]);
            let names: Vec<String> = files
                .iter()
                .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
                .collect();
            assert_eq!(names, vec!["src/A.cs", "src/nested/B.cs"]);
        }

        #[test]
        fn test_explicit_file_is_kept() {
            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join("One.cs");
            fs::write(&file, "").unwrap();
            assert_eq!(find_source_files(&[file.clone(), file.clone()]), vec![file.clone()]);
            assert_eq!(get_search_dirs(&[file]), vec![dir.path().to_path_buf()]);
        }

        #[test]
        fn test_missing_path_is_an_error() {
            assert!(check_paths(&[PathBuf::from("/definitely/not/here.cs")]).is_err());
        }
    }
}
