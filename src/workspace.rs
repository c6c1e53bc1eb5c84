// Copyright (C) Brian G. Milnes 2025

//! File-level driving: read sources, analyze them in parallel, fix them in place

pub mod workspace {
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use rayon::prelude::*;
    use serde::Serialize;

    use crate::analyzer::analyzer::analyze_with;
    use crate::diagnostics::diagnostics::Diagnostic;
    use crate::fixer::fixer::{fix_all, FixOutcome};
    use crate::parser::parser::parse;
    use crate::semantics::semantics::SemanticModel;

    /// Diagnostics for one file; the tree is analyzed even when it has
    /// syntax errors.
    #[derive(Debug, Clone, Serialize)]
    pub struct FileReport {
        pub path: PathBuf,
        pub diagnostics: Vec<Diagnostic>,
        pub parse_errors: Vec<String>,
    }

    impl FileReport {
        /// `path:line:col: warning Id: message`, one per diagnostic.
        pub fn lines(&self) -> Vec<String> {
            self.diagnostics
                .iter()
                .map(|d| format!("{}:{d}", self.path.display()))
                .collect()
        }
    }

    pub fn analyze_source(source: &str) -> Result<(Vec<Diagnostic>, Vec<String>)> {
        let parsed = parse(source);
        let diagnostics = analyze_with(&parsed.syntax_node(), &SemanticModel::new())?;
        let errors = parsed.errors().iter().map(|e| e.to_string()).collect();
        Ok((diagnostics, errors))
    }

    pub fn analyze_path(path: &Path) -> Result<FileReport> {
        let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let (diagnostics, parse_errors) = analyze_source(&source)?;
        Ok(FileReport {
            path: path.to_path_buf(),
            diagnostics,
            parse_errors,
        })
    }

    /// Analyze files in parallel; results keep the order of `paths`.
    pub fn analyze_paths(paths: &[PathBuf]) -> Vec<Result<FileReport>> {
        paths.par_iter().map(|path| analyze_path(path)).collect()
    }

    /// Fix one file; writes it back only when `write` is set and something changed.
    pub fn fix_path(path: &Path, write: bool) -> Result<FixOutcome> {
        let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let outcome = fix_all(&source).with_context(|| format!("fixing {}", path.display()))?;
        if write && outcome.applied > 0 {
            fs::write(path, &outcome.text).with_context(|| format!("writing {}", path.display()))?;
        }
        Ok(outcome)
    }

}
