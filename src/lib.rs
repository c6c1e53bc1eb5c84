// Copyright (C) Brian G. Milnes 2025

//! tostring-lint - find and remove redundant `ToString()` calls on strings
//!
//! Parses C# sources into a lossless syntax tree, reports every `ToString()`
//! invoked on an expression already typed `string`, and rewrites the call to
//! its receiver while keeping the surrounding formatting.

pub mod syntax;
pub mod lexer;
pub mod parser;
pub mod ast;
pub mod trivia;
pub mod semantics;
pub mod diagnostics;
pub mod suppression;
pub mod analyzer;
pub mod visitor;
pub mod fixer;
pub mod workspace;
pub mod args;
pub mod ast_utils;
pub mod logging;
pub mod tool_runner;

use anyhow::{Context, Result};
use std::path::Path;

// Re-export commonly used items
pub use parser::parser::{parse_file, Parse};
pub use analyzer::analyzer::{analyze, analyze_with, detect, stringify_call, Match, DIAGNOSTIC_ID, RULE};
pub use diagnostics::diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use semantics::semantics::{SemanticModel, Ty, TypeResolver};
pub use fixer::fixer::{apply, code_actions, fix_all, CodeAction, FixError, FixOutcome, FIX_TITLE};
pub use visitor::visitor::DiagnosticVisitor;
pub use workspace::workspace::{analyze_path, analyze_paths, fix_path, FileReport};
pub use args::args::{find_source_files, format_number, get_search_dirs, OutputFormat, StandardArgs};
pub use ast_utils::ast_utils::{find_nodes, LineCol, LineIndex};
pub use tool_runner::tool_runner::{run_tool, ToolConfig, ToolOutcome};

/// Parse a file and print its syntax tree and any errors
pub fn dump_tree(file: &Path) -> Result<usize> {
    let source = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let parsed = parser::parser::parse(&source);

    println!("{:#?}", parsed.syntax_node());
    for error in parsed.errors() {
        eprintln!("{}: {error}", file.display());
    }

    Ok(parsed.errors().len())
}
