// Copyright (C) Brian G. Milnes 2025

//! Common test utilities for integration tests

#![allow(dead_code)]

use anyhow::{Context, Result};
use tostring_lint::{analyze, parse_file, Diagnostic};

const HEADER: &str = "
    using System;
    using System.Collections.Generic;
    using System.Linq;
    using System.Text;
    using System.Threading.Tasks;
    using System.Diagnostics;

    namespace ConsoleApplication1
    {
        class Something
        {   
";

const SAMPLE_CONST: &str = "           const string sample = \"sample\";\n";

/// A console-app source with `body` lines inside the constructor of
/// `class Something`, optionally preceded by `const string sample`.
///
/// With the constant, the first body line is line 16; without it, line 15.
pub fn fixture(with_sample_const: bool, body: &[&str]) -> String {
    let mut src = String::from(HEADER);
    if with_sample_const {
        src.push_str(SAMPLE_CONST);
    }
    src.push_str("           public Something()\n");
    src.push_str("           {\n");
    for line in body {
        src.push_str("              ");
        src.push_str(line);
        src.push('\n');
    }
    src.push_str("           }\n");
    src.push_str("        }\n");
    src.push_str("    }");
    src
}

pub fn diagnostics(source: &str) -> Vec<Diagnostic> {
    let file = parse_file(source).unwrap_or_else(|e| panic!("fixture should parse: {e}\n{source}"));
    analyze(&file).unwrap()
}

pub fn message(receiver: &str) -> String {
    format!("ToString() called on string member '{receiver}'")
}

/// Parse a number that may contain thousands separators ("1,234")
pub fn parse_number(s: &str) -> Result<usize> {
    s.replace(',', "")
        .parse()
        .with_context(|| format!("not a number: {s}"))
}
