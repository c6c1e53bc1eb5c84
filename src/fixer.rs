// Copyright (C) Brian G. Milnes 2025

//! Fixer: replaces a redundant `ToString()` call with its receiver
//!
//! The target is re-derived from the diagnostic span every time, so a fix
//! can be applied to a re-parsed tree or after other fixes in the same file.

pub mod fixer {
    use anyhow::{bail, Result};
    use thiserror::Error;

    use crate::analyzer::analyzer::{analyze, stringify_call, StringifyCall, DIAGNOSTIC_ID};
    use crate::ast::ast::{AstNode, InvocationExpr};
    use crate::ast_utils::ast_utils::token_at;
    use crate::diagnostics::diagnostics::Diagnostic;
    use crate::parser::parser::parse_file;
    use crate::semantics::semantics::{SemanticModel, TypeResolver};
    use crate::syntax::syntax::{GreenNode, SyntaxNode, TextRange};
    use crate::trivia::trivia::with_trivia_from;

    pub const FIX_TITLE: &str = "Remove ToString() calls on Strings";

    /// Fix-all gives up after this many analyze/apply rounds.
    pub const MAX_FIX_ROUNDS: usize = 16;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum FixError {
        #[error("stale fix target: no ToString() call on a string spans {start}..{end}")]
        StaleTarget { start: u32, end: u32 },
    }

    impl FixError {
        fn stale(span: TextRange) -> Self {
            FixError::StaleTarget {
                start: span.start().into(),
                end: span.end().into(),
            }
        }
    }

    pub fn fixable_diagnostic_ids() -> &'static [&'static str] {
        &[DIAGNOSTIC_ID]
    }

    /// A fix offered for one diagnostic.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CodeAction {
        pub title: &'static str,
        /// Actions sharing a key can be applied together.
        pub equivalence_key: &'static str,
        pub span: TextRange,
    }

    impl CodeAction {
        pub fn apply(&self, root: &SyntaxNode) -> Result<SyntaxNode, FixError> {
            apply(root, self.span)
        }
    }

    pub fn code_actions(diagnostics: &[Diagnostic]) -> Vec<CodeAction> {
        diagnostics
            .iter()
            .filter(|d| fixable_diagnostic_ids().contains(&d.id.as_str()))
            .map(|d| CodeAction {
                title: FIX_TITLE,
                equivalence_key: FIX_TITLE,
                span: d.span,
            })
            .collect()
    }

    /// The stringify call on a string whose span is exactly `span`.
    pub fn find_target<R: TypeResolver + ?Sized>(root: &SyntaxNode, span: TextRange, resolver: &R) -> Option<StringifyCall> {
        let token = token_at(root, span.start())?;
        let call = token
            .parent()?
            .ancestors()
            .filter_map(InvocationExpr::cast)
            .filter_map(|invocation| stringify_call(&invocation))
            .find(|call| call.span() == span)?;
        call.receiver_is_string(resolver).then_some(call)
    }

    pub fn apply(root: &SyntaxNode, span: TextRange) -> Result<SyntaxNode, FixError> {
        apply_with(root, span, &SemanticModel::new())
    }

    /// Returns a new tree; `root` is left untouched.
    pub fn apply_with<R: TypeResolver + ?Sized>(root: &SyntaxNode, span: TextRange, resolver: &R) -> Result<SyntaxNode, FixError> {
        let call = find_target(root, span, resolver).ok_or_else(|| FixError::stale(span))?;
        let replacement = with_trivia_from(call.receiver.syntax(), call.invocation.syntax());
        Ok(SyntaxNode::new_root(splice(call.invocation.syntax(), replacement)))
    }

    /// New root green with `node` swapped for `replacement`, whose kind may
    /// differ. The swap happens in the parent's child list.
    fn splice(node: &SyntaxNode, replacement: GreenNode) -> GreenNode {
        match node.parent() {
            Some(parent) => {
                let green = parent.green().replace_child(node.index(), replacement.into());
                parent.replace_with(green)
            }
            None => replacement,
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FixOutcome {
        pub text: String,
        pub applied: usize,
        pub rounds: usize,
    }

    /// Apply every available fix until the source is clean.
    ///
    /// Each round fixes the outermost diagnostics, last first, then re-parses;
    /// nested matches surface again in the next round.
    pub fn fix_all(source: &str) -> Result<FixOutcome> {
        let mut text = source.to_string();
        let mut applied = 0;
        for round in 0..MAX_FIX_ROUNDS {
            let file = parse_file(&text)?;
            let spans = outermost(&analyze(&file)?);
            if spans.is_empty() {
                return Ok(FixOutcome { text, applied, rounds: round });
            }
            let mut tree = file.syntax().clone();
            for span in spans.into_iter().rev() {
                tree = apply(&tree, span)?;
                applied += 1;
            }
            text = tree.to_string();
        }
        bail!("fixes did not settle after {MAX_FIX_ROUNDS} rounds")
    }

    /// Spans not inside any other span, in document order.
    fn outermost(diagnostics: &[Diagnostic]) -> Vec<TextRange> {
        let mut spans: Vec<TextRange> = diagnostics.iter().map(|d| d.span).collect();
        spans.sort_by_key(|span| (span.start(), std::cmp::Reverse(span.end())));
        let mut picked: Vec<TextRange> = Vec::new();
        for span in spans {
            if picked.last().is_some_and(|last| last.end() > span.start()) {
                continue;
            }
            picked.push(span);
        }
        picked
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::parser::parser::parse;
        use crate::syntax::syntax::{SyntaxKind, TextSize};

        fn span_of(src: &str, needle: &str) -> TextRange {
            let start = src.find(needle).unwrap();
            TextRange::at(TextSize::from(start as u32), TextSize::from(needle.len() as u32))
        }

        #[test]
        fn test_apply_replaces_call_with_receiver() {
            let src = "string s = \"\"; f(s.Trim().ToString(\"N\"));";
            let root = parse(src).syntax_node();
            let fixed = apply(&root, span_of(src, "s.Trim().ToString(\"N\")")).unwrap();
            assert_eq!(fixed.to_string(), "string s = \"\"; f(s.Trim());");
            assert_eq!(root.to_string(), src);
        }

        #[test]
        fn test_apply_swaps_in_receivers_of_any_kind() {
            let cases = [
                ("f(\"a\".ToString());", "\"a\".ToString()", "f(\"a\");"),
                ("string s = \"\"; f(s.ToString());", "s.ToString()", "string s = \"\"; f(s);"),
                ("string s = \"\"; f((s).ToString());", "(s).ToString()", "string s = \"\"; f((s));"),
                ("f(string.Empty.ToString());", "string.Empty.ToString()", "f(string.Empty);"),
                ("string s = \"\"; s.ToString();", "s.ToString()", "string s = \"\"; s;"),
            ];
            for (src, target, expected) in cases {
                let fixed = apply(&parse(src).syntax_node(), span_of(src, target)).unwrap();
                assert_eq!(fixed.to_string(), expected);
                assert_eq!(fixed.kind(), SyntaxKind::SOURCE_FILE);
            }
        }

        #[test]
        fn test_apply_keeps_call_site_trivia() {
            let src = "string s = \"\";\n    /* keep */ s.ToString();\n";
            let fixed = apply(&parse(src).syntax_node(), span_of(src, "s.ToString()")).unwrap();
            assert_eq!(fixed.to_string(), "string s = \"\";\n    /* keep */ s;\n");
        }

        #[test]
        fn test_nested_spans_pick_the_exact_invocation() {
            let src = "string s = \"\"; f(s.ToString().ToString());";
            let root = parse(src).syntax_node();
            let inner = apply(&root, span_of(src, "s.ToString()")).unwrap();
            assert_eq!(inner.to_string(), "string s = \"\"; f(s.ToString());");
            let outer = apply(&root, span_of(src, "s.ToString().ToString()")).unwrap();
            assert_eq!(outer.to_string(), "string s = \"\"; f(s.ToString());");
        }

        #[test]
        fn test_stale_span_is_rejected() {
            let src = "int n = 5; string s = \"\"; f(n.ToString()); g(s);";
            let root = parse(src).syntax_node();
            let non_string = span_of(src, "n.ToString()");
            assert_eq!(
                apply(&root, non_string),
                Err(FixError::StaleTarget {
                    start: non_string.start().into(),
                    end: non_string.end().into()
                })
            );
            assert!(apply(&root, span_of(src, "g(s)")).is_err());
            let past_end = TextRange::at(TextSize::from(500), TextSize::from(3));
            assert!(apply(&root, past_end).is_err());
        }

        #[test]
        fn test_code_actions_share_the_title_as_key() {
            let src = "string s = \"\"; f(s.ToString()); g(s.ToString());";
            let diagnostics = analyze(&parse(src).tree()).unwrap();
            let actions = code_actions(&diagnostics);
            assert_eq!(actions.len(), 2);
            assert!(actions.iter().all(|a| a.title == FIX_TITLE && a.equivalence_key == FIX_TITLE));
            let fixed = actions[1].apply(&parse(src).syntax_node()).unwrap();
            assert_eq!(fixed.to_string(), "string s = \"\"; f(s.ToString()); g(s);");
        }

        #[test]
        fn test_fix_all_settles_nested_calls() {
            let src = "string s = \"\"; f(s.ToString().ToString()); g(s.ToString());";
            let outcome = fix_all(src).unwrap();
            assert_eq!(outcome.text, "string s = \"\"; f(s); g(s);");
            assert_eq!(outcome.applied, 3);
            assert_eq!(outcome.rounds, 2);
        }

        #[test]
        fn test_fix_all_on_clean_source_changes_nothing() {
            let src = "int n = 5; f(n.ToString());";
            let outcome = fix_all(src).unwrap();
            assert_eq!(outcome.text, src);
            assert_eq!(outcome.applied, 0);
        }

        #[test]
        fn test_fix_all_rejects_unparsable_source() {
            assert!(fix_all("class C { void M() { x = ; } }").is_err());
        }
    }
}
