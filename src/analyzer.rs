// Copyright (C) Brian G. Milnes 2025

//! Analyzer for redundant `ToString()` calls on strings
//!
//! `stringify_call` is the syntactic half of the rule and is shared with the
//! fixer, so what gets flagged and what gets removed cannot drift apart.

pub mod analyzer {
    use anyhow::Result;

    use crate::ast::ast::{AstNode, Expr, InvocationExpr, SourceFile};
    use crate::ast_utils::ast_utils::LineIndex;
    use crate::diagnostics::diagnostics::{Diagnostic, RuleDescriptor, Severity};
    use crate::semantics::semantics::{SemanticModel, TypeResolver};
    use crate::suppression::suppression::SuppressionMap;
    use crate::syntax::syntax::{SyntaxNode, TextRange};
    use crate::trivia::trivia::{significant_text, trimmed_range};
    use crate::visitor::visitor::DiagnosticVisitor;

    pub const DIAGNOSTIC_ID: &str = "StringToStringAnalyzer";

    /// The stringify member, matched case-sensitively.
    pub const STRINGIFY_MEMBER: &str = "ToString";

    pub const RULE: RuleDescriptor = RuleDescriptor {
        id: DIAGNOSTIC_ID,
        title: "ToString() called on a string",
        message_format: "ToString() called on string member '{0}'",
        category: "Naming",
        default_severity: Severity::Warning,
        enabled_by_default: true,
        description: "Calling ToString() on an expression that is already a string is redundant.",
    };

    /// `<receiver>.ToString(...)`, before any type check.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct StringifyCall {
        pub invocation: InvocationExpr,
        pub receiver: Expr,
    }

    impl StringifyCall {
        /// Full invocation, receiver start through the closing parenthesis.
        pub fn span(&self) -> TextRange {
            trimmed_range(self.invocation.syntax())
        }

        pub fn receiver_text(&self) -> String {
            significant_text(self.receiver.syntax())
        }

        pub fn receiver_is_string<R: TypeResolver + ?Sized>(&self, resolver: &R) -> bool {
            resolver.is_string(&self.receiver)
        }
    }

    pub fn stringify_call(invocation: &InvocationExpr) -> Option<StringifyCall> {
        let Expr::MemberAccess(access) = invocation.callee()? else {
            return None;
        };
        if access.name_text()? != STRINGIFY_MEMBER {
            return None;
        }
        Some(StringifyCall {
            invocation: invocation.clone(),
            receiver: access.receiver()?,
        })
    }

    /// A detected redundant call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Match {
        pub span: TextRange,
        pub receiver_text: String,
    }

    impl Match {
        pub fn to_diagnostic(&self, line_index: &LineIndex) -> Diagnostic {
            RULE.create_diagnostic(self.span, line_index.line_col(self.span.start()), &[&self.receiver_text])
        }
    }

    pub fn detect<R: TypeResolver + ?Sized>(invocation: &InvocationExpr, resolver: &R) -> Option<Match> {
        let call = stringify_call(invocation)?;
        if !call.receiver_is_string(resolver) {
            return None;
        }
        Some(Match {
            span: call.span(),
            receiver_text: call.receiver_text(),
        })
    }

    /// Analyze a parsed file and return its diagnostics in document order
    pub fn analyze(file: &SourceFile) -> Result<Vec<Diagnostic>> {
        analyze_with(file.syntax(), &SemanticModel::new())
    }

    /// Analyze any tree with a caller-supplied resolver; pragma-suppressed
    /// diagnostics are dropped.
    pub fn analyze_with<R: TypeResolver + ?Sized>(root: &SyntaxNode, resolver: &R) -> Result<Vec<Diagnostic>> {
        let suppressions = SuppressionMap::from_root(root)?;
        let line_index = LineIndex::new(&root.text().to_string());
        let mut diagnostics = Vec::new();
        DiagnosticVisitor::new(resolver, &line_index, &mut diagnostics).visit(root);
        diagnostics.retain(|d| !suppressions.is_suppressed(&d.id, d.span.start()));
        Ok(diagnostics)
    }

}
