// Copyright (C) Brian G. Milnes 2025

//! Tree traversal that feeds every invocation to the detector

pub mod visitor {
    use crate::analyzer::analyzer::detect;
    use crate::ast::ast::{AstNode, InvocationExpr};
    use crate::ast_utils::ast_utils::LineIndex;
    use crate::diagnostics::diagnostics::DiagnosticSink;
    use crate::semantics::semantics::TypeResolver;
    use crate::syntax::syntax::{SyntaxNode, WalkEvent};

    /// Walks a tree in document order and reports every match into a sink
    pub struct DiagnosticVisitor<'a, R: TypeResolver + ?Sized, S: DiagnosticSink + ?Sized> {
        resolver: &'a R,
        line_index: &'a LineIndex,
        sink: &'a mut S,
        invocations: usize,
    }

    impl<'a, R: TypeResolver + ?Sized, S: DiagnosticSink + ?Sized> DiagnosticVisitor<'a, R, S> {
        pub fn new(resolver: &'a R, line_index: &'a LineIndex, sink: &'a mut S) -> Self {
            DiagnosticVisitor {
                resolver,
                line_index,
                sink,
                invocations: 0,
            }
        }

        /// Visit a syntax node and all of its descendants
        pub fn visit(&mut self, node: &SyntaxNode) {
            for event in node.preorder() {
                let WalkEvent::Enter(node) = event else { continue };
                let Some(invocation) = InvocationExpr::cast(node) else { continue };
                self.invocations += 1;
                if let Some(found) = detect(&invocation, self.resolver) {
                    self.sink.report(found.to_diagnostic(self.line_index));
                }
            }
        }

        /// Number of invocation expressions seen so far.
        pub fn invocations(&self) -> usize {
            self.invocations
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::diagnostics::diagnostics::Diagnostic;
        use crate::parser::parser::parse;
        use crate::semantics::semantics::SemanticModel;

        #[test]
        fn test_visits_nested_invocations_outer_first() {
            let src = "string s = \"\"; f(s.ToString().ToString());";
            let root = parse(src).syntax_node();
            let index = LineIndex::new(src);
            let model = SemanticModel::new();
            let mut found: Vec<Diagnostic> = Vec::new();
            let mut visitor = DiagnosticVisitor::new(&model, &index, &mut found);
            visitor.visit(&root);
            assert_eq!(visitor.invocations(), 3);
            let messages: Vec<&str> = found.iter().map(|d| d.message.as_str()).collect();
            assert_eq!(
                messages,
                vec![
                    "ToString() called on string member 's.ToString()'",
                    "ToString() called on string member 's'",
                ]
            );
        }
    }
}
