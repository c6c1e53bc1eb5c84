// Copyright (C) Brian G. Milnes 2025

//! Tree traversal and position utilities
//!
//! Provides common functions for walking and querying the syntax tree, and
//! for turning offsets into the 1-based line/column pairs users see.

pub mod ast_utils {
    use serde::{Deserialize, Serialize};

    use crate::syntax::syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TextSize, WalkEvent};

    /// Find all nodes of a specific kind, in document order
    pub fn find_nodes(root: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
        find_nodes_where(root, |node| node.kind() == kind)
    }

    /// Find all nodes matching a predicate, in document order
    pub fn find_nodes_where<F>(root: &SyntaxNode, predicate: F) -> Vec<SyntaxNode>
    where
        F: Fn(&SyntaxNode) -> bool,
    {
        let mut results = Vec::new();

        for event in root.preorder() {
            if let WalkEvent::Enter(node) = event {
                if predicate(&node) {
                    results.push(node);
                }
            }
        }

        results
    }

    /// Find the first token of a specific kind within a node
    pub fn find_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        node.descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == kind)
    }

    /// Token starting at `offset`, or the one containing it
    pub fn token_at(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
        if offset > root.text_range().end() {
            return None;
        }
        root.token_at_offset(offset).right_biased()
    }

    /// Check if a node is inside another node of a specific kind
    pub fn is_inside_node_kind(node: &SyntaxNode, kind: SyntaxKind) -> bool {
        node.ancestors().skip(1).any(|ancestor| ancestor.kind() == kind)
    }

    /// 1-based line and column; columns count characters, not bytes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct LineCol {
        pub line: u32,
        pub column: u32,
    }

    impl std::fmt::Display for LineCol {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}:{}", self.line, self.column)
        }
    }

    /// Byte offsets of line starts, for offset to line/column lookup.
    #[derive(Debug, Clone)]
    pub struct LineIndex {
        text: String,
        line_starts: Vec<usize>,
    }

    impl LineIndex {
        pub fn new(text: &str) -> Self {
            let line_starts = std::iter::once(0)
                .chain(text.match_indices('\n').map(|(index, _)| index + 1))
                .collect();
            LineIndex {
                text: text.to_string(),
                line_starts,
            }
        }

        pub fn line_col(&self, offset: TextSize) -> LineCol {
            let offset = usize::from(offset).min(self.text.len());
            let line = self.line_starts.partition_point(|&start| start <= offset);
            let line_start = self.line_starts[line - 1];
            let column = self.text.get(line_start..offset).map_or(0, |s| s.chars().count());
            LineCol {
                line: line as u32,
                column: column as u32 + 1,
            }
        }
    }

}
