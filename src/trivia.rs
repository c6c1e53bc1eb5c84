// Copyright (C) Brian G. Milnes 2025

//! Edge trivia of nodes: measuring it, trimming it and moving it between nodes

pub mod trivia {
    use rowan::{GreenNodeData, GreenTokenData, Language};

    use crate::syntax::syntax::{CSharp, GreenNode, GreenToken, NodeOrToken, SyntaxNode, SyntaxToken, TextRange};

    type GreenElement = NodeOrToken<GreenNode, GreenToken>;

    /// Whitespace, comments and directives at the two edges of a node.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Trivia {
        pub leading: Vec<GreenToken>,
        pub trailing: Vec<GreenToken>,
    }

    impl Trivia {
        pub fn of(node: &SyntaxNode) -> Trivia {
            let tokens = tokens_of(node);
            let Some(first) = tokens.iter().position(|t| !t.kind().is_trivia()) else {
                // A node made only of trivia has it all leading.
                return Trivia {
                    leading: tokens.iter().map(|t| t.green().to_owned()).collect(),
                    trailing: Vec::new(),
                };
            };
            let last = tokens.iter().rposition(|t| !t.kind().is_trivia()).unwrap_or(first);
            Trivia {
                leading: tokens[..first].iter().map(|t| t.green().to_owned()).collect(),
                trailing: tokens[last + 1..].iter().map(|t| t.green().to_owned()).collect(),
            }
        }

        pub fn is_empty(&self) -> bool {
            self.leading.is_empty() && self.trailing.is_empty()
        }

        pub fn leading_text(&self) -> String {
            self.leading.iter().map(|t| t.text()).collect()
        }

        pub fn trailing_text(&self) -> String {
            self.trailing.iter().map(|t| t.text()).collect()
        }
    }

    fn tokens_of(node: &SyntaxNode) -> Vec<SyntaxToken> {
        node.descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .collect()
    }

    /// Range from the first to the last significant token of `node`.
    pub fn trimmed_range(node: &SyntaxNode) -> TextRange {
        let tokens = tokens_of(node);
        let mut significant = tokens.iter().filter(|t| !t.kind().is_trivia());
        match (significant.next(), significant.last()) {
            (Some(first), Some(last)) => first.text_range().cover(last.text_range()),
            (Some(only), None) => only.text_range(),
            _ => node.text_range(),
        }
    }

    /// Text of `node` without its edge trivia; interior trivia is kept.
    pub fn significant_text(node: &SyntaxNode) -> String {
        let tokens = tokens_of(node);
        let Some(first) = tokens.iter().position(|t| !t.kind().is_trivia()) else {
            return String::new();
        };
        let last = tokens.iter().rposition(|t| !t.kind().is_trivia()).unwrap_or(first);
        tokens[first..=last].iter().map(|t| t.text()).collect()
    }

    /// Green copy of `target` wearing the edge trivia of `source` instead of its own.
    pub fn with_trivia_from(target: &SyntaxNode, source: &SyntaxNode) -> GreenNode {
        let trivia = Trivia::of(source);
        let bare = strip_trailing(&strip_leading(&target.green()));
        attach(&bare, trivia)
    }

    fn attach(node: &GreenNodeData, trivia: Trivia) -> GreenNode {
        let children: Vec<GreenElement> = trivia
            .leading
            .into_iter()
            .map(NodeOrToken::Token)
            .chain(node.children().map(owned))
            .chain(trivia.trailing.into_iter().map(NodeOrToken::Token))
            .collect();
        GreenNode::new(node.kind(), children)
    }

    fn owned(element: NodeOrToken<&GreenNodeData, &GreenTokenData>) -> GreenElement {
        match element {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
        }
    }

    fn is_trivia_token(element: &GreenElement) -> bool {
        match element {
            NodeOrToken::Token(token) => CSharp::kind_from_raw(token.kind()).is_trivia(),
            NodeOrToken::Node(_) => false,
        }
    }

    fn is_empty_node(node: &GreenNodeData) -> bool {
        node.children().next().is_none()
    }

    /// Drop trivia before the first significant token, descending into
    /// leftmost child nodes.
    pub fn strip_leading(node: &GreenNodeData) -> GreenNode {
        let mut children: Vec<GreenElement> = node.children().map(owned).collect();
        while let Some(first) = children.first() {
            if is_trivia_token(first) {
                children.remove(0);
                continue;
            }
            if let NodeOrToken::Node(child) = first {
                let stripped = strip_leading(child);
                if is_empty_node(&stripped) {
                    children.remove(0);
                    continue;
                }
                children[0] = NodeOrToken::Node(stripped);
            }
            break;
        }
        GreenNode::new(node.kind(), children)
    }

    /// Mirror of `strip_leading` for the right edge.
    pub fn strip_trailing(node: &GreenNodeData) -> GreenNode {
        let mut children: Vec<GreenElement> = node.children().map(owned).collect();
        while let Some(last) = children.last() {
            if is_trivia_token(last) {
                children.pop();
                continue;
            }
            if let NodeOrToken::Node(child) = last {
                let stripped = strip_trailing(child);
                let index = children.len() - 1;
                if is_empty_node(&stripped) {
                    children.pop();
                    continue;
                }
                children[index] = NodeOrToken::Node(stripped);
            }
            break;
        }
        GreenNode::new(node.kind(), children)
    }

}
