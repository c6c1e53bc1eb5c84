// Copyright (C) Brian G. Milnes 2025

//! `#pragma warning disable|restore` regions
//!
//! A disable without ids silences every rule until a restore without ids.
//! Positions are compared against the directive's offset, so a directive
//! only affects text after it.

pub mod suppression {
    use anyhow::Result;
    use regex::Regex;

    use crate::syntax::syntax::{SyntaxKind, SyntaxNode, TextSize};

    const PRAGMA_WARNING: &str = r"^#\s*pragma\s+warning\s+(disable|restore)\b(.*)$";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PragmaAction {
        Disable,
        Restore,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Pragma {
        pub offset: TextSize,
        pub action: PragmaAction,
        /// Empty means every rule.
        pub ids: Vec<String>,
    }

    impl Pragma {
        fn applies_to(&self, id: &str) -> bool {
            self.ids.is_empty() || self.ids.iter().any(|listed| listed == id)
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct SuppressionMap {
        pragmas: Vec<Pragma>,
    }

    impl SuppressionMap {
        pub fn from_root(root: &SyntaxNode) -> Result<Self> {
            let pattern = Regex::new(PRAGMA_WARNING)?;
            let pragmas = root
                .descendants_with_tokens()
                .filter_map(|element| element.into_token())
                .filter(|token| token.kind() == SyntaxKind::PREPROCESSOR)
                .filter_map(|token| {
                    let captures = pattern.captures(token.text().trim_end())?;
                    let action = match &captures[1] {
                        "disable" => PragmaAction::Disable,
                        _ => PragmaAction::Restore,
                    };
                    Some(Pragma {
                        offset: token.text_range().start(),
                        action,
                        ids: parse_ids(&captures[2]),
                    })
                })
                .collect();
            Ok(SuppressionMap { pragmas })
        }

        pub fn pragmas(&self) -> &[Pragma] {
            &self.pragmas
        }

        /// Whether rule `id` is disabled at `offset`.
        pub fn is_suppressed(&self, id: &str, offset: TextSize) -> bool {
            self.pragmas
                .iter()
                .take_while(|pragma| pragma.offset < offset)
                .filter(|pragma| pragma.applies_to(id))
                .last()
                .is_some_and(|pragma| pragma.action == PragmaAction::Disable)
        }
    }

    fn parse_ids(rest: &str) -> Vec<String> {
        let rest = rest.split("//").next().unwrap_or_default();
        rest.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::parser::parser::parse;

        fn map(src: &str) -> SuppressionMap {
            SuppressionMap::from_root(&parse(src).syntax_node()).unwrap()
        }

        fn offset_of(src: &str, needle: &str) -> TextSize {
            TextSize::from(src.find(needle).unwrap() as u32)
        }

        #[test]
        fn test_disable_and_restore_by_id() {
            let src = "a();\n#pragma warning disable R1, R2 // quiet\nb();\n#pragma warning restore R1\nc();\n";
            let m = map(src);
            assert_eq!(m.pragmas()[0].ids, vec!["R1", "R2"]);
            assert!(!m.is_suppressed("R1", offset_of(src, "a()")));
            assert!(m.is_suppressed("R1", offset_of(src, "b()")));
            assert!(!m.is_suppressed("R1", offset_of(src, "c()")));
            assert!(m.is_suppressed("R2", offset_of(src, "c()")));
            assert!(!m.is_suppressed("R3", offset_of(src, "b()")));
        }

        #[test]
        fn test_disable_without_ids_covers_every_rule() {
            let src = "#pragma warning disable\nb();\n";
            assert!(map(src).is_suppressed("Anything", offset_of(src, "b()")));
        }

        #[test]
        fn test_other_directives_are_ignored() {
            let src = "#region r\nb();\n#endregion\n";
            assert!(map(src).pragmas().is_empty());
        }
    }
}
