// Copyright (C) Brian G. Milnes 2025

//! Rule descriptors, diagnostics and the sink they are reported into

pub mod diagnostics {
    use serde::{Deserialize, Serialize, Serializer};

    use crate::ast_utils::ast_utils::LineCol;
    use crate::syntax::syntax::TextRange;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Severity {
        Hidden,
        Info,
        Warning,
        Error,
    }

    impl std::fmt::Display for Severity {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let name = match self {
                Severity::Hidden => "hidden",
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            write!(f, "{name}")
        }
    }

    /// Static description of a rule, shared by every diagnostic it raises.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct RuleDescriptor {
        pub id: &'static str,
        pub title: &'static str,
        /// Positional `{0}`, `{1}`, ... placeholders.
        pub message_format: &'static str,
        pub category: &'static str,
        pub default_severity: Severity,
        pub enabled_by_default: bool,
        pub description: &'static str,
    }

    impl RuleDescriptor {
        pub fn format_message(&self, args: &[&str]) -> String {
            args.iter()
                .enumerate()
                .fold(self.message_format.to_string(), |message, (index, arg)| {
                    message.replace(&format!("{{{index}}}"), arg)
                })
        }

        pub fn create_diagnostic(&self, span: TextRange, location: LineCol, args: &[&str]) -> Diagnostic {
            Diagnostic {
                id: self.id.to_string(),
                message: self.format_message(args),
                severity: self.default_severity,
                span,
                location,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Diagnostic {
        pub id: String,
        pub message: String,
        pub severity: Severity,
        #[serde(serialize_with = "serialize_span")]
        pub span: TextRange,
        pub location: LineCol,
    }

    fn serialize_span<S: Serializer>(span: &TextRange, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Span {
            start: u32,
            end: u32,
        }
        Span {
            start: span.start().into(),
            end: span.end().into(),
        }
        .serialize(serializer)
    }

    impl std::fmt::Display for Diagnostic {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{}:{}: {} {}: {}",
                self.location.line, self.location.column, self.severity, self.id, self.message
            )
        }
    }

    /// Where analysis reports what it finds.
    pub trait DiagnosticSink {
        fn report(&mut self, diagnostic: Diagnostic);
    }

    impl DiagnosticSink for Vec<Diagnostic> {
        fn report(&mut self, diagnostic: Diagnostic) {
            self.push(diagnostic);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::syntax::syntax::TextSize;

        const RULE: RuleDescriptor = RuleDescriptor {
            id: "R1",
            title: "title",
            message_format: "'{0}' then '{1}' then '{0}'",
            category: "Test",
            default_severity: Severity::Warning,
            enabled_by_default: true,
            description: "",
        };

        #[test]
        fn test_format_message_fills_every_placeholder() {
            assert_eq!(RULE.format_message(&["a", "b"]), "'a' then 'b' then 'a'");
        }

        #[test]
        fn test_diagnostic_display_and_json() {
            let span = TextRange::new(TextSize::from(3), TextSize::from(9));
            let diagnostic = RULE.create_diagnostic(span, LineCol { line: 2, column: 4 }, &["x", "y"]);
            assert_eq!(diagnostic.to_string(), "2:4: warning R1: 'x' then 'y' then 'x'");

            let json = serde_json::to_value(&diagnostic).unwrap();
            assert_eq!(json["severity"], "warning");
            assert_eq!(json["span"]["start"], 3);
            assert_eq!(json["span"]["end"], 9);
            assert_eq!(json["location"]["line"], 2);
        }
    }
}
