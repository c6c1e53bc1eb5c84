// Copyright (C) Brian G. Milnes 2025

//! Lexer for the C# subset
//!
//! Produces a flat token stream, trivia included. The concatenated token
//! texts always reproduce the input exactly.

pub mod lexer {
    use crate::syntax::syntax::{SyntaxKind, TextRange, TextSize};
    use SyntaxKind::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Token {
        pub kind: SyntaxKind,
        pub range: TextRange,
    }

    /// A lexing or parsing problem at a source range.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SyntaxError {
        pub message: String,
        pub range: TextRange,
    }

    impl std::fmt::Display for SyntaxError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "{} at {}..{}",
                self.message,
                u32::from(self.range.start()),
                u32::from(self.range.end())
            )
        }
    }

    /// An open `{ ... }` hole of an interpolated string.
    struct Hole {
        verbatim: bool,
        /// Brackets opened inside the hole and not yet closed.
        depth: usize,
        start: usize,
    }

    struct Lexer<'a> {
        src: &'a str,
        pos: usize,
        at_line_start: bool,
        holes: Vec<Hole>,
        tokens: Vec<Token>,
        errors: Vec<SyntaxError>,
    }

    /// Split `src` into tokens.
    pub fn tokenize(src: &str) -> (Vec<Token>, Vec<SyntaxError>) {
        let mut lexer = Lexer {
            src,
            pos: 0,
            at_line_start: true,
            holes: Vec::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
        };
        while lexer.pos < src.len() {
            lexer.next_token();
        }
        if let Some(hole) = lexer.holes.first() {
            let start = hole.start;
            lexer.error("unterminated interpolated string", start);
        }
        (lexer.tokens, lexer.errors)
    }

    fn range(start: usize, end: usize) -> TextRange {
        TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
    }

    fn is_ident_start(c: char) -> bool {
        c == '_' || c.is_alphabetic()
    }

    fn is_ident_continue(c: char) -> bool {
        c == '_' || c.is_alphanumeric()
    }

    impl<'a> Lexer<'a> {
        fn rest(&self) -> &'a str {
            &self.src[self.pos..]
        }

        fn peek(&self) -> Option<char> {
            self.rest().chars().next()
        }

        fn peek_nth(&self, n: usize) -> Option<char> {
            self.rest().chars().nth(n)
        }

        fn bump_char(&mut self) -> Option<char> {
            let c = self.peek()?;
            self.pos += c.len_utf8();
            Some(c)
        }

        fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
            while let Some(c) = self.peek() {
                if !pred(c) {
                    break;
                }
                self.pos += c.len_utf8();
            }
        }

        fn push(&mut self, kind: SyntaxKind, start: usize) {
            self.tokens.push(Token {
                kind,
                range: range(start, self.pos),
            });
        }

        fn error(&mut self, message: &str, start: usize) {
            self.errors.push(SyntaxError {
                message: message.to_string(),
                range: range(start, self.pos),
            });
        }

        fn next_token(&mut self) {
            let start = self.pos;
            let Some(c) = self.peek() else { return };

            if c.is_whitespace() {
                self.eat_while(char::is_whitespace);
                if self.src[start..self.pos].contains('\n') {
                    self.at_line_start = true;
                }
                self.push(WHITESPACE, start);
                return;
            }

            let line_start = self.at_line_start;
            self.at_line_start = false;

            if c == '#' && line_start {
                self.eat_while(|c| c != '\n' && c != '\r');
                self.push(PREPROCESSOR, start);
                return;
            }

            if self.rest().starts_with("//") {
                self.eat_while(|c| c != '\n' && c != '\r');
                self.push(LINE_COMMENT, start);
                return;
            }

            if self.rest().starts_with("/*") {
                self.pos += 2;
                match self.rest().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => {
                        self.pos = self.src.len();
                        self.error("unterminated block comment", start);
                    }
                }
                self.push(BLOCK_COMMENT, start);
                return;
            }

            if let Some(hole) = self.holes.last() {
                if hole.depth == 0 && (c == '}' || c == ':') {
                    let verbatim = hole.verbatim;
                    self.hole_end(start, verbatim);
                    return;
                }
            }

            if self.rest().starts_with("$@\"") || self.rest().starts_with("@$\"") {
                self.pos += 3;
                self.interpolated_text(start, true, INTERPOLATED_STRING, INTERPOLATED_START);
                return;
            }
            if self.rest().starts_with("$\"") {
                self.pos += 2;
                self.interpolated_text(start, false, INTERPOLATED_STRING, INTERPOLATED_START);
                return;
            }
            if self.rest().starts_with("@\"") {
                self.pos += 1;
                self.verbatim_string_body(start);
                self.push(VERBATIM_STRING, start);
                return;
            }

            if c == '"' {
                self.quoted('"', start);
                self.push(STRING, start);
                return;
            }
            if c == '\'' {
                self.quoted('\'', start);
                self.push(CHAR, start);
                return;
            }

            if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|d| d.is_ascii_digit())) {
                let kind = self.number();
                self.push(kind, start);
                return;
            }

            if is_ident_start(c) || (c == '@' && self.peek_nth(1).is_some_and(is_ident_start)) {
                self.bump_char();
                self.eat_while(is_ident_continue);
                let kind = SyntaxKind::from_keyword(&self.src[start..self.pos]).unwrap_or(IDENT);
                self.push(kind, start);
                return;
            }

            let kind = self.punct();
            self.push(kind, start);
            if let Some(hole) = self.holes.last_mut() {
                match kind {
                    L_PAREN | L_BRACK | L_BRACE => hole.depth += 1,
                    R_PAREN | R_BRACK | R_BRACE => hole.depth = hole.depth.saturating_sub(1),
                    _ => {}
                }
            }
            if kind == ERROR_TOKEN {
                self.error("unexpected character", start);
            }
        }

        /// Regular string or char body with backslash escapes.
        fn quoted(&mut self, quote: char, start: usize) {
            self.bump_char();
            loop {
                match self.bump_char() {
                    Some('\\') => {
                        self.bump_char();
                    }
                    Some(c) if c == quote => return,
                    Some('\n') | None => {
                        self.error("unterminated literal", start);
                        return;
                    }
                    Some(_) => {}
                }
            }
        }

        /// Verbatim body: `"` ... `"`, with `""` as an escaped quote.
        fn verbatim_string_body(&mut self, start: usize) {
            self.bump_char();
            loop {
                match self.bump_char() {
                    Some('"') if self.peek() == Some('"') => {
                        self.bump_char();
                    }
                    Some('"') => return,
                    Some(_) => {}
                    None => {
                        self.error("unterminated verbatim string", start);
                        return;
                    }
                }
            }
        }

        /// Literal text of an interpolated string, from just after its
        /// opening quote or a closing `}`, up to the next hole or the end.
        ///
        /// Pushes `closed` when the string ends here, `open` when a hole
        /// starts (the hole's tokens follow as ordinary tokens).
        fn interpolated_text(&mut self, start: usize, verbatim: bool, closed: SyntaxKind, open: SyntaxKind) {
            loop {
                let Some(c) = self.bump_char() else {
                    self.error("unterminated interpolated string", start);
                    self.push(closed, start);
                    return;
                };
                match c {
                    '{' if self.peek() == Some('{') => {
                        self.bump_char();
                    }
                    '}' if self.peek() == Some('}') => {
                        self.bump_char();
                    }
                    '{' => {
                        self.holes.push(Hole {
                            verbatim,
                            depth: 0,
                            start: self.pos - 1,
                        });
                        self.push(open, start);
                        return;
                    }
                    '\\' if !verbatim => {
                        self.bump_char();
                    }
                    '"' if verbatim && self.peek() == Some('"') => {
                        self.bump_char();
                    }
                    '"' => {
                        self.push(closed, start);
                        return;
                    }
                    '\n' if !verbatim => {
                        self.pos -= 1;
                        self.error("unterminated interpolated string", start);
                        self.push(closed, start);
                        return;
                    }
                    _ => {}
                }
            }
        }

        /// `}` or `:format}` closing a hole, plus the text after it.
        fn hole_end(&mut self, start: usize, verbatim: bool) {
            self.holes.pop();
            if self.peek() == Some(':') {
                self.eat_while(|c| c != '}' && c != '"' && c != '\n');
            }
            if self.peek() == Some('}') {
                self.bump_char();
            } else {
                self.error("unterminated interpolation format", start);
            }
            self.interpolated_text(start, verbatim, INTERPOLATED_END, INTERPOLATED_MID);
        }

        fn number(&mut self) -> SyntaxKind {
            let mut kind = INT_NUMBER;
            if self.rest().starts_with("0x") || self.rest().starts_with("0X") {
                self.pos += 2;
                self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            } else {
                self.eat_while(|c| c.is_ascii_digit() || c == '_');
                if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                    kind = REAL_NUMBER;
                    self.bump_char();
                    self.eat_while(|c| c.is_ascii_digit() || c == '_');
                }
                if matches!(self.peek(), Some('e' | 'E')) {
                    let sign = matches!(self.peek_nth(1), Some('+' | '-'));
                    let digit_at = if sign { 2 } else { 1 };
                    if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                        kind = REAL_NUMBER;
                        self.pos += digit_at;
                        self.eat_while(|c| c.is_ascii_digit());
                    }
                }
            }
            match self.peek() {
                Some('f' | 'F' | 'd' | 'D' | 'm' | 'M') => {
                    self.bump_char();
                    REAL_NUMBER
                }
                Some('u' | 'U' | 'l' | 'L') => {
                    self.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
                    kind
                }
                _ => kind,
            }
        }

        fn punct(&mut self) -> SyntaxKind {
            const TWO: &[(&str, SyntaxKind)] = &[
                ("??", QUESTION2),
                ("==", EQ2),
                ("!=", NEQ),
                ("<=", LTEQ),
                (">=", GTEQ),
                ("&&", AMP2),
                ("||", PIPE2),
                ("+=", PLUS_EQ),
                ("-=", MINUS_EQ),
                ("++", PLUS2),
                ("--", MINUS2),
                ("=>", FAT_ARROW),
            ];
            for (text, kind) in TWO {
                if self.rest().starts_with(text) {
                    self.pos += 2;
                    return *kind;
                }
            }
            let kind = match self.peek() {
                Some('{') => L_BRACE,
                Some('}') => R_BRACE,
                Some('(') => L_PAREN,
                Some(')') => R_PAREN,
                Some('[') => L_BRACK,
                Some(']') => R_BRACK,
                Some(';') => SEMICOLON,
                Some(',') => COMMA,
                Some('.') => DOT,
                Some(':') => COLON,
                Some('?') => QUESTION,
                Some('=') => EQ,
                Some('<') => LT,
                Some('>') => GT,
                Some('+') => PLUS,
                Some('-') => MINUS,
                Some('*') => STAR,
                Some('/') => SLASH,
                Some('%') => PERCENT,
                Some('!') => BANG,
                _ => ERROR_TOKEN,
            };
            self.bump_char();
            kind
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn kinds(src: &str) -> Vec<SyntaxKind> {
            tokenize(src)
                .0
                .into_iter()
                .filter(|t| !t.kind.is_trivia())
                .map(|t| t.kind)
                .collect()
        }

        #[test]
        fn test_lossless() {
            let src = "  // c\n#pragma warning disable X\nvar s = @\"a\"\"b\" + $\"{x.ToString()}\";\n";
            let (tokens, errors) = tokenize(src);
            assert!(errors.is_empty(), "{errors:?}");
            let rebuilt: String = tokens
                .iter()
                .map(|t| &src[usize::from(t.range.start())..usize::from(t.range.end())])
                .collect();
            assert_eq!(rebuilt, src);
        }

        #[test]
        fn test_int_followed_by_member_access() {
            assert_eq!(kinds("5.ToString()"), vec![INT_NUMBER, DOT, IDENT, L_PAREN, R_PAREN]);
        }

        #[test]
        fn test_real_and_suffixes() {
            assert_eq!(kinds("1.5 2e3 3f 4L"), vec![REAL_NUMBER, REAL_NUMBER, REAL_NUMBER, INT_NUMBER]);
        }

        #[test]
        fn test_preprocessor_only_at_line_start() {
            let (tokens, _) = tokenize("#region a\nx");
            assert_eq!(tokens[0].kind, PREPROCESSOR);
        }

        #[test]
        fn test_unterminated_string_reports_error() {
            let (_, errors) = tokenize("\"abc");
            assert_eq!(errors.len(), 1);
        }

        fn texts(src: &str) -> Vec<(SyntaxKind, &str)> {
            tokenize(src)
                .0
                .into_iter()
                .filter(|t| !t.kind.is_trivia())
                .map(|t| (t.kind, &src[usize::from(t.range.start())..usize::from(t.range.end())]))
                .collect()
        }

        #[test]
        fn test_interpolation_holes_are_tokens() {
            assert_eq!(
                texts("$\"a{s.ToString()}b{n:N2}c\""),
                vec![
                    (INTERPOLATED_START, "$\"a{"),
                    (IDENT, "s"),
                    (DOT, "."),
                    (IDENT, "ToString"),
                    (L_PAREN, "("),
                    (R_PAREN, ")"),
                    (INTERPOLATED_MID, "}b{"),
                    (IDENT, "n"),
                    (INTERPOLATED_END, ":N2}c\""),
                ]
            );
        }

        #[test]
        fn test_interpolation_without_holes_is_one_token() {
            assert_eq!(kinds("$\"{{x}} \\\"\""), vec![INTERPOLATED_STRING]);
            assert_eq!(kinds("$@\"a\"\"b\""), vec![INTERPOLATED_STRING]);
        }

        #[test]
        fn test_nested_strings_and_brackets_in_holes() {
            assert_eq!(
                kinds("$\"{(b ? \"}\" : $\"{x}\")}\""),
                vec![
                    INTERPOLATED_START,
                    L_PAREN,
                    IDENT,
                    QUESTION,
                    STRING,
                    COLON,
                    INTERPOLATED_START,
                    IDENT,
                    INTERPOLATED_END,
                    R_PAREN,
                    INTERPOLATED_END,
                ]
            );
        }

        #[test]
        fn test_unclosed_hole_reports_error() {
            let (_, errors) = tokenize("$\"a{x");
            assert_eq!(errors.len(), 1);
        }
    }
}
