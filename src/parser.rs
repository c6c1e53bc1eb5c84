// Copyright (C) Brian G. Milnes 2025

//! Recursive-descent parser building a lossless rowan tree for the C# subset
//!
//! Trivia is buffered and attached to whichever node is innermost when the
//! next significant token is consumed, so an expression node carries the
//! whitespace and comments that precede its first token.

pub mod parser {
    use anyhow::Result;
    use rowan::{Checkpoint, GreenNodeBuilder};

    use crate::ast::ast::{AstNode, SourceFile};
    use crate::lexer::lexer::{tokenize, SyntaxError, Token};
    use crate::syntax::syntax::{GreenNode, SyntaxKind, SyntaxNode, TextRange, TextSize};
    use SyntaxKind::*;

    /// Result of parsing: the green tree plus every error met on the way.
    #[derive(Debug, Clone)]
    pub struct Parse {
        green: GreenNode,
        errors: Vec<SyntaxError>,
    }

    impl Parse {
        pub fn green(&self) -> &GreenNode {
            &self.green
        }

        pub fn syntax_node(&self) -> SyntaxNode {
            SyntaxNode::new_root(self.green.clone())
        }

        pub fn tree(&self) -> SourceFile {
            SourceFile::cast(self.syntax_node())
                .unwrap_or_else(|| unreachable!("parser always produces a SOURCE_FILE root"))
        }

        pub fn errors(&self) -> &[SyntaxError] {
            &self.errors
        }
    }

    /// Parse source text, tolerating errors.
    pub fn parse(src: &str) -> Parse {
        let (tokens, lex_errors) = tokenize(src);
        let mut p = Parser::new(src, tokens);
        p.lex_errors = lex_errors.iter().map(|e| e.range.start()).collect();
        p.lex_errors.sort();
        p.errors = lex_errors;
        p.source_file();
        p.finish()
    }

    /// Parse source text, rejecting any syntax error.
    pub fn parse_file(src: &str) -> Result<SourceFile> {
        let parsed = parse(src);
        if !parsed.errors().is_empty() {
            let messages: Vec<String> = parsed.errors().iter().map(|e| e.to_string()).collect();
            return Err(anyhow::anyhow!("Parse errors: {}", messages.join("; ")));
        }
        Ok(parsed.tree())
    }

    struct Parser<'a> {
        src: &'a str,
        tokens: Vec<Token>,
        /// Indices of non-trivia tokens.
        significant: Vec<usize>,
        /// Next significant token, as an index into `significant`.
        cursor: usize,
        /// Next raw token not yet handed to the builder.
        emitted: usize,
        builder: GreenNodeBuilder<'static>,
        errors: Vec<SyntaxError>,
        /// Sorted start offsets of lexer errors.
        lex_errors: Vec<TextSize>,
        /// Statements, expressions and type arguments currently open.
        depth: usize,
    }

    /// Deeper constructs are skipped as a single error.
    const MAX_NESTING: usize = 128;

    const PREDEFINED_TYPES: &[&str] = &[
        "string", "object", "bool", "char", "byte", "sbyte", "short", "ushort", "int", "uint",
        "long", "ulong", "float", "double", "decimal", "void",
    ];

    impl<'a> Parser<'a> {
        fn new(src: &'a str, tokens: Vec<Token>) -> Self {
            let significant = tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| !t.kind.is_trivia())
                .map(|(i, _)| i)
                .collect();
            Parser {
                src,
                tokens,
                significant,
                cursor: 0,
                emitted: 0,
                builder: GreenNodeBuilder::new(),
                errors: Vec::new(),
                lex_errors: Vec::new(),
                depth: 0,
            }
        }

        fn finish(self) -> Parse {
            Parse {
                green: self.builder.finish(),
                errors: self.errors,
            }
        }

        // ---- token cursor ----

        fn nth(&self, n: usize) -> SyntaxKind {
            self.significant
                .get(self.cursor + n)
                .map_or(EOF, |&i| self.tokens[i].kind)
        }

        fn current(&self) -> SyntaxKind {
            self.nth(0)
        }

        fn nth_text(&self, n: usize) -> &'a str {
            match self.significant.get(self.cursor + n) {
                Some(&i) => {
                    let range = self.tokens[i].range;
                    &self.src[usize::from(range.start())..usize::from(range.end())]
                }
                None => "",
            }
        }

        fn current_range(&self) -> TextRange {
            match self.significant.get(self.cursor) {
                Some(&i) => self.tokens[i].range,
                None => {
                    let end = TextSize::from(self.src.len() as u32);
                    TextRange::empty(end)
                }
            }
        }

        fn at(&self, kind: SyntaxKind) -> bool {
            self.current() == kind
        }

        fn at_contextual(&self, word: &str) -> bool {
            self.at(IDENT) && self.nth_text(0) == word
        }

        fn emit(&mut self, index: usize) {
            let token = self.tokens[index];
            let text = &self.src[usize::from(token.range.start())..usize::from(token.range.end())];
            self.builder.token(token.kind.into(), text);
            let first = self.lex_errors.partition_point(|&offset| offset < token.range.start());
            if self.lex_errors.get(first).is_some_and(|&offset| offset < token.range.end()) {
                self.error_marker();
            }
        }

        /// Hand buffered trivia to the innermost open node.
        fn flush_trivia(&mut self) {
            let limit = self
                .significant
                .get(self.cursor)
                .copied()
                .unwrap_or(self.tokens.len());
            while self.emitted < limit {
                self.emit(self.emitted);
                self.emitted += 1;
            }
        }

        fn bump(&mut self) {
            let Some(&index) = self.significant.get(self.cursor) else {
                return;
            };
            self.flush_trivia();
            self.emit(index);
            self.emitted = index + 1;
            self.cursor += 1;
        }

        fn eat(&mut self, kind: SyntaxKind) -> bool {
            if self.at(kind) {
                self.bump();
                true
            } else {
                false
            }
        }

        fn expect(&mut self, kind: SyntaxKind) -> bool {
            if self.eat(kind) {
                return true;
            }
            self.error(format!("expected {kind:?}, found {:?}", self.current()));
            false
        }

        /// Record an error and leave an empty `ERROR` node where it happened,
        /// so every problem is visible in the tree.
        fn error(&mut self, message: String) {
            self.push_error(message);
            self.error_marker();
        }

        fn push_error(&mut self, message: String) {
            let range = self.current_range();
            self.errors.push(SyntaxError { message, range });
        }

        fn error_marker(&mut self) {
            self.start(ERROR);
            self.finish_node();
        }

        fn error_and_bump(&mut self, message: &str) {
            self.push_error(message.to_string());
            self.start(ERROR);
            self.bump();
            self.finish_node();
        }

        /// Run `parse` one nesting level deeper, or skip the construct when
        /// the nesting limit is reached.
        fn nested(&mut self, parse: impl FnOnce(&mut Self)) {
            if self.depth >= MAX_NESTING {
                self.skip_too_deep();
                return;
            }
            self.depth += 1;
            parse(self);
            self.depth -= 1;
        }

        /// Consume the rest of the current bracketed group as one `ERROR` node.
        fn skip_too_deep(&mut self) {
            self.push_error("nesting too deep".to_string());
            self.start(ERROR);
            let before = self.cursor;
            let mut open = 0usize;
            loop {
                match self.current() {
                    EOF => break,
                    L_PAREN | L_BRACK | L_BRACE | INTERPOLATED_START => open += 1,
                    R_PAREN | R_BRACK | R_BRACE | INTERPOLATED_END => {
                        if open == 0 {
                            break;
                        }
                        open -= 1;
                    }
                    SEMICOLON | COMMA if open == 0 => break,
                    _ => {}
                }
                self.bump();
            }
            if self.cursor == before && !self.at(EOF) {
                self.bump();
            }
            self.finish_node();
        }

        fn start(&mut self, kind: SyntaxKind) {
            self.builder.start_node(kind.into());
        }

        fn start_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
            self.builder.start_node_at(checkpoint, kind.into());
        }

        fn checkpoint(&self) -> Checkpoint {
            self.builder.checkpoint()
        }

        fn finish_node(&mut self) {
            self.builder.finish_node();
        }

        // ---- lookahead ----

        /// Number of significant tokens forming a type starting at `nth(start)`.
        fn type_len(&self, start: usize) -> Option<usize> {
            self.type_len_at(start, 0)
        }

        fn type_len_at(&self, start: usize, depth: usize) -> Option<usize> {
            if depth > MAX_NESTING {
                return None;
            }
            let mut n = start;
            if self.nth(n) != IDENT {
                return None;
            }
            n += 1;
            while self.nth(n) == DOT && self.nth(n + 1) == IDENT {
                n += 2;
            }
            if self.nth(n) == LT {
                n += self.type_args_len(n, depth)?;
            }
            if self.nth(n) == QUESTION {
                n += 1;
            }
            while self.nth(n) == L_BRACK && matches!(self.nth(n + 1), R_BRACK | COMMA) {
                n += 1;
                while self.nth(n) == COMMA {
                    n += 1;
                }
                if self.nth(n) != R_BRACK {
                    return None;
                }
                n += 1;
            }
            Some(n - start)
        }

        /// Length of `<T, U>` starting at `nth(start)`.
        fn type_args_len(&self, start: usize, depth: usize) -> Option<usize> {
            if self.nth(start) != LT {
                return None;
            }
            let mut n = start + 1;
            loop {
                n += self.type_len_at(n, depth + 1)?;
                if self.nth(n) != COMMA {
                    break;
                }
                n += 1;
            }
            (self.nth(n) == GT).then_some(n + 1 - start)
        }

        /// `<` opening type arguments in an expression (`Foo<int>(x)`), as
        /// opposed to a less-than: the `>` must be followed by a token that
        /// cannot start an operand.
        fn at_type_args(&self) -> bool {
            let Some(len) = self.type_args_len(0, 0) else {
                return false;
            };
            matches!(
                self.nth(len),
                L_PAREN
                    | R_PAREN
                    | R_BRACK
                    | R_BRACE
                    | COLON
                    | SEMICOLON
                    | COMMA
                    | DOT
                    | QUESTION
                    | EQ2
                    | NEQ
                    | AMP2
                    | PIPE2
                    | INTERPOLATED_MID
                    | INTERPOLATED_END
                    | EOF
            )
        }

        fn looks_like_local_decl(&self) -> bool {
            if self.at_contextual("var") && self.nth(1) == IDENT {
                return true;
            }
            match self.type_len(0) {
                Some(n) => self.nth(n) == IDENT && matches!(self.nth(n + 1), EQ | SEMICOLON | COMMA),
                None => false,
            }
        }

        fn type_decl_ahead(&self) -> bool {
            let mut n = 0;
            loop {
                match self.nth(n) {
                    L_BRACK => {
                        let mut depth = 0usize;
                        loop {
                            match self.nth(n) {
                                L_BRACK => depth += 1,
                                R_BRACK => {
                                    depth -= 1;
                                    if depth == 0 {
                                        break;
                                    }
                                }
                                EOF => return false,
                                _ => {}
                            }
                            n += 1;
                        }
                        n += 1;
                    }
                    kind if kind.is_modifier() => n += 1,
                    CLASS_KW | STRUCT_KW => return true,
                    _ => return false,
                }
            }
        }

        fn at_expr_start(&self) -> bool {
            let kind = self.current();
            kind.is_literal()
                || matches!(
                    kind,
                    IDENT
                        | THIS_KW
                        | L_PAREN
                        | NEW_KW
                        | BANG
                        | MINUS
                        | PLUS
                        | PLUS2
                        | MINUS2
                        | INTERPOLATED_START
                )
        }

        // ---- declarations ----

        fn source_file(&mut self) {
            self.start(SOURCE_FILE);
            while !self.at(EOF) {
                self.item();
            }
            self.flush_trivia();
            self.finish_node();
        }

        fn item(&mut self) {
            match self.current() {
                USING_KW => self.using_directive(),
                NAMESPACE_KW => self.namespace_decl(),
                _ if self.type_decl_ahead() => {
                    let cp = self.checkpoint();
                    self.attributes_and_modifiers();
                    self.class_decl(cp);
                }
                _ => self.statement(),
            }
        }

        fn using_directive(&mut self) {
            self.start(USING_DIRECTIVE);
            self.bump();
            while !matches!(self.current(), SEMICOLON | EOF | L_BRACE | R_BRACE) {
                self.bump();
            }
            self.expect(SEMICOLON);
            self.finish_node();
        }

        fn qualified_name(&mut self) {
            self.start(NAME);
            self.expect(IDENT);
            while self.at(DOT) && self.nth(1) == IDENT {
                self.bump();
                self.bump();
            }
            self.finish_node();
        }

        fn namespace_decl(&mut self) {
            self.start(NAMESPACE_DECL);
            self.bump();
            self.qualified_name();
            if self.eat(SEMICOLON) {
                while !self.at(EOF) {
                    self.item();
                }
            } else if self.expect(L_BRACE) {
                while !matches!(self.current(), R_BRACE | EOF) {
                    self.item();
                }
                self.expect(R_BRACE);
            }
            self.finish_node();
        }

        fn attributes_and_modifiers(&mut self) {
            loop {
                if self.at(L_BRACK) {
                    self.balanced(L_BRACK, R_BRACK);
                } else if self.current().is_modifier() {
                    self.bump();
                } else {
                    break;
                }
            }
        }

        /// Consume a bracketed run verbatim, nesting included.
        fn balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
            let mut depth = 0usize;
            loop {
                let kind = self.current();
                if kind == EOF {
                    self.error(format!("unclosed {open:?}"));
                    return;
                }
                self.bump();
                if kind == open {
                    depth += 1;
                } else if kind == close {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
            }
        }

        fn class_decl(&mut self, cp: Checkpoint) {
            self.start_at(cp, CLASS_DECL);
            self.bump();
            let class_name = self.nth_text(0).to_string();
            self.start(NAME);
            self.expect(IDENT);
            self.finish_node();
            if self.at(LT) {
                self.balanced(LT, GT);
            }
            if self.eat(COLON) {
                while !matches!(self.current(), L_BRACE | EOF) {
                    self.bump();
                }
            }
            if self.expect(L_BRACE) {
                while !matches!(self.current(), R_BRACE | EOF) {
                    self.member(&class_name);
                }
                self.expect(R_BRACE);
            }
            self.finish_node();
        }

        fn member(&mut self, class_name: &str) {
            let cp = self.checkpoint();
            self.attributes_and_modifiers();
            match self.current() {
                CLASS_KW | STRUCT_KW => self.class_decl(cp),
                IDENT if self.nth(1) == L_PAREN && self.nth_text(0) == class_name => {
                    self.start_at(cp, CONSTRUCTOR_DECL);
                    self.name();
                    self.param_list();
                    if self.eat(COLON) {
                        if matches!(self.current(), THIS_KW | IDENT) {
                            self.bump();
                        }
                        self.arg_list();
                    }
                    self.body();
                    self.finish_node();
                }
                IDENT => {
                    self.type_ref();
                    match (self.current(), self.nth(1)) {
                        (IDENT, L_PAREN | LT) => {
                            self.start_at(cp, METHOD_DECL);
                            self.name();
                            if self.at(LT) {
                                self.balanced(LT, GT);
                            }
                            self.param_list();
                            self.body();
                            self.finish_node();
                        }
                        (IDENT, L_BRACE | FAT_ARROW) => {
                            self.start_at(cp, PROPERTY_DECL);
                            self.name();
                            if self.eat(FAT_ARROW) {
                                self.expr();
                                self.expect(SEMICOLON);
                            } else {
                                self.accessor_list();
                                if self.eat(EQ) {
                                    self.expr();
                                    self.expect(SEMICOLON);
                                }
                            }
                            self.finish_node();
                        }
                        (IDENT, _) => {
                            self.start_at(cp, FIELD_DECL);
                            self.var_declarators();
                            self.expect(SEMICOLON);
                            self.finish_node();
                        }
                        _ => {
                            self.start_at(cp, ERROR);
                            self.push_error("expected member name".to_string());
                            if !matches!(self.current(), R_BRACE | EOF) {
                                self.bump();
                            }
                            self.finish_node();
                        }
                    }
                }
                _ => {
                    self.start_at(cp, ERROR);
                    self.push_error(format!("unexpected {:?} in type body", self.current()));
                    if !self.at(EOF) {
                        self.bump();
                    }
                    self.finish_node();
                }
            }
        }

        /// Method or constructor body: block, expression body, or `;`.
        fn body(&mut self) {
            if self.at(L_BRACE) {
                self.block();
            } else if self.eat(FAT_ARROW) {
                self.expr();
                self.expect(SEMICOLON);
            } else {
                self.expect(SEMICOLON);
            }
        }

        fn accessor_list(&mut self) {
            self.start(ACCESSOR_LIST);
            self.expect(L_BRACE);
            while !matches!(self.current(), R_BRACE | EOF) {
                if !(self.at(IDENT) || self.current().is_modifier()) {
                    self.error_and_bump("expected accessor");
                    continue;
                }
                self.start(ACCESSOR);
                self.attributes_and_modifiers();
                self.expect(IDENT);
                self.body();
                self.finish_node();
            }
            self.expect(R_BRACE);
            self.finish_node();
        }

        fn name(&mut self) {
            self.start(NAME);
            self.expect(IDENT);
            self.finish_node();
        }

        fn param_list(&mut self) {
            self.start(PARAM_LIST);
            self.expect(L_PAREN);
            while !matches!(self.current(), R_PAREN | EOF) {
                self.param();
                if !self.eat(COMMA) {
                    break;
                }
            }
            self.expect(R_PAREN);
            self.finish_node();
        }

        fn param(&mut self) {
            self.start(PARAM);
            self.attributes_and_modifiers();
            self.eat(THIS_KW);
            self.eat(IN_KW);
            while self.nth(1) == IDENT
                && (self.at_contextual("ref") || self.at_contextual("out") || self.at_contextual("params"))
            {
                self.bump();
            }
            self.type_ref();
            self.name();
            if self.eat(EQ) {
                self.expr();
            }
            self.finish_node();
        }

        fn type_ref(&mut self) {
            self.start(TYPE_REF);
            self.expect(IDENT);
            while self.at(DOT) && self.nth(1) == IDENT {
                self.bump();
                self.bump();
            }
            if self.at(LT) {
                self.type_arg_list();
            }
            self.eat(QUESTION);
            while self.at(L_BRACK) && matches!(self.nth(1), R_BRACK | COMMA) {
                self.bump();
                while self.eat(COMMA) {}
                self.expect(R_BRACK);
            }
            self.finish_node();
        }

        fn type_arg_list(&mut self) {
            self.nested(|p| {
                p.start(TYPE_ARG_LIST);
                p.expect(LT);
                loop {
                    p.type_ref();
                    if !p.eat(COMMA) {
                        break;
                    }
                }
                p.expect(GT);
                p.finish_node();
            });
        }

        fn var_declarators(&mut self) {
            loop {
                self.start(VAR_DECLARATOR);
                self.name();
                if self.eat(EQ) {
                    if self.at(L_BRACE) {
                        self.array_initializer();
                    } else {
                        self.expr();
                    }
                }
                self.finish_node();
                if !self.eat(COMMA) {
                    break;
                }
            }
        }

        // ---- statements ----

        fn block(&mut self) {
            self.start(BLOCK);
            self.expect(L_BRACE);
            while !matches!(self.current(), R_BRACE | EOF) {
                self.statement();
            }
            self.expect(R_BRACE);
            self.finish_node();
        }

        fn statement(&mut self) {
            self.nested(Self::statement_kind);
        }

        fn statement_kind(&mut self) {
            match self.current() {
                L_BRACE => self.block(),
                SEMICOLON => {
                    self.start(EMPTY_STMT);
                    self.bump();
                    self.finish_node();
                }
                RETURN_KW => {
                    self.start(RETURN_STMT);
                    self.bump();
                    if !self.at(SEMICOLON) {
                        self.expr();
                    }
                    self.expect(SEMICOLON);
                    self.finish_node();
                }
                IF_KW => {
                    self.start(IF_STMT);
                    self.bump();
                    self.condition();
                    self.statement();
                    if self.at(ELSE_KW) {
                        self.start(ELSE_CLAUSE);
                        self.bump();
                        self.statement();
                        self.finish_node();
                    }
                    self.finish_node();
                }
                WHILE_KW => {
                    self.start(WHILE_STMT);
                    self.bump();
                    self.condition();
                    self.statement();
                    self.finish_node();
                }
                FOR_KW => self.for_stmt(),
                FOREACH_KW => {
                    self.start(FOREACH_STMT);
                    self.bump();
                    self.expect(L_PAREN);
                    self.type_ref();
                    self.name();
                    self.expect(IN_KW);
                    self.expr();
                    self.expect(R_PAREN);
                    self.statement();
                    self.finish_node();
                }
                BREAK_KW | CONTINUE_KW => {
                    self.start(JUMP_STMT);
                    self.bump();
                    self.expect(SEMICOLON);
                    self.finish_node();
                }
                THROW_KW => {
                    self.start(JUMP_STMT);
                    self.bump();
                    if !self.at(SEMICOLON) {
                        self.expr();
                    }
                    self.expect(SEMICOLON);
                    self.finish_node();
                }
                CONST_KW => {
                    self.start(LOCAL_DECL_STMT);
                    self.bump();
                    self.type_ref();
                    self.var_declarators();
                    self.expect(SEMICOLON);
                    self.finish_node();
                }
                _ if self.looks_like_local_decl() => self.local_decl_stmt(),
                _ if self.at_expr_start() => {
                    self.start(EXPR_STMT);
                    self.expr();
                    self.expect(SEMICOLON);
                    self.finish_node();
                }
                _ => self.error_and_bump("expected statement"),
            }
        }

        fn local_decl_stmt(&mut self) {
            self.start(LOCAL_DECL_STMT);
            self.type_ref();
            self.var_declarators();
            self.expect(SEMICOLON);
            self.finish_node();
        }

        fn condition(&mut self) {
            self.expect(L_PAREN);
            self.expr();
            self.expect(R_PAREN);
        }

        fn for_stmt(&mut self) {
            self.start(FOR_STMT);
            self.bump();
            self.expect(L_PAREN);
            if self.looks_like_local_decl() {
                self.local_decl_stmt();
            } else {
                while !matches!(self.current(), SEMICOLON | EOF) {
                    self.expr();
                    if !self.eat(COMMA) {
                        break;
                    }
                }
                self.expect(SEMICOLON);
            }
            if !self.at(SEMICOLON) {
                self.expr();
            }
            self.expect(SEMICOLON);
            while !matches!(self.current(), R_PAREN | EOF) {
                self.expr();
                if !self.eat(COMMA) {
                    break;
                }
            }
            self.expect(R_PAREN);
            self.statement();
            self.finish_node();
        }

        // ---- expressions ----

        fn expr(&mut self) {
            self.nested(Self::assignment);
        }

        fn assignment(&mut self) {
            let cp = self.checkpoint();
            self.conditional();
            if matches!(self.current(), EQ | PLUS_EQ | MINUS_EQ) {
                self.start_at(cp, ASSIGNMENT_EXPR);
                self.bump();
                if self.at(L_BRACE) {
                    self.array_initializer();
                } else {
                    self.expr();
                }
                self.finish_node();
            }
        }

        fn conditional(&mut self) {
            let cp = self.checkpoint();
            self.binary(1);
            if self.at(QUESTION) {
                self.start_at(cp, CONDITIONAL_EXPR);
                self.bump();
                self.expr();
                self.expect(COLON);
                self.expr();
                self.finish_node();
            }
        }

        /// (left, right) binding power of an infix operator.
        fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
            let bp = match kind {
                QUESTION2 => (2, 1),
                PIPE2 => (3, 4),
                AMP2 => (5, 6),
                EQ2 | NEQ => (7, 8),
                LT | GT | LTEQ | GTEQ | AS_KW | IS_KW => (9, 10),
                PLUS | MINUS => (11, 12),
                STAR | SLASH | PERCENT => (13, 14),
                _ => return None,
            };
            Some(bp)
        }

        fn binary(&mut self, min_bp: u8) {
            self.nested(|p| p.binary_operands(min_bp));
        }

        fn binary_operands(&mut self, min_bp: u8) {
            let cp = self.checkpoint();
            self.unary();
            loop {
                let op = self.current();
                let Some((left_bp, right_bp)) = Self::infix_binding_power(op) else {
                    break;
                };
                if left_bp < min_bp {
                    break;
                }
                match op {
                    AS_KW | IS_KW => {
                        self.start_at(cp, if op == AS_KW { AS_EXPR } else { IS_EXPR });
                        self.bump();
                        self.type_ref();
                    }
                    _ => {
                        self.start_at(cp, BINARY_EXPR);
                        self.bump();
                        self.binary(right_bp);
                    }
                }
                self.finish_node();
            }
        }

        fn unary(&mut self) {
            if matches!(self.current(), BANG | MINUS | PLUS | PLUS2 | MINUS2) {
                self.start(PREFIX_EXPR);
                self.bump();
                self.nested(Self::unary);
                self.finish_node();
            } else if self.at_cast() {
                self.start(CAST_EXPR);
                self.bump();
                self.type_ref();
                self.expect(R_PAREN);
                self.nested(Self::unary);
                self.finish_node();
            } else {
                self.postfix();
            }
        }

        fn at_cast(&self) -> bool {
            if !self.at(L_PAREN) {
                return false;
            }
            let Some(len) = self.type_len(1) else {
                return false;
            };
            if self.nth(1 + len) != R_PAREN {
                return false;
            }
            let next = self.nth(2 + len);
            if PREDEFINED_TYPES.contains(&self.nth_text(1)) && len == 1 {
                return next != R_PAREN && next != EOF;
            }
            next.is_literal() || matches!(next, IDENT | L_PAREN | THIS_KW | NEW_KW | INTERPOLATED_START)
        }

        fn postfix(&mut self) {
            let cp = self.checkpoint();
            if !self.primary() {
                return;
            }
            loop {
                match self.current() {
                    DOT => {
                        self.start_at(cp, MEMBER_ACCESS_EXPR);
                        self.bump();
                        if self.expect(IDENT) && self.at_type_args() {
                            self.type_arg_list();
                        }
                        self.finish_node();
                    }
                    L_PAREN => {
                        self.start_at(cp, INVOCATION_EXPR);
                        self.arg_list();
                        self.finish_node();
                    }
                    L_BRACK => {
                        self.start_at(cp, ELEMENT_ACCESS_EXPR);
                        self.bracketed_arg_list();
                        self.finish_node();
                    }
                    PLUS2 | MINUS2 => {
                        self.start_at(cp, POSTFIX_EXPR);
                        self.bump();
                        self.finish_node();
                    }
                    _ => break,
                }
            }
        }

        /// Returns false when no expression could be started.
        fn primary(&mut self) -> bool {
            let kind = self.current();
            match kind {
                _ if kind.is_literal() => {
                    self.start(LITERAL_EXPR);
                    self.bump();
                    self.finish_node();
                }
                IDENT => {
                    self.start(NAME_EXPR);
                    self.bump();
                    if self.at_type_args() {
                        self.type_arg_list();
                    }
                    self.finish_node();
                }
                INTERPOLATED_START => self.interpolated_string(),
                THIS_KW => {
                    self.start(THIS_EXPR);
                    self.bump();
                    self.finish_node();
                }
                L_PAREN => {
                    self.start(PAREN_EXPR);
                    self.bump();
                    self.expr();
                    self.expect(R_PAREN);
                    self.finish_node();
                }
                NEW_KW => self.object_creation(),
                L_BRACE => self.array_initializer(),
                SEMICOLON | R_PAREN | R_BRACE | R_BRACK | COMMA | EOF => {
                    self.error(format!("expected expression, found {kind:?}"));
                    return false;
                }
                _ => {
                    self.error_and_bump("expected expression");
                    return false;
                }
            }
            true
        }

        /// `$"text{expr,align:format}text"`: each hole is an `INTERPOLATION`.
        fn interpolated_string(&mut self) {
            self.start(INTERPOLATED_STRING_EXPR);
            self.bump();
            loop {
                self.start(INTERPOLATION);
                self.expr();
                if self.eat(COMMA) {
                    self.expr();
                }
                while !matches!(self.current(), INTERPOLATED_MID | INTERPOLATED_END | EOF) {
                    self.error_and_bump("unexpected token in interpolation");
                }
                self.finish_node();
                match self.current() {
                    INTERPOLATED_MID => self.bump(),
                    INTERPOLATED_END => {
                        self.bump();
                        break;
                    }
                    _ => {
                        self.error("unterminated interpolated string".to_string());
                        break;
                    }
                }
            }
            self.finish_node();
        }

        fn object_creation(&mut self) {
            self.start(OBJECT_CREATION_EXPR);
            self.bump();
            if self.at(L_BRACK) {
                self.bump();
                self.expect(R_BRACK);
            } else {
                self.type_ref();
                if self.at(L_BRACK) {
                    self.bracketed_arg_list();
                }
                if self.at(L_PAREN) {
                    self.arg_list();
                }
            }
            if self.at(L_BRACE) {
                self.array_initializer();
            }
            self.finish_node();
        }

        fn array_initializer(&mut self) {
            self.start(ARRAY_INITIALIZER);
            self.expect(L_BRACE);
            while !matches!(self.current(), R_BRACE | EOF) {
                if self.at(L_BRACE) {
                    self.nested(Self::array_initializer);
                } else {
                    self.expr();
                }
                if !self.eat(COMMA) {
                    break;
                }
            }
            self.expect(R_BRACE);
            self.finish_node();
        }

        fn arg_list(&mut self) {
            self.start(ARG_LIST);
            self.expect(L_PAREN);
            self.args(R_PAREN);
            self.expect(R_PAREN);
            self.finish_node();
        }

        fn bracketed_arg_list(&mut self) {
            self.start(BRACKETED_ARG_LIST);
            self.expect(L_BRACK);
            self.args(R_BRACK);
            self.expect(R_BRACK);
            self.finish_node();
        }

        fn args(&mut self, close: SyntaxKind) {
            while !self.at(close) && !self.at(EOF) {
                self.start(ARG);
                if self.at(IDENT) && self.nth(1) == COLON {
                    self.bump();
                    self.bump();
                }
                if (self.at_contextual("ref") || self.at_contextual("out")) && self.nth(1) == IDENT {
                    self.bump();
                }
                self.expr();
                self.finish_node();
                if !self.eat(COMMA) {
                    break;
                }
            }
        }
    }

}
