// Copyright (C) Brian G. Milnes 2025

//! Syntax kinds and the rowan language binding for the C# subset
//!
//! The tree is lossless: every byte of the source, trivia included, lives in
//! a token somewhere under the root.

pub mod syntax {

    #[allow(non_camel_case_types)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[repr(u16)]
    pub enum SyntaxKind {
        // Trivia
        WHITESPACE = 0,
        LINE_COMMENT,
        BLOCK_COMMENT,
        PREPROCESSOR,

        // Literals and names
        IDENT,
        INT_NUMBER,
        REAL_NUMBER,
        STRING,
        VERBATIM_STRING,
        INTERPOLATED_STRING,
        /// `$"text{` opening a string with holes
        INTERPOLATED_START,
        /// `}text{` or `:format}text{` between two holes
        INTERPOLATED_MID,
        /// `}text"` or `:format}text"` closing the string
        INTERPOLATED_END,
        CHAR,

        // Keywords
        USING_KW,
        NAMESPACE_KW,
        CLASS_KW,
        STRUCT_KW,
        PUBLIC_KW,
        PRIVATE_KW,
        PROTECTED_KW,
        INTERNAL_KW,
        STATIC_KW,
        CONST_KW,
        READONLY_KW,
        SEALED_KW,
        ABSTRACT_KW,
        OVERRIDE_KW,
        VIRTUAL_KW,
        PARTIAL_KW,
        RETURN_KW,
        IF_KW,
        ELSE_KW,
        WHILE_KW,
        FOR_KW,
        FOREACH_KW,
        IN_KW,
        NEW_KW,
        TRUE_KW,
        FALSE_KW,
        NULL_KW,
        THIS_KW,
        AS_KW,
        IS_KW,
        BREAK_KW,
        CONTINUE_KW,
        THROW_KW,

        // Punctuation
        L_BRACE,
        R_BRACE,
        L_PAREN,
        R_PAREN,
        L_BRACK,
        R_BRACK,
        SEMICOLON,
        COMMA,
        DOT,
        COLON,
        QUESTION,
        QUESTION2,
        EQ,
        EQ2,
        NEQ,
        LT,
        GT,
        LTEQ,
        GTEQ,
        PLUS,
        MINUS,
        STAR,
        SLASH,
        PERCENT,
        BANG,
        AMP2,
        PIPE2,
        PLUS_EQ,
        MINUS_EQ,
        PLUS2,
        MINUS2,
        FAT_ARROW,
        ERROR_TOKEN,
        EOF,

        // Declarations
        SOURCE_FILE,
        USING_DIRECTIVE,
        NAMESPACE_DECL,
        CLASS_DECL,
        FIELD_DECL,
        PROPERTY_DECL,
        ACCESSOR_LIST,
        ACCESSOR,
        METHOD_DECL,
        CONSTRUCTOR_DECL,
        PARAM_LIST,
        PARAM,
        TYPE_REF,
        TYPE_ARG_LIST,
        VAR_DECLARATOR,
        NAME,

        // Statements
        BLOCK,
        LOCAL_DECL_STMT,
        EXPR_STMT,
        RETURN_STMT,
        IF_STMT,
        ELSE_CLAUSE,
        WHILE_STMT,
        FOR_STMT,
        FOREACH_STMT,
        JUMP_STMT,
        EMPTY_STMT,

        // Expressions
        LITERAL_EXPR,
        NAME_EXPR,
        THIS_EXPR,
        PAREN_EXPR,
        MEMBER_ACCESS_EXPR,
        INVOCATION_EXPR,
        ELEMENT_ACCESS_EXPR,
        ARG_LIST,
        BRACKETED_ARG_LIST,
        ARG,
        OBJECT_CREATION_EXPR,
        ARRAY_INITIALIZER,
        PREFIX_EXPR,
        POSTFIX_EXPR,
        BINARY_EXPR,
        ASSIGNMENT_EXPR,
        CONDITIONAL_EXPR,
        AS_EXPR,
        IS_EXPR,
        CAST_EXPR,
        INTERPOLATED_STRING_EXPR,
        INTERPOLATION,

        ERROR,

        #[doc(hidden)]
        __LAST,
    }

    use SyntaxKind::*;

    impl SyntaxKind {
        pub fn is_trivia(self) -> bool {
            matches!(self, WHITESPACE | LINE_COMMENT | BLOCK_COMMENT | PREPROCESSOR)
        }

        pub fn is_comment(self) -> bool {
            matches!(self, LINE_COMMENT | BLOCK_COMMENT)
        }

        /// Keyword for an identifier-shaped word, if it is one.
        ///
        /// Predefined type names (`string`, `int`, `var`, ...) stay identifiers.
        pub fn from_keyword(word: &str) -> Option<SyntaxKind> {
            let kind = match word {
                "using" => USING_KW,
                "namespace" => NAMESPACE_KW,
                "class" => CLASS_KW,
                "struct" => STRUCT_KW,
                "public" => PUBLIC_KW,
                "private" => PRIVATE_KW,
                "protected" => PROTECTED_KW,
                "internal" => INTERNAL_KW,
                "static" => STATIC_KW,
                "const" => CONST_KW,
                "readonly" => READONLY_KW,
                "sealed" => SEALED_KW,
                "abstract" => ABSTRACT_KW,
                "override" => OVERRIDE_KW,
                "virtual" => VIRTUAL_KW,
                "partial" => PARTIAL_KW,
                "return" => RETURN_KW,
                "if" => IF_KW,
                "else" => ELSE_KW,
                "while" => WHILE_KW,
                "for" => FOR_KW,
                "foreach" => FOREACH_KW,
                "in" => IN_KW,
                "new" => NEW_KW,
                "true" => TRUE_KW,
                "false" => FALSE_KW,
                "null" => NULL_KW,
                "this" => THIS_KW,
                "as" => AS_KW,
                "is" => IS_KW,
                "break" => BREAK_KW,
                "continue" => CONTINUE_KW,
                "throw" => THROW_KW,
                _ => return None,
            };
            Some(kind)
        }

        pub fn is_modifier(self) -> bool {
            matches!(
                self,
                PUBLIC_KW
                    | PRIVATE_KW
                    | PROTECTED_KW
                    | INTERNAL_KW
                    | STATIC_KW
                    | CONST_KW
                    | READONLY_KW
                    | SEALED_KW
                    | ABSTRACT_KW
                    | OVERRIDE_KW
                    | VIRTUAL_KW
                    | PARTIAL_KW
            )
        }

        pub fn is_literal(self) -> bool {
            matches!(
                self,
                INT_NUMBER
                    | REAL_NUMBER
                    | STRING
                    | VERBATIM_STRING
                    | INTERPOLATED_STRING
                    | CHAR
                    | TRUE_KW
                    | FALSE_KW
                    | NULL_KW
            )
        }
    }

    impl From<SyntaxKind> for rowan::SyntaxKind {
        fn from(kind: SyntaxKind) -> Self {
            rowan::SyntaxKind(kind as u16)
        }
    }

    /// Rowan language tag for C# subset trees.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum CSharp {}

    impl rowan::Language for CSharp {
        type Kind = SyntaxKind;

        fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
            assert!(raw.0 < __LAST as u16);
            ALL_KINDS[raw.0 as usize]
        }

        fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
            kind.into()
        }
    }

    /// Every kind in declaration order, indexed by its raw value.
    const ALL_KINDS: &[SyntaxKind] = &[
        WHITESPACE, LINE_COMMENT, BLOCK_COMMENT, PREPROCESSOR,
        IDENT, INT_NUMBER, REAL_NUMBER, STRING, VERBATIM_STRING, INTERPOLATED_STRING,
        INTERPOLATED_START, INTERPOLATED_MID, INTERPOLATED_END, CHAR,
        USING_KW, NAMESPACE_KW, CLASS_KW, STRUCT_KW, PUBLIC_KW, PRIVATE_KW, PROTECTED_KW,
        INTERNAL_KW, STATIC_KW, CONST_KW, READONLY_KW, SEALED_KW, ABSTRACT_KW, OVERRIDE_KW,
        VIRTUAL_KW, PARTIAL_KW, RETURN_KW, IF_KW, ELSE_KW, WHILE_KW, FOR_KW, FOREACH_KW,
        IN_KW, NEW_KW, TRUE_KW, FALSE_KW, NULL_KW, THIS_KW, AS_KW, IS_KW, BREAK_KW,
        CONTINUE_KW, THROW_KW,
        L_BRACE, R_BRACE, L_PAREN, R_PAREN, L_BRACK, R_BRACK, SEMICOLON, COMMA, DOT, COLON,
        QUESTION, QUESTION2, EQ, EQ2, NEQ, LT, GT, LTEQ, GTEQ, PLUS, MINUS, STAR, SLASH,
        PERCENT, BANG, AMP2, PIPE2, PLUS_EQ, MINUS_EQ, PLUS2, MINUS2, FAT_ARROW, ERROR_TOKEN, EOF,
        SOURCE_FILE, USING_DIRECTIVE, NAMESPACE_DECL, CLASS_DECL, FIELD_DECL, PROPERTY_DECL,
        ACCESSOR_LIST, ACCESSOR, METHOD_DECL, CONSTRUCTOR_DECL, PARAM_LIST, PARAM, TYPE_REF,
        TYPE_ARG_LIST, VAR_DECLARATOR, NAME,
        BLOCK, LOCAL_DECL_STMT, EXPR_STMT, RETURN_STMT, IF_STMT, ELSE_CLAUSE, WHILE_STMT,
        FOR_STMT, FOREACH_STMT, JUMP_STMT, EMPTY_STMT,
        LITERAL_EXPR, NAME_EXPR, THIS_EXPR, PAREN_EXPR, MEMBER_ACCESS_EXPR, INVOCATION_EXPR,
        ELEMENT_ACCESS_EXPR, ARG_LIST, BRACKETED_ARG_LIST, ARG, OBJECT_CREATION_EXPR,
        ARRAY_INITIALIZER, PREFIX_EXPR, POSTFIX_EXPR, BINARY_EXPR, ASSIGNMENT_EXPR,
        CONDITIONAL_EXPR, AS_EXPR, IS_EXPR, CAST_EXPR, INTERPOLATED_STRING_EXPR, INTERPOLATION,
        ERROR,
    ];

    pub type SyntaxNode = rowan::SyntaxNode<CSharp>;
    pub type SyntaxToken = rowan::SyntaxToken<CSharp>;
    pub type SyntaxElement = rowan::SyntaxElement<CSharp>;
    pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<CSharp>;

    pub use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize, WalkEvent};

    #[cfg(test)]
    mod tests {
        use super::*;
        use rowan::Language;

        #[test]
        fn test_kind_table_is_dense() {
            assert_eq!(ALL_KINDS.len(), __LAST as usize);
            for (index, kind) in ALL_KINDS.iter().enumerate() {
                assert_eq!(*kind as usize, index, "{kind:?} out of order");
            }
        }

        #[test]
        fn test_raw_round_trip() {
            let raw = CSharp::kind_to_raw(INVOCATION_EXPR);
            assert_eq!(CSharp::kind_from_raw(raw), INVOCATION_EXPR);
        }

        #[test]
        fn test_predefined_types_are_not_keywords() {
            assert_eq!(SyntaxKind::from_keyword("string"), None);
            assert_eq!(SyntaxKind::from_keyword("var"), None);
            assert_eq!(SyntaxKind::from_keyword("new"), Some(NEW_KW));
        }
    }
}
