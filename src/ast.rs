// Copyright (C) Brian G. Milnes 2025

//! Typed views over the untyped rowan tree
//!
//! Every wrapper is a zero-cost newtype around a `SyntaxNode` of one kind.
//! `Expr` is the sum of all expression wrappers, so callers decide what an
//! expression is with an exhaustive `match` rather than kind comparisons.

pub mod ast {
    use crate::syntax::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
    use SyntaxKind::*;

    pub trait AstNode: Sized {
        fn can_cast(kind: SyntaxKind) -> bool;
        fn cast(node: SyntaxNode) -> Option<Self>;
        fn syntax(&self) -> &SyntaxNode;
    }

    macro_rules! ast_node {
        ($(#[$meta:meta])* $name:ident, $kind:ident) => {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash)]
            pub struct $name(SyntaxNode);

            impl AstNode for $name {
                fn can_cast(kind: SyntaxKind) -> bool {
                    kind == $kind
                }

                fn cast(node: SyntaxNode) -> Option<Self> {
                    if Self::can_cast(node.kind()) {
                        Some($name(node))
                    } else {
                        None
                    }
                }

                fn syntax(&self) -> &SyntaxNode {
                    &self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    std::fmt::Display::fmt(&self.0, f)
                }
            }
        };
    }

    fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
        parent.children().find_map(N::cast)
    }

    fn children<N: AstNode>(parent: &SyntaxNode) -> impl Iterator<Item = N> {
        parent.children().filter_map(N::cast)
    }

    fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        parent
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|t| t.kind() == kind)
    }

    /// First significant token directly under `parent`.
    fn first_significant_token(parent: &SyntaxNode) -> Option<SyntaxToken> {
        parent
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    // ---- declarations ----

    ast_node!(SourceFile, SOURCE_FILE);
    ast_node!(NamespaceDecl, NAMESPACE_DECL);
    ast_node!(ClassDecl, CLASS_DECL);
    ast_node!(FieldDecl, FIELD_DECL);
    ast_node!(PropertyDecl, PROPERTY_DECL);
    ast_node!(MethodDecl, METHOD_DECL);
    ast_node!(ConstructorDecl, CONSTRUCTOR_DECL);
    ast_node!(ParamList, PARAM_LIST);
    ast_node!(Param, PARAM);
    ast_node!(TypeRef, TYPE_REF);
    ast_node!(VarDeclarator, VAR_DECLARATOR);
    ast_node!(Name, NAME);

    impl SourceFile {
        pub fn classes(&self) -> impl Iterator<Item = ClassDecl> {
            self.0.descendants().filter_map(ClassDecl::cast)
        }
    }

    impl Name {
        pub fn text(&self) -> String {
            first_significant_token(&self.0)
                .map(|t| t.text().to_string())
                .unwrap_or_default()
        }
    }

    impl TypeRef {
        /// The type as written, trivia removed (`System.String`, `string[]`).
        pub fn text(&self) -> String {
            self.0
                .descendants_with_tokens()
                .filter_map(|element| element.into_token())
                .filter(|t| !t.kind().is_trivia())
                .map(|t| t.text().to_string())
                .collect()
        }

        pub fn is_var(&self) -> bool {
            self.text() == "var"
        }
    }

    impl ClassDecl {
        pub fn name(&self) -> Option<Name> {
            child(&self.0)
        }

        pub fn fields(&self) -> impl Iterator<Item = FieldDecl> {
            children(&self.0)
        }

        pub fn properties(&self) -> impl Iterator<Item = PropertyDecl> {
            children(&self.0)
        }

        pub fn methods(&self) -> impl Iterator<Item = MethodDecl> {
            children(&self.0)
        }
    }

    impl FieldDecl {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> {
            children(&self.0)
        }

        pub fn is_const(&self) -> bool {
            token(&self.0, CONST_KW).is_some()
        }
    }

    impl PropertyDecl {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn name(&self) -> Option<Name> {
            child(&self.0)
        }
    }

    impl MethodDecl {
        pub fn return_type(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn name(&self) -> Option<Name> {
            child(&self.0)
        }

        pub fn param_list(&self) -> Option<ParamList> {
            child(&self.0)
        }
    }

    impl ConstructorDecl {
        pub fn param_list(&self) -> Option<ParamList> {
            child(&self.0)
        }
    }

    impl ParamList {
        pub fn params(&self) -> impl Iterator<Item = Param> {
            children(&self.0)
        }
    }

    impl Param {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn name(&self) -> Option<Name> {
            child(&self.0)
        }
    }

    impl VarDeclarator {
        pub fn name(&self) -> Option<Name> {
            child(&self.0)
        }

        /// Initializer expression; a bare `{ ... }` initializer is an
        /// `Expr::ArrayInitializer`.
        pub fn initializer(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    // ---- statements ----

    ast_node!(Block, BLOCK);
    ast_node!(LocalDeclStmt, LOCAL_DECL_STMT);
    ast_node!(ForeachStmt, FOREACH_STMT);

    impl LocalDeclStmt {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> {
            children(&self.0)
        }
    }

    impl ForeachStmt {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn name(&self) -> Option<Name> {
            child(&self.0)
        }

        pub fn collection(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    // ---- expressions ----

    ast_node!(LiteralExpr, LITERAL_EXPR);
    ast_node!(NameExpr, NAME_EXPR);
    ast_node!(ThisExpr, THIS_EXPR);
    ast_node!(ParenExpr, PAREN_EXPR);
    ast_node!(
        /// `receiver.Name`
        MemberAccessExpr,
        MEMBER_ACCESS_EXPR
    );
    ast_node!(
        /// `callee(args)`
        InvocationExpr,
        INVOCATION_EXPR
    );
    ast_node!(ElementAccessExpr, ELEMENT_ACCESS_EXPR);
    ast_node!(ObjectCreationExpr, OBJECT_CREATION_EXPR);
    ast_node!(ArrayInitializer, ARRAY_INITIALIZER);
    ast_node!(PrefixExpr, PREFIX_EXPR);
    ast_node!(PostfixExpr, POSTFIX_EXPR);
    ast_node!(BinaryExpr, BINARY_EXPR);
    ast_node!(AssignmentExpr, ASSIGNMENT_EXPR);
    ast_node!(ConditionalExpr, CONDITIONAL_EXPR);
    ast_node!(AsExpr, AS_EXPR);
    ast_node!(IsExpr, IS_EXPR);
    ast_node!(CastExpr, CAST_EXPR);
    ast_node!(
        /// `$"text{hole}text"`
        InterpolatedStringExpr,
        INTERPOLATED_STRING_EXPR
    );
    ast_node!(Interpolation, INTERPOLATION);
    ast_node!(ArgList, ARG_LIST);
    ast_node!(BracketedArgList, BRACKETED_ARG_LIST);
    ast_node!(Arg, ARG);

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum Expr {
        Literal(LiteralExpr),
        Name(NameExpr),
        This(ThisExpr),
        Paren(ParenExpr),
        MemberAccess(MemberAccessExpr),
        Invocation(InvocationExpr),
        ElementAccess(ElementAccessExpr),
        ObjectCreation(ObjectCreationExpr),
        ArrayInitializer(ArrayInitializer),
        Prefix(PrefixExpr),
        Postfix(PostfixExpr),
        Binary(BinaryExpr),
        Assignment(AssignmentExpr),
        Conditional(ConditionalExpr),
        As(AsExpr),
        Is(IsExpr),
        Cast(CastExpr),
        InterpolatedString(InterpolatedStringExpr),
    }

    impl AstNode for Expr {
        fn can_cast(kind: SyntaxKind) -> bool {
            matches!(
                kind,
                LITERAL_EXPR
                    | NAME_EXPR
                    | THIS_EXPR
                    | PAREN_EXPR
                    | MEMBER_ACCESS_EXPR
                    | INVOCATION_EXPR
                    | ELEMENT_ACCESS_EXPR
                    | OBJECT_CREATION_EXPR
                    | ARRAY_INITIALIZER
                    | PREFIX_EXPR
                    | POSTFIX_EXPR
                    | BINARY_EXPR
                    | ASSIGNMENT_EXPR
                    | CONDITIONAL_EXPR
                    | AS_EXPR
                    | IS_EXPR
                    | CAST_EXPR
                    | INTERPOLATED_STRING_EXPR
            )
        }

        fn cast(node: SyntaxNode) -> Option<Self> {
            let expr = match node.kind() {
                LITERAL_EXPR => Expr::Literal(LiteralExpr(node)),
                NAME_EXPR => Expr::Name(NameExpr(node)),
                THIS_EXPR => Expr::This(ThisExpr(node)),
                PAREN_EXPR => Expr::Paren(ParenExpr(node)),
                MEMBER_ACCESS_EXPR => Expr::MemberAccess(MemberAccessExpr(node)),
                INVOCATION_EXPR => Expr::Invocation(InvocationExpr(node)),
                ELEMENT_ACCESS_EXPR => Expr::ElementAccess(ElementAccessExpr(node)),
                OBJECT_CREATION_EXPR => Expr::ObjectCreation(ObjectCreationExpr(node)),
                ARRAY_INITIALIZER => Expr::ArrayInitializer(ArrayInitializer(node)),
                PREFIX_EXPR => Expr::Prefix(PrefixExpr(node)),
                POSTFIX_EXPR => Expr::Postfix(PostfixExpr(node)),
                BINARY_EXPR => Expr::Binary(BinaryExpr(node)),
                ASSIGNMENT_EXPR => Expr::Assignment(AssignmentExpr(node)),
                CONDITIONAL_EXPR => Expr::Conditional(ConditionalExpr(node)),
                AS_EXPR => Expr::As(AsExpr(node)),
                IS_EXPR => Expr::Is(IsExpr(node)),
                CAST_EXPR => Expr::Cast(CastExpr(node)),
                INTERPOLATED_STRING_EXPR => Expr::InterpolatedString(InterpolatedStringExpr(node)),
                _ => return None,
            };
            Some(expr)
        }

        fn syntax(&self) -> &SyntaxNode {
            match self {
                Expr::Literal(it) => it.syntax(),
                Expr::Name(it) => it.syntax(),
                Expr::This(it) => it.syntax(),
                Expr::Paren(it) => it.syntax(),
                Expr::MemberAccess(it) => it.syntax(),
                Expr::Invocation(it) => it.syntax(),
                Expr::ElementAccess(it) => it.syntax(),
                Expr::ObjectCreation(it) => it.syntax(),
                Expr::ArrayInitializer(it) => it.syntax(),
                Expr::Prefix(it) => it.syntax(),
                Expr::Postfix(it) => it.syntax(),
                Expr::Binary(it) => it.syntax(),
                Expr::Assignment(it) => it.syntax(),
                Expr::Conditional(it) => it.syntax(),
                Expr::As(it) => it.syntax(),
                Expr::Is(it) => it.syntax(),
                Expr::Cast(it) => it.syntax(),
                Expr::InterpolatedString(it) => it.syntax(),
            }
        }
    }

    impl std::fmt::Display for Expr {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            std::fmt::Display::fmt(self.syntax(), f)
        }
    }

    impl LiteralExpr {
        pub fn token(&self) -> Option<SyntaxToken> {
            first_significant_token(&self.0)
        }
    }

    impl NameExpr {
        pub fn ident(&self) -> Option<SyntaxToken> {
            token(&self.0, IDENT)
        }

        pub fn text(&self) -> String {
            self.ident().map(|t| t.text().to_string()).unwrap_or_default()
        }
    }

    impl ParenExpr {
        pub fn expr(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    impl MemberAccessExpr {
        /// The expression left of the dot: the first child expression.
        pub fn receiver(&self) -> Option<Expr> {
            child(&self.0)
        }

        pub fn name_token(&self) -> Option<SyntaxToken> {
            token(&self.0, IDENT)
        }

        pub fn name_text(&self) -> Option<String> {
            self.name_token().map(|t| t.text().to_string())
        }
    }

    impl InvocationExpr {
        pub fn callee(&self) -> Option<Expr> {
            child(&self.0)
        }

        pub fn arg_list(&self) -> Option<ArgList> {
            child(&self.0)
        }
    }

    impl ElementAccessExpr {
        pub fn receiver(&self) -> Option<Expr> {
            child(&self.0)
        }

        pub fn arg_list(&self) -> Option<BracketedArgList> {
            child(&self.0)
        }
    }

    impl ObjectCreationExpr {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        /// `new[] { ... }` has no type and is typed by its elements.
        pub fn initializer(&self) -> Option<ArrayInitializer> {
            child(&self.0)
        }

        pub fn has_rank_specifier(&self) -> bool {
            child::<BracketedArgList>(&self.0).is_some() || token(&self.0, L_BRACK).is_some()
        }
    }

    impl ArrayInitializer {
        pub fn elements(&self) -> impl Iterator<Item = Expr> {
            children(&self.0)
        }
    }

    impl PrefixExpr {
        pub fn op_kind(&self) -> Option<SyntaxKind> {
            first_significant_token(&self.0).map(|t| t.kind())
        }

        pub fn operand(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    impl PostfixExpr {
        pub fn operand(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    impl BinaryExpr {
        pub fn op_kind(&self) -> Option<SyntaxKind> {
            first_significant_token(&self.0).map(|t| t.kind())
        }

        pub fn lhs(&self) -> Option<Expr> {
            children(&self.0).next()
        }

        pub fn rhs(&self) -> Option<Expr> {
            children(&self.0).nth(1)
        }
    }

    impl AssignmentExpr {
        pub fn lhs(&self) -> Option<Expr> {
            children(&self.0).next()
        }

        pub fn rhs(&self) -> Option<Expr> {
            children(&self.0).nth(1)
        }
    }

    impl ConditionalExpr {
        pub fn condition(&self) -> Option<Expr> {
            children(&self.0).next()
        }

        pub fn then_branch(&self) -> Option<Expr> {
            children(&self.0).nth(1)
        }

        pub fn else_branch(&self) -> Option<Expr> {
            children(&self.0).nth(2)
        }
    }

    impl AsExpr {
        pub fn expr(&self) -> Option<Expr> {
            child(&self.0)
        }

        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }
    }

    impl IsExpr {
        pub fn expr(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    impl CastExpr {
        pub fn type_ref(&self) -> Option<TypeRef> {
            child(&self.0)
        }

        pub fn expr(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    impl InterpolatedStringExpr {
        pub fn interpolations(&self) -> impl Iterator<Item = Interpolation> {
            children(&self.0)
        }
    }

    impl Interpolation {
        /// The hole's value; an alignment after `,` is a second expression.
        pub fn expr(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    impl ArgList {
        pub fn args(&self) -> impl Iterator<Item = Arg> {
            children(&self.0)
        }
    }

    impl BracketedArgList {
        pub fn args(&self) -> impl Iterator<Item = Arg> {
            children(&self.0)
        }
    }

    impl Arg {
        pub fn expr(&self) -> Option<Expr> {
            child(&self.0)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::parser::parser::parse;

        fn first<N: AstNode>(src: &str) -> N {
            parse(src)
                .syntax_node()
                .descendants()
                .find_map(N::cast)
                .unwrap()
        }

        #[test]
        fn test_receiver_is_whole_chained_call() {
            let invocation: InvocationExpr = first("sample.Trim().ToString();");
            let Some(Expr::MemberAccess(access)) = invocation.callee() else {
                panic!("callee should be a member access");
            };
            assert_eq!(access.name_text().as_deref(), Some("ToString"));
            let receiver = access.receiver().unwrap();
            assert!(matches!(receiver, Expr::Invocation(_)));
            assert_eq!(receiver.to_string(), "sample.Trim()");
        }

        #[test]
        fn test_binary_operands() {
            let binary: BinaryExpr = first("\"a\" + b;");
            assert_eq!(binary.op_kind(), Some(PLUS));
            assert!(matches!(binary.lhs(), Some(Expr::Literal(_))));
            assert!(matches!(binary.rhs(), Some(Expr::Name(_))));
        }

        #[test]
        fn test_interpolation_holes() {
            let string: InterpolatedStringExpr = first("var t = $\"{a}-{b.Trim(),4}\";");
            let holes: Vec<String> = string
                .interpolations()
                .filter_map(|hole| hole.expr())
                .map(|expr| expr.to_string())
                .collect();
            assert_eq!(holes, vec!["a", "b.Trim()"]);
        }

        #[test]
        fn test_generic_type_ref_text() {
            let decl: LocalDeclStmt = first("List< string > s = null;");
            assert_eq!(decl.type_ref().unwrap().text(), "List<string>");
        }

        #[test]
        fn test_type_ref_text_drops_trivia() {
            let decl: LocalDeclStmt = first("System . String [] s = null;");
            assert_eq!(decl.type_ref().unwrap().text(), "System.String[]");
        }
    }
}
