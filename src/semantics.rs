// Copyright (C) Brian G. Milnes 2025

//! Static type resolution for expressions
//!
//! `TypeResolver` is the seam the analyzer and fixer query. `SemanticModel`
//! answers from the tree alone: literals, declarations in scope, members of
//! the enclosing class and a table of well-known framework members. Anything
//! it cannot classify resolves to `None`.

pub mod semantics {
    use crate::ast::ast::{
        AstNode, BinaryExpr, ClassDecl, Expr, ForeachStmt, InvocationExpr, LiteralExpr,
        LocalDeclStmt, MemberAccessExpr, MethodDecl, NameExpr, ParamList, TypeRef,
    };
    use crate::syntax::syntax::{SyntaxKind, SyntaxNode};
    use SyntaxKind::*;

    /// Static type classification of an expression.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum Ty {
        String,
        Char,
        Bool,
        Int,
        Long,
        Float,
        Double,
        Decimal,
        Object,
        Void,
        Array(Box<Ty>),
        Named(String),
    }

    impl Ty {
        pub fn is_string(&self) -> bool {
            matches!(self, Ty::String)
        }

        /// Classify a type as written in source.
        pub fn from_type_name(text: &str) -> Ty {
            let text = text.trim();
            if let Some(element) = text.strip_suffix(']') {
                if let Some(open) = element.rfind('[') {
                    let rank = &element[open + 1..];
                    if rank.chars().all(|c| c == ',') {
                        return Ty::Array(Box::new(Ty::from_type_name(&element[..open])));
                    }
                }
            }
            let text = text.strip_suffix('?').unwrap_or(text);
            match text {
                "string" | "String" | "System.String" => Ty::String,
                "char" | "Char" | "System.Char" => Ty::Char,
                "bool" | "Boolean" | "System.Boolean" => Ty::Bool,
                "int" | "Int32" | "System.Int32" | "short" | "byte" | "sbyte" | "ushort" => Ty::Int,
                "long" | "Int64" | "System.Int64" | "uint" | "ulong" => Ty::Long,
                "float" | "Single" | "System.Single" => Ty::Float,
                "double" | "Double" | "System.Double" => Ty::Double,
                "decimal" | "Decimal" | "System.Decimal" => Ty::Decimal,
                "object" | "Object" | "System.Object" => Ty::Object,
                "void" => Ty::Void,
                other => Ty::Named(other.to_string()),
            }
        }

        fn numeric_rank(&self) -> Option<u8> {
            match self {
                Ty::Char | Ty::Int => Some(0),
                Ty::Long => Some(1),
                Ty::Float => Some(2),
                Ty::Double => Some(3),
                Ty::Decimal => Some(4),
                _ => None,
            }
        }

        fn promote(lhs: Ty, rhs: Ty) -> Option<Ty> {
            let (l, r) = (lhs.numeric_rank()?, rhs.numeric_rank()?);
            let wider = if l >= r { lhs } else { rhs };
            Some(if wider == Ty::Char { Ty::Int } else { wider })
        }
    }

    impl std::fmt::Display for Ty {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Ty::String => write!(f, "string"),
                Ty::Char => write!(f, "char"),
                Ty::Bool => write!(f, "bool"),
                Ty::Int => write!(f, "int"),
                Ty::Long => write!(f, "long"),
                Ty::Float => write!(f, "float"),
                Ty::Double => write!(f, "double"),
                Ty::Decimal => write!(f, "decimal"),
                Ty::Object => write!(f, "object"),
                Ty::Void => write!(f, "void"),
                Ty::Array(element) => write!(f, "{element}[]"),
                Ty::Named(name) => write!(f, "{name}"),
            }
        }
    }

    /// Per-expression static type queries.
    pub trait TypeResolver {
        fn type_of(&self, expr: &Expr) -> Option<Ty>;

        /// True only when the type is known and is exactly `string`.
        fn is_string(&self, expr: &Expr) -> bool {
            self.type_of(expr).is_some_and(|ty| ty.is_string())
        }
    }

    /// Resolver answering from the syntax tree the expression belongs to.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SemanticModel;

    const MAX_DEPTH: usize = 64;

    impl TypeResolver for SemanticModel {
        fn type_of(&self, expr: &Expr) -> Option<Ty> {
            self.infer(expr, 0)
        }
    }

    impl SemanticModel {
        pub fn new() -> Self {
            SemanticModel
        }

        fn infer(&self, expr: &Expr, depth: usize) -> Option<Ty> {
            if depth > MAX_DEPTH {
                return None;
            }
            let depth = depth + 1;
            match expr {
                Expr::Literal(literal) => literal_type(literal),
                Expr::Name(name) => self.resolve_name(name, depth),
                Expr::This(this) => enclosing_class(this.syntax())
                    .and_then(|class| class.name())
                    .map(|name| Ty::Named(name.text())),
                Expr::Paren(paren) => self.infer(&paren.expr()?, depth),
                Expr::MemberAccess(access) => self.member_type(access, depth),
                Expr::Invocation(invocation) => self.invocation_type(invocation, depth),
                Expr::ElementAccess(access) => match self.infer(&access.receiver()?, depth)? {
                    Ty::Array(element) => Some(*element),
                    Ty::String => Some(Ty::Char),
                    _ => None,
                },
                Expr::ObjectCreation(creation) => match creation.type_ref() {
                    Some(type_ref) => {
                        let ty = Ty::from_type_name(&type_ref.text());
                        if creation.has_rank_specifier() {
                            Some(Ty::Array(Box::new(ty)))
                        } else {
                            Some(ty)
                        }
                    }
                    None => {
                        let first = creation.initializer()?.elements().next()?;
                        let element = self.infer(&first, depth)?;
                        Some(Ty::Array(Box::new(element)))
                    }
                },
                Expr::ArrayInitializer(_) => None,
                Expr::Prefix(prefix) => match prefix.op_kind()? {
                    BANG => Some(Ty::Bool),
                    _ => self.infer(&prefix.operand()?, depth),
                },
                Expr::Postfix(postfix) => self.infer(&postfix.operand()?, depth),
                Expr::Binary(binary) => self.binary_type(binary, depth),
                Expr::Assignment(assignment) => self.infer(&assignment.lhs()?, depth),
                Expr::Conditional(conditional) => {
                    let then_ty = self.infer(&conditional.then_branch()?, depth);
                    let else_ty = self.infer(&conditional.else_branch()?, depth);
                    match (then_ty, else_ty) {
                        (Some(a), Some(b)) if a == b => Some(a),
                        (Some(a), None) if is_null(&conditional.else_branch()) => Some(a),
                        (None, Some(b)) if is_null(&conditional.then_branch()) => Some(b),
                        _ => None,
                    }
                }
                Expr::As(as_expr) => Some(Ty::from_type_name(&as_expr.type_ref()?.text())),
                Expr::Is(_) => Some(Ty::Bool),
                Expr::Cast(cast) => Some(Ty::from_type_name(&cast.type_ref()?.text())),
                Expr::InterpolatedString(_) => Some(Ty::String),
            }
        }

        fn declared_type(&self, type_ref: Option<TypeRef>, initializer: Option<Expr>, depth: usize) -> Option<Ty> {
            let type_ref = type_ref?;
            if type_ref.is_var() {
                return self.infer(&initializer?, depth);
            }
            Some(Ty::from_type_name(&type_ref.text()))
        }

        /// Walk outward from the use site through every enclosing scope.
        ///
        /// Names inside a member that failed to parse stay unresolved: the
        /// damaged part may declare a local (`catch`, lambda, `out var`,
        /// pattern, `using`, local function) that shadows an outer one.
        fn resolve_name(&self, name: &NameExpr, depth: usize) -> Option<Ty> {
            if in_damaged_member(name.syntax()) {
                return None;
            }
            let ident = name.text();
            let use_site = name.syntax().text_range();
            for scope in name.syntax().ancestors().skip(1) {
                match scope.kind() {
                    BLOCK | SOURCE_FILE | NAMESPACE_DECL | FOR_STMT => {
                        let earlier: Vec<LocalDeclStmt> = scope
                            .children()
                            .filter_map(LocalDeclStmt::cast)
                            .filter(|stmt| stmt.syntax().text_range().end() <= use_site.start())
                            .collect();
                        for stmt in earlier.iter().rev() {
                            for declarator in stmt.declarators() {
                                if declarator.name().is_some_and(|n| n.text() == ident) {
                                    return self.declared_type(stmt.type_ref(), declarator.initializer(), depth);
                                }
                            }
                        }
                    }
                    FOREACH_STMT => {
                        let Some(foreach) = ForeachStmt::cast(scope.clone()) else { continue };
                        let in_collection = foreach
                            .collection()
                            .is_some_and(|c| c.syntax().text_range().contains_range(use_site));
                        if in_collection || !foreach.name().is_some_and(|n| n.text() == ident) {
                            continue;
                        }
                        let type_ref = foreach.type_ref()?;
                        if !type_ref.is_var() {
                            return Some(Ty::from_type_name(&type_ref.text()));
                        }
                        return match self.infer(&foreach.collection()?, depth)? {
                            Ty::Array(element) => Some(*element),
                            Ty::String => Some(Ty::Char),
                            _ => None,
                        };
                    }
                    METHOD_DECL | CONSTRUCTOR_DECL => {
                        let params = scope.children().find_map(ParamList::cast);
                        if let Some(ty) = params.and_then(|list| param_type(&list, &ident)) {
                            return Some(ty);
                        }
                    }
                    CLASS_DECL => {
                        if let Some(ty) = ClassDecl::cast(scope.clone()).and_then(|class| member_type_in(&class, &ident)) {
                            return Some(ty);
                        }
                    }
                    _ => {}
                }
            }
            None
        }

        /// Whether `name` refers to something declared, as opposed to a type name.
        fn is_declared(&self, name: &NameExpr, depth: usize) -> bool {
            self.resolve_name(name, depth).is_some()
        }

        fn member_type(&self, access: &MemberAccessExpr, depth: usize) -> Option<Ty> {
            let member = access.name_text()?;
            let receiver = access.receiver()?;
            if let Expr::Name(type_name) = &receiver {
                if !self.is_declared(type_name, depth) {
                    return static_member_type(&type_name.text(), &member);
                }
            }
            match self.infer(&receiver, depth)? {
                Ty::String | Ty::Array(_) if member == "Length" => Some(Ty::Int),
                Ty::Named(class_name) => {
                    let class = find_class(access.syntax(), &class_name)?;
                    member_type_in(&class, &member)
                }
                _ => None,
            }
        }

        fn invocation_type(&self, invocation: &InvocationExpr, depth: usize) -> Option<Ty> {
            match invocation.callee()? {
                Expr::MemberAccess(access) => {
                    let method = access.name_text()?;
                    if method == "ToString" {
                        return Some(Ty::String);
                    }
                    let receiver = access.receiver()?;
                    if let Expr::Name(type_name) = &receiver {
                        if !self.is_declared(type_name, depth) {
                            return static_method_type(&type_name.text(), &method);
                        }
                    }
                    match self.infer(&receiver, depth)? {
                        Ty::String => string_method_type(&method),
                        Ty::Named(class_name) => {
                            let class = find_class(access.syntax(), &class_name)?;
                            method_return_type(&class, &method)
                        }
                        _ => None,
                    }
                }
                Expr::Name(name) => {
                    let method = name.text();
                    if method == "nameof" {
                        return Some(Ty::String);
                    }
                    let class = enclosing_class(name.syntax())?;
                    method_return_type(&class, &method)
                }
                _ => None,
            }
        }

        fn binary_type(&self, binary: &BinaryExpr, depth: usize) -> Option<Ty> {
            let op = binary.op_kind()?;
            match op {
                EQ2 | NEQ | LT | GT | LTEQ | GTEQ | AMP2 | PIPE2 => return Some(Ty::Bool),
                _ => {}
            }
            let lhs = binary.lhs().and_then(|e| self.infer(&e, depth));
            let rhs = binary.rhs().and_then(|e| self.infer(&e, depth));
            match op {
                PLUS if lhs == Some(Ty::String) || rhs == Some(Ty::String) => Some(Ty::String),
                QUESTION2 => lhs.or(rhs),
                PLUS | MINUS | STAR | SLASH | PERCENT => Ty::promote(lhs?, rhs?),
                _ => None,
            }
        }
    }

    fn in_damaged_member(node: &SyntaxNode) -> bool {
        let member = node
            .ancestors()
            .find(|n| matches!(n.kind(), METHOD_DECL | CONSTRUCTOR_DECL | PROPERTY_DECL | FIELD_DECL))
            .or_else(|| node.ancestors().last());
        member.is_some_and(|member| member.descendants().any(|n| n.kind() == ERROR))
    }

    fn is_null(expr: &Option<Expr>) -> bool {
        match expr {
            Some(Expr::Literal(literal)) => literal.token().is_some_and(|t| t.kind() == NULL_KW),
            _ => false,
        }
    }

    fn literal_type(literal: &LiteralExpr) -> Option<Ty> {
        let token = literal.token()?;
        let text = token.text().to_ascii_lowercase();
        match token.kind() {
            STRING | VERBATIM_STRING | INTERPOLATED_STRING => Some(Ty::String),
            CHAR => Some(Ty::Char),
            TRUE_KW | FALSE_KW => Some(Ty::Bool),
            INT_NUMBER if text.ends_with('l') => Some(Ty::Long),
            INT_NUMBER => Some(Ty::Int),
            REAL_NUMBER if text.ends_with('f') => Some(Ty::Float),
            REAL_NUMBER if text.ends_with('m') => Some(Ty::Decimal),
            REAL_NUMBER => Some(Ty::Double),
            _ => None,
        }
    }

    fn param_type(list: &ParamList, ident: &str) -> Option<Ty> {
        list.params()
            .find(|param| param.name().is_some_and(|n| n.text() == ident))
            .and_then(|param| param.type_ref())
            .map(|type_ref| Ty::from_type_name(&type_ref.text()))
    }

    fn enclosing_class(node: &SyntaxNode) -> Option<ClassDecl> {
        node.ancestors().find_map(ClassDecl::cast)
    }

    fn find_class(anywhere: &SyntaxNode, name: &str) -> Option<ClassDecl> {
        let root = anywhere.ancestors().last()?;
        root.descendants()
            .filter_map(ClassDecl::cast)
            .find(|class| class.name().is_some_and(|n| n.text() == name))
    }

    /// Field, constant or property named `member`.
    fn member_type_in(class: &ClassDecl, member: &str) -> Option<Ty> {
        for field in class.fields() {
            if field.declarators().any(|d| d.name().is_some_and(|n| n.text() == member)) {
                return field.type_ref().map(|t| Ty::from_type_name(&t.text()));
            }
        }
        class
            .properties()
            .find(|property| property.name().is_some_and(|n| n.text() == member))
            .and_then(|property| property.type_ref())
            .map(|t| Ty::from_type_name(&t.text()))
    }

    fn method_return_type(class: &ClassDecl, method: &str) -> Option<Ty> {
        class
            .methods()
            .find(|m: &MethodDecl| m.name().is_some_and(|n| n.text() == method))
            .and_then(|m| m.return_type())
            .map(|t| Ty::from_type_name(&t.text()))
    }

    fn string_method_type(method: &str) -> Option<Ty> {
        let ty = match method {
            "Trim" | "TrimStart" | "TrimEnd" | "ToUpper" | "ToLower" | "ToUpperInvariant"
            | "ToLowerInvariant" | "Substring" | "Replace" | "Insert" | "Remove" | "PadLeft"
            | "PadRight" | "Normalize" => Ty::String,
            "IndexOf" | "LastIndexOf" | "IndexOfAny" | "LastIndexOfAny" | "CompareTo"
            | "GetHashCode" => Ty::Int,
            "Contains" | "StartsWith" | "EndsWith" | "Equals" | "IsNormalized" => Ty::Bool,
            "Split" => Ty::Array(Box::new(Ty::String)),
            "ToCharArray" => Ty::Array(Box::new(Ty::Char)),
            "Clone" => Ty::Object,
            _ => return None,
        };
        Some(ty)
    }

    fn static_member_type(type_name: &str, member: &str) -> Option<Ty> {
        match (type_name, member) {
            ("string" | "String", "Empty") => Some(Ty::String),
            ("Environment", "NewLine" | "MachineName" | "UserName" | "CurrentDirectory") => Some(Ty::String),
            ("int" | "Int32", "MaxValue" | "MinValue") => Some(Ty::Int),
            _ => None,
        }
    }

    fn static_method_type(type_name: &str, method: &str) -> Option<Ty> {
        match (type_name, method) {
            ("string" | "String", "Format" | "Join" | "Concat" | "Copy" | "Intern") => Some(Ty::String),
            ("string" | "String", "IsNullOrEmpty" | "IsNullOrWhiteSpace" | "Equals") => Some(Ty::Bool),
            ("string" | "String", "Compare" | "CompareOrdinal") => Some(Ty::Int),
            ("Convert", "ToString" | "ToBase64String") => Some(Ty::String),
            ("Convert", "ToInt32") => Some(Ty::Int),
            ("Console", "ReadLine") => Some(Ty::String),
            ("Path", "Combine" | "GetFileName" | "GetExtension" | "GetDirectoryName" | "GetFullPath") => {
                Some(Ty::String)
            }
            ("File", "ReadAllText") => Some(Ty::String),
            ("File", "ReadAllLines") => Some(Ty::Array(Box::new(Ty::String))),
            _ => None,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::parser::parser::parse;

        /// Type of the expression whose text (trivia excluded) is `target`.
        fn type_of(src: &str, target: &str) -> Option<Ty> {
            let root = parse(src).syntax_node();
            let expr = root
                .descendants()
                .filter_map(Expr::cast)
                .find(|e| e.syntax().text().to_string().trim() == target)
                .unwrap_or_else(|| panic!("no expression `{target}` in {src}"));
            SemanticModel::new().type_of(&expr)
        }

        #[test]
        fn test_literals() {
            assert_eq!(type_of("f(\"a\");", "\"a\""), Some(Ty::String));
            assert_eq!(type_of("f(@\"a\");", "@\"a\""), Some(Ty::String));
            assert_eq!(type_of("f(5);", "5"), Some(Ty::Int));
            assert_eq!(type_of("f(5L);", "5L"), Some(Ty::Long));
            assert_eq!(type_of("f(1.5);", "1.5"), Some(Ty::Double));
            assert_eq!(type_of("f('c');", "'c'"), Some(Ty::Char));
            assert_eq!(type_of("f(null);", "null"), None);
        }

        #[test]
        fn test_const_field() {
            let src = "class C { const string sample = \"s\"; void M() { f(sample); } }";
            assert_eq!(type_of(src, "sample"), Some(Ty::String));
        }

        #[test]
        fn test_locals_and_var() {
            assert_eq!(type_of("var s = \"a\"; f(s);", "s"), Some(Ty::String));
            assert_eq!(type_of("var n = 1; f(n);", "n"), Some(Ty::Int));
            assert_eq!(type_of("string[] a = { \"a\" }; f(a[0]);", "a[0]"), Some(Ty::String));
            assert_eq!(type_of("string s = \"\"; f(s[0]);", "s[0]"), Some(Ty::Char));
        }

        #[test]
        fn test_local_used_before_declaration_is_unresolved() {
            assert_eq!(type_of("f(s); string s = \"a\";", "s"), None);
        }

        #[test]
        fn test_parameters_and_foreach() {
            let src = "class C { void M(string p, int[] xs) { foreach (var x in xs) { f(x); } f(p); } }";
            assert_eq!(type_of(src, "p"), Some(Ty::String));
            assert_eq!(type_of(src, "x"), Some(Ty::Int));
        }

        #[test]
        fn test_string_members() {
            let src = "string s = \"a\"; f(s.Trim()); g(s.Length); h(s.Split(','));";
            assert_eq!(type_of(src, "s.Trim()"), Some(Ty::String));
            assert_eq!(type_of(src, "s.Length"), Some(Ty::Int));
            assert_eq!(type_of(src, "s.Split(',')"), Some(Ty::Array(Box::new(Ty::String))));
        }

        #[test]
        fn test_to_string_is_string_on_any_receiver() {
            assert_eq!(type_of("f(5.ToString());", "5.ToString()"), Some(Ty::String));
            assert_eq!(type_of("f(unknown.ToString());", "unknown.ToString()"), Some(Ty::String));
        }

        #[test]
        fn test_static_members() {
            assert_eq!(type_of("f(string.Empty);", "string.Empty"), Some(Ty::String));
            assert_eq!(type_of("f(String.Format(\"{0}\", 1));", "String.Format(\"{0}\", 1)"), Some(Ty::String));
            assert_eq!(type_of("f(Console.ReadLine());", "Console.ReadLine()"), Some(Ty::String));
        }

        #[test]
        fn test_binary() {
            assert_eq!(type_of("f(\"a\" + 1);", "\"a\" + 1"), Some(Ty::String));
            assert_eq!(type_of("f(1 + 2.0);", "1 + 2.0"), Some(Ty::Double));
            assert_eq!(type_of("f(1 == 2);", "1 == 2"), Some(Ty::Bool));
        }

        #[test]
        fn test_class_members_and_methods() {
            let src = "class C { string Name { get; set; } string Get() { return Name; } void M() { f(this.Name); g(Get()); } }";
            assert_eq!(type_of(src, "this.Name"), Some(Ty::String));
            assert_eq!(type_of(src, "Get()"), Some(Ty::String));
        }

        #[test]
        fn test_unknown_names_are_unresolved() {
            assert_eq!(type_of("f(mystery);", "mystery"), None);
            assert_eq!(type_of("f(obj.Prop);", "obj.Prop"), None);
        }

        #[test]
        fn test_names_in_a_member_that_failed_to_parse_are_unresolved() {
            let src = "class C { string e = \"a\"; void Ok() { f(e.Trim()); } void M() { try { } catch (Exception e) { g(e.Length); } } }";
            assert_eq!(type_of(src, "e.Trim()"), Some(Ty::String));
            assert_eq!(type_of(src, "e.Length"), None);
            assert_eq!(type_of("x => f(\"a\");", "\"a\""), Some(Ty::String));
        }

        #[test]
        fn test_generic_and_interpolated_expressions() {
            let src = "class C { int Foo<T>(string x) { return 1; } string Bar<T>() { return \"\"; } void M(string s) { f(Foo<int>(s)); g(Bar<int>()); } }";
            assert_eq!(type_of(src, "Foo<int>(s)"), Some(Ty::Int));
            assert_eq!(type_of(src, "Bar<int>()"), Some(Ty::String));
            assert_eq!(type_of("f($\"a{b}\");", "$\"a{b}\""), Some(Ty::String));
        }

        #[test]
        fn test_type_names() {
            assert_eq!(Ty::from_type_name("System.String"), Ty::String);
            assert_eq!(Ty::from_type_name("string?"), Ty::String);
            assert_eq!(Ty::from_type_name("string[]"), Ty::Array(Box::new(Ty::String)));
            assert_eq!(Ty::from_type_name("List<string>"), Ty::Named("List<string>".to_string()));
        }
    }
}
