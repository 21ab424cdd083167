//! Type and member declarations.

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::body::{ConstructorInitializer, Expr, Literal, Stmt};

/// A complete resolved program: every type declared by the translated assembly, in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProgram {
    /// Name of the assembly the program was built from (used as the default output file name).
    pub assembly_name: String,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl ResolvedProgram {
    pub fn new(assembly_name: impl Into<String>) -> Self {
        Self {
            assembly_name: assembly_name.into(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: TypeDecl) -> Self {
        self.types.push(ty);
        self
    }

    /// Parse a program handed over as JSON by the resolution engine.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Look up a type declaration by its fully qualified name.
    pub fn find_type(&self, full_name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.full_name() == full_name)
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
}

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Accessibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

/// A reference to a type by its fully qualified source-language name (`System.Int32`, `N1.A`, `System.String[]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Element type when this is an array type (`T[]`).
    pub fn element(&self) -> Option<TypeRef> {
        self.0.strip_suffix("[]").map(TypeRef::new)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::new(name)
    }
}

/// A type declaration (class, struct, interface or enum).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub kind: TypeKind,
    /// Base class (first, if any) followed by implemented interfaces.
    #[serde(default)]
    pub base_types: Vec<TypeRef>,
    #[serde(default)]
    pub members: Vec<Member>,
    /// Raw documentation comment in the source dialect (XML doc comment body).
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    /// Explicit output file name requested by the source (file-name attribute).
    #[serde(default)]
    pub output_file: Option<String>,
    /// Source file the type was declared in.
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub span: Span,
}

impl TypeDecl {
    pub fn new(namespace: Option<&str>, name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            kind,
            ..Self::default()
        }
    }

    pub fn class(namespace: &str, name: &str) -> Self {
        Self::new(Some(namespace), name, TypeKind::Class)
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_base(mut self, base: impl Into<TypeRef>) -> Self {
        self.base_types.push(base.into());
        self
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_output_file(mut self, file: &str) -> Self {
        self.output_file = Some(file.to_string());
        self
    }

    /// Fully qualified name (`Namespace.Name`, or just `Name` in the global namespace).
    pub fn full_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    /// Members matching a predicate, in declaration order.
    pub fn members_where<'a>(&'a self, pred: impl Fn(&Member) -> bool + 'a) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.iter().filter(move |m| pred(m))
    }
}

/// A parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: TypeRef::new(ty),
        }
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// Conditional-compilation symbols attached to the member; calls are dropped unless one of them is defined.
    #[serde(default)]
    pub conditional: Vec<String>,
    #[serde(default)]
    pub span: Span,
}

impl Member {
    pub fn new(name: &str, kind: MemberKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            doc: None,
            accessibility: Accessibility::Public,
            is_static: false,
            is_abstract: false,
            conditional: Vec::new(),
            span: Span::default(),
        }
    }

    pub fn field(name: &str, ty: &str, initializer: Option<Expr>) -> Self {
        Self::new(
            name,
            MemberKind::Field {
                ty: TypeRef::new(ty),
                initializer,
            },
        )
    }

    pub fn method(name: &str, params: Vec<Param>, return_type: &str, body: Vec<Stmt>) -> Self {
        Self::new(
            name,
            MemberKind::Method {
                params,
                return_type: TypeRef::new(return_type),
                body: Some(body),
            },
        )
    }

    pub fn constructor(params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self::new(
            ".ctor",
            MemberKind::Constructor {
                params,
                body,
                initializer: None,
            },
        )
    }

    pub fn auto_property(name: &str, ty: &str) -> Self {
        Self::new(
            name,
            MemberKind::Property {
                ty: TypeRef::new(ty),
                getter: None,
                setter: None,
                auto: true,
                initializer: None,
            },
        )
    }

    pub fn enum_value(name: &str, value: i64) -> Self {
        Self::new(name, MemberKind::EnumValue { value })
    }

    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_conditional(mut self, symbol: &str) -> Self {
        self.conditional.push(symbol.to_string());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, MemberKind::Constructor { .. })
    }
}

/// Member kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MemberKind {
    Field {
        ty: TypeRef,
        #[serde(default)]
        initializer: Option<Expr>,
    },

    Constant {
        ty: TypeRef,
        value: Literal,
    },

    /// Property; `auto` marks compiler-implemented accessors.
    Property {
        ty: TypeRef,
        #[serde(default)]
        getter: Option<Vec<Stmt>>,
        #[serde(default)]
        setter: Option<Vec<Stmt>>,
        #[serde(default)]
        auto: bool,
        #[serde(default)]
        initializer: Option<Expr>,
    },

    /// Method; `body` is `None` for abstract and extern methods.
    Method {
        #[serde(default)]
        params: Vec<Param>,
        return_type: TypeRef,
        #[serde(default)]
        body: Option<Vec<Stmt>>,
    },

    Constructor {
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default)]
        body: Vec<Stmt>,
        #[serde(default)]
        initializer: Option<ConstructorInitializer>,
    },

    EnumValue {
        value: i64,
    },
}

/// What a [`SymbolRef`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SymbolKind {
    #[default]
    Field,
    Property,
    Method,
    Constant,
    EnumValue,
    Type,
}

/// A resolved reference to a member (or type) declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRef {
    /// Fully qualified name of the declaring type.
    pub declaring_type: String,
    pub name: String,
    #[serde(default)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub is_static: bool,
    /// Ordinal among same-named members of the declaring type, in declaration order.
    #[serde(default)]
    pub overload: usize,
}

impl SymbolRef {
    pub fn new(declaring_type: &str, name: &str, kind: SymbolKind) -> Self {
        Self {
            declaring_type: declaring_type.to_string(),
            name: name.to_string(),
            kind,
            is_static: false,
            overload: 0,
        }
    }

    pub fn method(declaring_type: &str, name: &str) -> Self {
        Self::new(declaring_type, name, SymbolKind::Method)
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_overload(mut self, overload: usize) -> Self {
        self.overload = overload;
        self
    }

    /// `DeclaringType.Name`, the identity used by resolver queries.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.declaring_type, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_includes_namespace() {
        assert_eq!(TypeDecl::class("N1", "A").full_name(), "N1.A");
        assert_eq!(TypeDecl::new(None, "A", TypeKind::Class).full_name(), "A");
        assert_eq!(TypeDecl::new(Some(""), "A", TypeKind::Class).full_name(), "A");
    }

    #[test]
    fn array_type_element() {
        assert_eq!(TypeRef::new("System.Int32[]").element(), Some(TypeRef::new("System.Int32")));
        assert_eq!(TypeRef::new("System.Int32").element(), None);
    }

    #[test]
    fn program_from_json() {
        let json = r#"{
            "assemblyName": "Demo",
            "types": [
                {
                    "name": "A",
                    "namespace": "N1",
                    "members": [
                        { "name": "Count", "kind": { "field": { "ty": "System.Int32" } } },
                        { "name": "Run", "kind": { "method": { "returnType": "System.Void", "body": [] } }, "isStatic": true }
                    ]
                }
            ]
        }"#;
        let program = ResolvedProgram::from_json(json).unwrap();
        assert_eq!(program.assembly_name, "Demo");
        let ty = program.find_type("N1.A").unwrap();
        assert_eq!(ty.kind, TypeKind::Class);
        assert_eq!(ty.members.len(), 2);
        assert!(ty.members[1].is_static);
        assert!(matches!(ty.members[1].kind, MemberKind::Method { body: Some(_), .. }));
    }

    #[test]
    fn members_where_preserves_declaration_order() {
        let ty = TypeDecl::class("N", "T")
            .with_member(Member::field("b", "System.Int32", None))
            .with_member(Member::enum_value("x", 1))
            .with_member(Member::field("a", "System.Int32", None));
        let names: Vec<_> = ty
            .members_where(|m| matches!(m.kind, MemberKind::Field { .. }))
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
