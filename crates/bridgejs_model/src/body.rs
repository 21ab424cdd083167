//! Statements and expressions of member bodies.

use serde::{Deserialize, Serialize};

use crate::Span;
use crate::program::{SymbolRef, TypeRef};

/// A statement with its source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default)]
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expression(expr))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(value))
    }

    pub fn var(name: &str, ty: &str, initializer: Option<Expr>) -> Self {
        Self::new(StmtKind::VariableDeclaration {
            name: name.to_string(),
            ty: TypeRef::new(ty),
            initializer,
        })
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StmtKind {
    Expression(Expr),

    VariableDeclaration {
        name: String,
        ty: TypeRef,
        #[serde(default)]
        initializer: Option<Expr>,
    },

    Return(Option<Expr>),

    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        #[serde(default)]
        else_branch: Option<Vec<Stmt>>,
    },

    While {
        condition: Expr,
        body: Vec<Stmt>,
    },

    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
    },

    For {
        #[serde(default)]
        initializers: Vec<Stmt>,
        #[serde(default)]
        condition: Option<Expr>,
        #[serde(default)]
        iterators: Vec<Expr>,
        body: Vec<Stmt>,
    },

    ForEach {
        variable: String,
        ty: TypeRef,
        collection: Expr,
        body: Vec<Stmt>,
    },

    Break,

    Continue,

    Block(Vec<Stmt>),

    /// `throw expr;`, or a rethrow inside a catch clause when the expression is absent.
    Throw(Option<Expr>),

    Try {
        body: Vec<Stmt>,
        #[serde(default)]
        catches: Vec<CatchClause>,
        #[serde(default)]
        finally: Option<Vec<Stmt>>,
    },

    Switch {
        subject: Expr,
        sections: Vec<SwitchSection>,
    },

    Goto(String),
}

/// A `catch` clause. Both the caught type and the variable are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub variable: Option<String>,
    pub body: Vec<Stmt>,
}

/// A `switch` section; a `None` label is the `default` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSection {
    pub labels: Vec<Option<Expr>>,
    pub body: Vec<Stmt>,
}

/// Constructor chaining (`: base(...)` / `: this(...)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorInitializer {
    pub target: InitializerTarget,
    /// Overload ordinal of the chained constructor.
    #[serde(default)]
    pub overload: usize,
    #[serde(default)]
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitializerTarget {
    Base,
    This,
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    /// Resolved static type, when known.
    #[serde(default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            ty: None,
            span: Span::default(),
        }
    }

    pub fn typed(kind: ExprKind, ty: &str) -> Self {
        Self {
            kind,
            ty: Some(TypeRef::new(ty)),
            span: Span::default(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn int(value: i64) -> Self {
        Self::typed(ExprKind::Literal(Literal::Int(value)), "System.Int32")
    }

    pub fn string(value: &str) -> Self {
        Self::typed(ExprKind::Literal(Literal::String(value.to_string())), "System.String")
    }

    pub fn null() -> Self {
        Self::new(ExprKind::Literal(Literal::Null))
    }

    pub fn name(name: &str) -> Self {
        Self::new(ExprKind::Name(name.to_string()))
    }

    pub fn this() -> Self {
        Self::new(ExprKind::This)
    }

    pub fn member(target: Option<Expr>, symbol: SymbolRef) -> Self {
        Self::new(ExprKind::MemberAccess {
            target: target.map(Box::new),
            symbol,
        })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Invocation {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::new(ExprKind::Assignment {
            op: None,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn with_type(mut self, ty: &str) -> Self {
        self.ty = Some(TypeRef::new(ty));
        self
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExprKind {
    Literal(Literal),

    /// A local variable or parameter.
    Name(String),

    This,

    Base,

    /// Access to a field, property, method group or constant. `target` is `None` for static access.
    MemberAccess {
        #[serde(default)]
        target: Option<Box<Expr>>,
        symbol: SymbolRef,
    },

    Invocation {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },

    New {
        ty: TypeRef,
        /// Overload ordinal of the invoked constructor.
        #[serde(default)]
        constructor: usize,
        #[serde(default)]
        args: Vec<Expr>,
    },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Assignment; `op` is set for compound assignment (`+=`).
    Assignment {
        #[serde(default)]
        op: Option<BinaryOp>,
        target: Box<Expr>,
        value: Box<Expr>,
    },

    Conditional {
        condition: Box<Expr>,
        when_true: Box<Expr>,
        when_false: Box<Expr>,
    },

    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },

    ArrayLiteral {
        element_type: TypeRef,
        #[serde(default)]
        elements: Vec<Expr>,
    },

    Lambda {
        #[serde(default)]
        params: Vec<String>,
        body: Vec<Stmt>,
    },

    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },

    Is {
        expr: Box<Expr>,
        ty: TypeRef,
    },

    As {
        expr: Box<Expr>,
        ty: TypeRef,
    },

    TypeOf(TypeRef),

    Default(TypeRef),

    Parenthesized(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LogicalAnd,
    LogicalOr,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    NullCoalescing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Plus,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}
