use aurora_common::Span;

/// A whole compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// `module Name` header, when present. Anonymous units compile as "main".
    pub module: Option<ModuleDecl>,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Program {
            module: None,
            imports: Vec::new(),
            decls,
        }
    }
}

/// `module Name` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
    pub origin: Span,
}

/// `import Math` / `import ./vec as V` / `import Math::{sqrt, pow}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Import path: a module name (`Math`) or a relative path (`./vec`).
    pub path: String,
    /// Selective import list; `None` imports the whole module.
    pub items: Option<Vec<String>>,
    /// `as` alias, when present.
    pub alias: Option<String>,
    pub origin: Span,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    Trait(TraitDecl),
    Impl(ImplDecl),
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub ret_type: Option<TypeExpr>,
    /// `None` for external declarations (body supplied by the target runtime).
    pub body: Option<Expr>,
    pub exported: bool,
    pub external: bool,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub origin: Span,
}

/// A type declaration: record, sum type, or alias of another type expression.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub body: TypeDeclBody,
    pub exported: bool,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDeclBody {
    /// `type Point = { x: f64, y: f64 }`
    Record(Vec<FieldDecl>),
    /// `type Option<T> = Some(value: T) | None`
    Sum(Vec<VariantDecl>),
    /// `type Meters = f64`
    Alias(TypeExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub origin: Span,
}

/// A trait declaration: a named set of required method signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitDecl {
    pub name: String,
    pub type_params: Vec<TypeParam>,
    pub methods: Vec<MethodSig>,
    pub origin: Span,
}

/// A required method signature inside a trait declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<Param>,
    pub ret_type: Option<TypeExpr>,
    pub origin: Span,
}

/// An impl block: trait-for-type when `trait_name` is present, a plain
/// extension of the type otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplDecl {
    pub type_name: String,
    pub trait_name: Option<String>,
    pub methods: Vec<FuncDecl>,
    pub origin: Span,
}

/// A source-level type expression (annotation).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A bare type name: `i32`, `Point`, or a type parameter `T`.
    Name(String),
    /// `Base<Arg, ...>`
    Generic { base: String, args: Vec<TypeExpr> },
    /// `array<T>` written as `[T]`.
    Array(Box<TypeExpr>),
    /// `fn(A, B) -> R`
    Func {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
    /// `()`
    Unit,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    /// Whether the operator yields `bool` regardless of operand type.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// The C++ spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Unit,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub origin: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, origin: Span) -> Self {
        Expr { kind, origin }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Lit),
    /// A variable or function reference by name.
    Var(String),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object.member`
    Member {
        object: Box<Expr>,
        member: String,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `Point { x: 1.0, y: 2.0 }` -- `name` is `None` for anonymous records.
    Record {
        name: Option<String>,
        fields: Vec<(String, Expr)>,
    },
    Array(Vec<Expr>),
    /// `{ stmts; result }` -- the trailing result expression is optional.
    Block {
        stmts: Vec<Stmt>,
        result: Option<Box<Expr>>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    For {
        var: String,
        iterable: Box<Expr>,
        body: Box<Expr>,
    },
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    /// `value |> f(extra, args)` or `value |> f`.
    Pipe {
        value: Box<Expr>,
        target: Box<Expr>,
    },
}

/// One arm of a `match` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
    pub origin: Span,
}

/// Patterns are restricted to sum-type variants with name bindings, plus a
/// wildcard; nested patterns are a front-end concern (desugared there).
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `Some(x)` -- binds each field positionally.
    Variant { name: String, bindings: Vec<String> },
    /// `_`
    Wildcard,
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub origin: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, origin: Span) -> Self {
        Stmt { kind, origin }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    /// `let x = e` / `let mut x: T = e`
    Let {
        name: String,
        ty: Option<TypeExpr>,
        value: Expr,
        mutable: bool,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
    Return(Option<Expr>),
    Break,
    Continue,
}
