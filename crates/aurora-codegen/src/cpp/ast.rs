//! The C++ target AST.
//!
//! A deliberately small node set: just enough structure for the lowering
//! rules to target and for the renderer to print. Nodes carry rendered
//! type spellings (`std::vector<double>`) rather than semantic types; type
//! mapping happens once, on the way in.

/// A C++ expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CppExpr {
    /// An already-spelled literal token (`42`, `3.14`, `true`, `"s"`).
    Literal(String),
    /// An identifier or qualified name (`x`, `math::sqrt`).
    Ident(String),
    Unary {
        op: String,
        operand: Box<CppExpr>,
    },
    Binary {
        op: String,
        left: Box<CppExpr>,
        right: Box<CppExpr>,
    },
    Call {
        callee: Box<CppExpr>,
        args: Vec<CppExpr>,
    },
    Member {
        object: Box<CppExpr>,
        field: String,
    },
    Index {
        object: Box<CppExpr>,
        index: Box<CppExpr>,
    },
    Ternary {
        cond: Box<CppExpr>,
        then_value: Box<CppExpr>,
        else_value: Box<CppExpr>,
    },
    /// Brace initialization: `Point{1.0, 2.0}` or `{1, 2, 3}` when `name`
    /// is empty.
    InitList {
        name: String,
        values: Vec<CppExpr>,
    },
    /// An immediately-invoked lambda, the expression form of a statement
    /// block: `[&]() { ...; return v; }()`.
    Iife(Vec<CppStmt>),
}

impl CppExpr {
    pub fn ident(name: impl Into<String>) -> CppExpr {
        CppExpr::Ident(name.into())
    }

    pub fn call(callee: CppExpr, args: Vec<CppExpr>) -> CppExpr {
        CppExpr::Call {
            callee: Box::new(callee),
            args,
        }
    }
}

/// A C++ statement.
#[derive(Debug, Clone, PartialEq)]
pub enum CppStmt {
    Expr(CppExpr),
    /// `const? ty name = init;`
    VarDecl {
        ty: String,
        name: String,
        init: CppExpr,
        is_const: bool,
    },
    /// Positional structured binding: `auto& [a, b] = init;`
    StructuredBinding {
        names: Vec<String>,
        init: CppExpr,
    },
    Assign {
        target: CppExpr,
        value: CppExpr,
    },
    Return(Option<CppExpr>),
    If {
        cond: CppExpr,
        then_block: Vec<CppStmt>,
        else_block: Option<Vec<CppStmt>>,
    },
    While {
        cond: CppExpr,
        body: Vec<CppStmt>,
    },
    /// Range-for: `for (const auto& var : iterable)`.
    ForEach {
        var: String,
        iterable: CppExpr,
        body: Vec<CppStmt>,
    },
    Break,
    Continue,
}

/// A lowered function with its decoration slots.
///
/// `prefix_modifiers` render before the return type (`constexpr`),
/// `suffix_modifiers` after the parameter list (`noexcept`). Both are
/// idempotent: adding a modifier already present is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct CppFunction {
    pub name: String,
    pub ret_type: String,
    pub params: Vec<CppParam>,
    pub body: Option<Vec<CppStmt>>,
    pub prefix_modifiers: Vec<String>,
    pub suffix_modifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CppParam {
    pub ty: String,
    pub name: String,
}

impl CppFunction {
    pub fn new(name: impl Into<String>, ret_type: impl Into<String>) -> Self {
        CppFunction {
            name: name.into(),
            ret_type: ret_type.into(),
            params: Vec::new(),
            body: None,
            prefix_modifiers: Vec::new(),
            suffix_modifiers: Vec::new(),
        }
    }

    pub fn add_prefix_modifier(&mut self, modifier: &str) {
        if !self.prefix_modifiers.iter().any(|m| m == modifier) {
            self.prefix_modifiers.push(modifier.to_string());
        }
    }

    pub fn add_suffix_modifier(&mut self, modifier: &str) {
        if !self.suffix_modifiers.iter().any(|m| m == modifier) {
            self.suffix_modifiers.push(modifier.to_string());
        }
    }
}

/// A lowered type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum CppTypeDecl {
    /// `struct Name { ty field; ... };`
    Struct {
        name: String,
        fields: Vec<CppParam>,
    },
    /// `using Name = std::variant<A, B, ...>;`
    VariantAlias {
        name: String,
        alternatives: Vec<String>,
    },
    /// `using Name = ty;`
    Alias {
        name: String,
        ty: String,
    },
}

/// One lowered compilation unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CppModule {
    pub name: String,
    pub types: Vec<CppTypeDecl>,
    pub functions: Vec<CppFunction>,
}
