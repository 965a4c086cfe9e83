//! The typed intermediate representation.
//!
//! A parallel variant set to the syntax tree where every expression carries
//! its resolved [`Ty`]. Produced once by the semantic engine, consumed once
//! by target lowering. Operator and literal enums are shared with the
//! syntax crate -- desugaring does not change them.

use std::fmt;

use aurora_common::Span;
pub use aurora_syntax::{BinOp, Lit, UnOp};

use crate::ty::Ty;

/// A derived function-level property used to decorate lowered output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Eligible for compile-time evaluation (`constexpr` in the target).
    Constexpr,
    /// Carries the non-throwing guarantee (`noexcept` in the target).
    Noexcept,
}

impl Effect {
    pub fn name(self) -> &'static str {
        match self {
            Effect::Constexpr => "constexpr",
            Effect::Noexcept => "noexcept",
        }
    }
}

/// The set of effects derived for one function.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectSet {
    constexpr: bool,
    noexcept: bool,
}

impl EffectSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, effect: Effect) {
        match effect {
            Effect::Constexpr => self.constexpr = true,
            Effect::Noexcept => self.noexcept = true,
        }
    }

    pub fn contains(self, effect: Effect) -> bool {
        match effect {
            Effect::Constexpr => self.constexpr,
            Effect::Noexcept => self.noexcept,
        }
    }

    pub fn is_empty(self) -> bool {
        !self.constexpr && !self.noexcept
    }

    /// Effects in canonical order (constexpr before noexcept).
    pub fn iter(self) -> impl Iterator<Item = Effect> {
        [Effect::Constexpr, Effect::Noexcept]
            .into_iter()
            .filter(move |e| self.contains(*e))
    }

    pub fn names(self) -> Vec<String> {
        self.iter().map(|e| e.name().to_string()).collect()
    }
}

impl fmt::Display for EffectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join("+"))
    }
}

/// A lowered compilation unit: type items then function items, in
/// declaration order, plus the collected imports.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub imports: Vec<Import>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub path: String,
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Func(FuncItem),
    Type(TypeItem),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Func(func) => &func.name,
            Item::Type(ty) => &ty.name,
        }
    }
}

/// A lowered function.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncItem {
    pub name: String,
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub ret_type: Ty,
    /// `None` for external declarations.
    pub body: Option<Expr>,
    pub effects: EffectSet,
    pub exported: bool,
    pub external: bool,
    pub origin: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

/// A lowered type declaration with its fully resolved type value.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeItem {
    pub name: String,
    pub type_params: Vec<String>,
    pub ty: Ty,
    pub exported: bool,
    pub origin: Span,
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Ty,
    pub origin: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Ty, origin: Span) -> Self {
        Expr { kind, ty, origin }
    }

    /// The unit value, used when a block has no trailing result.
    pub fn unit(origin: Span) -> Self {
        Expr::new(ExprKind::Literal(Lit::Unit), Ty::Unit, origin)
    }

    pub fn is_unit_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(Lit::Unit))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Lit),
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
    Member {
        object: Box<Expr>,
        member: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Record {
        name: Option<String>,
        fields: Vec<(String, Expr)>,
    },
    Array(Vec<Expr>),
    Block {
        stmts: Vec<Stmt>,
        result: Box<Expr>,
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
    /// Unit-typed loop in expression position (e.g. as a block result).
    While {
        cond: Box<Expr>,
        body: Vec<Stmt>,
    },
    For {
        var: String,
        iterable: Box<Expr>,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

/// A typed match pattern: variant patterns carry each binding's resolved
/// field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Variant {
        name: String,
        bindings: Vec<(String, Ty)>,
    },
    Wildcard,
}

/// A typed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Let {
        name: String,
        ty: Ty,
        value: Expr,
        mutable: bool,
    },
    Assign {
        target: Expr,
        value: Expr,
    },
    Return(Option<Expr>),
    /// A true if-statement (branches are statement blocks, no value).
    If {
        cond: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    Match {
        scrutinee: Expr,
        arms: Vec<MatchArm>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    For {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    Break,
    Continue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_set_insert_and_contains() {
        let mut effects = EffectSet::empty();
        assert!(effects.is_empty());
        effects.insert(Effect::Constexpr);
        assert!(effects.contains(Effect::Constexpr));
        assert!(!effects.contains(Effect::Noexcept));
        effects.insert(Effect::Noexcept);
        assert_eq!(effects.names(), vec!["constexpr", "noexcept"]);
    }

    #[test]
    fn effect_set_iteration_order_is_canonical() {
        let mut effects = EffectSet::empty();
        effects.insert(Effect::Noexcept);
        effects.insert(Effect::Constexpr);
        let collected: Vec<Effect> = effects.iter().collect();
        assert_eq!(collected, vec![Effect::Constexpr, Effect::Noexcept]);
    }

    #[test]
    fn unit_literal_recognition() {
        let unit = Expr::unit(Span::synthetic());
        assert!(unit.is_unit_literal());
        assert!(unit.ty.is_unit());
    }
}
