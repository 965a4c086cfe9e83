//! Purity classification and function-effect derivation.
//!
//! Pure expressions are those evaluable at compile time in the target
//! language. Classification is structural recursion over the typed IR and
//! never mutates it; derived effects land in a per-function side table
//! consumed by lowering.

use rustc_hash::FxHashMap;

use crate::ir::{self, Effect, EffectSet, ExprKind, Stmt};

/// Callee-name prefixes that perform I/O. A call whose resolvable name
/// starts with one of these is impure regardless of its arguments.
const IO_PREFIXES: &[&str] = &["println", "print", "read", "write", "open", "close"];

/// Per-function effect side table.
pub type EffectTable = FxHashMap<String, EffectSet>;

#[derive(Debug, Default)]
pub struct PurityAnalyzer;

impl PurityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn expr_is_pure(&self, expr: &ir::Expr) -> bool {
        match &expr.kind {
            ExprKind::Literal(_) | ExprKind::Var(_) => true,
            ExprKind::Binary { left, right, .. } => {
                self.expr_is_pure(left) && self.expr_is_pure(right)
            }
            ExprKind::Unary { operand, .. } => self.expr_is_pure(operand),
            ExprKind::Member { object, .. } => self.expr_is_pure(object),
            ExprKind::Index { object, index } => {
                self.expr_is_pure(object) && self.expr_is_pure(index)
            }
            ExprKind::Record { fields, .. } => {
                fields.iter().all(|(_, value)| self.expr_is_pure(value))
            }
            ExprKind::Array(elems) => elems.iter().all(|e| self.expr_is_pure(e)),
            ExprKind::Call { callee, args } => {
                if let Some(name) = callee_name(callee) {
                    if IO_PREFIXES.iter().any(|p| name.starts_with(p)) {
                        return false;
                    }
                }
                // Strings and collections are not literal types in the
                // target, so producing one cannot be compile-time work.
                if expr.ty.is_non_literal() {
                    return false;
                }
                args.iter().all(|a| self.expr_is_pure(a))
            }
            ExprKind::Block { stmts, result } => {
                stmts.iter().all(|s| self.stmt_is_pure(s)) && self.expr_is_pure(result)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr_is_pure(cond)
                    && self.expr_is_pure(then_branch)
                    && else_branch.as_deref().map_or(true, |e| self.expr_is_pure(e))
            }
            ExprKind::Match { scrutinee, arms } => {
                self.expr_is_pure(scrutinee) && arms.iter().all(|arm| self.arm_is_pure(arm))
            }
            ExprKind::While { .. } | ExprKind::For { .. } => false,
        }
    }

    pub fn stmt_is_pure(&self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Expr(expr) => self.expr_is_pure(expr),
            Stmt::Let { value, mutable, .. } => !mutable && self.expr_is_pure(value),
            Stmt::Match { scrutinee, arms } => {
                self.expr_is_pure(scrutinee) && arms.iter().all(|arm| self.arm_is_pure(arm))
            }
            Stmt::Assign { .. }
            | Stmt::Return(_)
            | Stmt::If { .. }
            | Stmt::While { .. }
            | Stmt::For { .. }
            | Stmt::Break
            | Stmt::Continue => false,
        }
    }

    fn arm_is_pure(&self, arm: &ir::MatchArm) -> bool {
        arm.guard.as_ref().map_or(true, |g| self.expr_is_pure(g)) && self.expr_is_pure(&arm.body)
    }

    /// Whether the expression performs any call at all, anywhere.
    fn expr_calls(&self, expr: &ir::Expr) -> bool {
        match &expr.kind {
            ExprKind::Call { .. } => true,
            ExprKind::Literal(_) | ExprKind::Var(_) => false,
            ExprKind::Binary { left, right, .. } => self.expr_calls(left) || self.expr_calls(right),
            ExprKind::Unary { operand, .. } => self.expr_calls(operand),
            ExprKind::Member { object, .. } => self.expr_calls(object),
            ExprKind::Index { object, index } => self.expr_calls(object) || self.expr_calls(index),
            ExprKind::Record { fields, .. } => fields.iter().any(|(_, v)| self.expr_calls(v)),
            ExprKind::Array(elems) => elems.iter().any(|e| self.expr_calls(e)),
            ExprKind::Block { stmts, result } => {
                stmts.iter().any(|s| self.stmt_calls(s)) || self.expr_calls(result)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr_calls(cond)
                    || self.expr_calls(then_branch)
                    || else_branch.as_deref().is_some_and(|e| self.expr_calls(e))
            }
            ExprKind::Match { scrutinee, arms } => {
                self.expr_calls(scrutinee)
                    || arms.iter().any(|arm| {
                        arm.guard.as_ref().is_some_and(|g| self.expr_calls(g))
                            || self.expr_calls(&arm.body)
                    })
            }
            ExprKind::While { cond, body } => {
                self.expr_calls(cond) || body.iter().any(|s| self.stmt_calls(s))
            }
            ExprKind::For { iterable, body, .. } => {
                self.expr_calls(iterable) || body.iter().any(|s| self.stmt_calls(s))
            }
        }
    }

    fn stmt_calls(&self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Expr(expr) => self.expr_calls(expr),
            Stmt::Let { value, .. } => self.expr_calls(value),
            Stmt::Assign { target, value } => self.expr_calls(target) || self.expr_calls(value),
            Stmt::Return(value) => value.as_ref().is_some_and(|v| self.expr_calls(v)),
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.expr_calls(cond)
                    || then_block.iter().any(|s| self.stmt_calls(s))
                    || else_block
                        .as_ref()
                        .is_some_and(|b| b.iter().any(|s| self.stmt_calls(s)))
            }
            Stmt::Match { scrutinee, arms } => {
                self.expr_calls(scrutinee)
                    || arms.iter().any(|arm| {
                        arm.guard.as_ref().is_some_and(|g| self.expr_calls(g))
                            || self.expr_calls(&arm.body)
                    })
            }
            Stmt::While { cond, body } => {
                self.expr_calls(cond) || body.iter().any(|s| self.stmt_calls(s))
            }
            Stmt::For { iterable, body, .. } => {
                self.expr_calls(iterable) || body.iter().any(|s| self.stmt_calls(s))
            }
            Stmt::Break | Stmt::Continue => false,
        }
    }

    /// Derive the effect set for one lowered function.
    ///
    /// Compile-time evaluability needs a pure body, a non-error return
    /// type, and a literal return type. The non-throwing guarantee is
    /// narrower on the call side: a pure body that performs no calls at
    /// all. External declarations (no body) carry only the non-throwing
    /// guarantee, taken on trust from the runtime.
    pub fn derive_effects(&self, func: &ir::FuncItem) -> EffectSet {
        let mut effects = EffectSet::empty();
        let Some(body) = &func.body else {
            effects.insert(Effect::Noexcept);
            return effects;
        };
        let pure = self.expr_is_pure(body);
        if pure && !func.ret_type.is_error() && !func.ret_type.is_non_literal() {
            effects.insert(Effect::Constexpr);
        }
        if pure && !self.expr_calls(body) {
            effects.insert(Effect::Noexcept);
        }
        effects
    }

    /// Build the per-function effect table for a module.
    pub fn analyze_module(&self, module: &ir::Module) -> EffectTable {
        let mut table = EffectTable::default();
        for item in &module.items {
            if let ir::Item::Func(func) = item {
                table.insert(func.name.clone(), self.derive_effects(func));
            }
        }
        table
    }
}

fn callee_name(callee: &ir::Expr) -> Option<&str> {
    match &callee.kind {
        ExprKind::Var(name) => Some(name),
        ExprKind::Member { member, .. } => Some(member),
        _ => None,
    }
}
