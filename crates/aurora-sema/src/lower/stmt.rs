//! Statement lowering and expression-statement simplification.
//!
//! One source statement may lower to zero IR statements (a dropped unit
//! literal), several (a spliced block), or a rewritten form (a unit-typed
//! `if` expression becomes a true if-statement).

use aurora_common::CompileError;
use aurora_syntax as ast;

use super::Lowerer;
use crate::ir;
use crate::ty::Ty;

impl<'a> Lowerer<'a> {
    pub fn lower_stmt(&mut self, stmt: &ast::Stmt) -> Result<Vec<ir::Stmt>, CompileError> {
        match &stmt.kind {
            ast::StmtKind::Expr(expr) => {
                let lowered = self.lower_expr(expr)?;
                Ok(self.expr_into_stmts(lowered))
            }
            ast::StmtKind::Let {
                name,
                ty,
                value,
                mutable,
            } => {
                let value = self.lower_expr(value)?;
                // Binding a move-semantic value transfers ownership from
                // the initializer into the new name.
                if let ir::ExprKind::Var(source) = &value.kind {
                    if value.ty.is_move_semantic() {
                        self.vars.mark_moved(source.clone());
                    }
                }
                let type_params = self.type_params.clone();
                let binding_ty = match ty {
                    Some(annotation) => {
                        let declared = self.resolve_type_expr(annotation, &type_params)?;
                        if !value.ty.is_compatible(&declared) {
                            return Err(CompileError::type_error(format!(
                                "cannot initialize '{name}': expected {declared}, got {}",
                                value.ty
                            ))
                            .with_origin(stmt.origin));
                        }
                        declared
                    }
                    None => value.ty.clone(),
                };
                self.vars
                    .set_with_initializer(name.clone(), binding_ty.clone(), value.clone());
                Ok(vec![ir::Stmt::Let {
                    name: name.clone(),
                    ty: binding_ty,
                    value,
                    mutable: *mutable,
                }])
            }
            ast::StmtKind::Assign { target, value } => {
                let target = self.lower_expr(target)?;
                let value = self.lower_expr(value)?;
                if !value.ty.is_compatible(&target.ty) {
                    return Err(CompileError::type_error(format!(
                        "cannot assign {} to a target of type {}",
                        value.ty, target.ty
                    ))
                    .with_origin(stmt.origin));
                }
                // Assignment re-initializes a moved-out binding.
                if let ir::ExprKind::Var(name) = &target.kind {
                    self.vars.reset_moved(name);
                }
                Ok(vec![ir::Stmt::Assign { target, value }])
            }
            ast::StmtKind::Return(value) => {
                let value = value.as_ref().map(|v| self.lower_expr(v)).transpose()?;
                if let Some(expected) = self.current_ret.clone() {
                    let actual = value.as_ref().map(|v| v.ty.clone()).unwrap_or(Ty::Unit);
                    if !actual.is_compatible(&expected) {
                        return Err(CompileError::type_error(format!(
                            "return type mismatch: expected {expected}, got {actual}"
                        ))
                        .with_origin(stmt.origin));
                    }
                }
                Ok(vec![ir::Stmt::Return(value)])
            }
            ast::StmtKind::Break => {
                if self.loop_depth == 0 {
                    return Err(CompileError::scope("'break' outside of a loop")
                        .with_origin(stmt.origin));
                }
                Ok(vec![ir::Stmt::Break])
            }
            ast::StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(CompileError::scope("'continue' outside of a loop")
                        .with_origin(stmt.origin));
                }
                Ok(vec![ir::Stmt::Continue])
            }
        }
    }

    /// Convert an expression evaluated for effect into statements.
    ///
    /// A unit literal disappears, a block splices its statements inline,
    /// unit-typed `if` and `match` expressions become their statement
    /// forms, and loops become loop statements. Anything else is wrapped
    /// as an expression statement.
    pub fn expr_into_stmts(&mut self, expr: ir::Expr) -> Vec<ir::Stmt> {
        match expr.kind {
            ir::ExprKind::Literal(ir::Lit::Unit) => vec![],
            ir::ExprKind::Block { stmts, result } => {
                let mut out = stmts;
                out.extend(self.expr_into_stmts(*result));
                out
            }
            ir::ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } if expr.ty.is_unit() => {
                let then_block = self.expr_into_stmts(*then_branch);
                let else_block = else_branch.map(|e| self.expr_into_stmts(*e));
                vec![ir::Stmt::If {
                    cond: *cond,
                    then_block,
                    else_block,
                }]
            }
            ir::ExprKind::Match { scrutinee, arms } if expr.ty.is_unit() => {
                vec![ir::Stmt::Match {
                    scrutinee: *scrutinee,
                    arms,
                }]
            }
            ir::ExprKind::While { cond, body } => vec![ir::Stmt::While { cond: *cond, body }],
            ir::ExprKind::For {
                var,
                iterable,
                body,
            } => vec![ir::Stmt::For {
                var,
                iterable: *iterable,
                body,
            }],
            kind => vec![ir::Stmt::Expr(ir::Expr {
                kind,
                ty: expr.ty,
                origin: expr.origin,
            })],
        }
    }
}
