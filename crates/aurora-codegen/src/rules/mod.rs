//! The target lowering rule engine.
//!
//! Two statically assembled, ordered rule lists ([`EXPR_RULES`] and
//! [`STMT_RULES`]) drive a chain-of-responsibility dispatch over the typed
//! IR: the first rule whose matcher accepts a node produces its C++ form,
//! and a node no rule accepts is a fatal internal error. Function
//! decoration (effect modifiers plus the telemetry event) runs as a
//! separate step after a function's structural body has been lowered.

mod expr;
mod stmt;

use aurora_common::{CompileError, EventBus};
use aurora_sema::ir;

use crate::cpp::{map_type, sanitize_identifier, CppExpr, CppFunction, CppModule, CppParam, CppStmt, CppTypeDecl};
use crate::decorate::FunctionDecorator;

/// One expression rule: a diagnostic name and a matcher returning
/// `Ok(None)` when it does not apply.
pub type ExprRule = (
    &'static str,
    fn(&Generator, &ir::Expr) -> Result<Option<CppExpr>, CompileError>,
);

/// One statement rule; a match may produce several output statements.
pub type StmtRule = (
    &'static str,
    fn(&Generator, &ir::Stmt) -> Result<Option<Vec<CppStmt>>, CompileError>,
);

pub const EXPR_RULES: &[ExprRule] = &[
    ("literal", expr::literal),
    ("var", expr::var),
    ("binary", expr::binary),
    ("unary", expr::unary),
    ("call", expr::call),
    ("member", expr::member),
    ("index", expr::index),
    ("array", expr::array),
    ("record", expr::record),
    ("block", expr::block),
    ("if", expr::if_expr),
    ("match", expr::match_expr),
    ("loop", expr::loop_expr),
];

pub const STMT_RULES: &[StmtRule] = &[
    ("expr", stmt::expr_stmt),
    ("let", stmt::let_stmt),
    ("assign", stmt::assign),
    ("return", stmt::return_stmt),
    ("if", stmt::if_stmt),
    ("match", stmt::match_stmt),
    ("while", stmt::while_stmt),
    ("for", stmt::for_stmt),
    ("break", stmt::break_stmt),
    ("continue", stmt::continue_stmt),
];

/// Lowers typed IR modules to the C++ target AST.
#[derive(Default)]
pub struct Generator {
    /// Decoration events are published here; subscribe before lowering.
    pub events: EventBus,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lower_module(&self, module: &ir::Module) -> Result<CppModule, CompileError> {
        let mut out = CppModule {
            name: module.name.clone(),
            ..CppModule::default()
        };
        for item in &module.items {
            match item {
                ir::Item::Type(ty) => out.types.extend(self.lower_type_item(ty)),
                ir::Item::Func(func) => out.functions.push(self.lower_function(func)?),
            }
        }
        Ok(out)
    }

    /// Structural lowering of one function followed by the decoration
    /// step.
    pub fn lower_function(&self, func: &ir::FuncItem) -> Result<CppFunction, CompileError> {
        let mut out = CppFunction::new(sanitize_identifier(&func.name), map_type(&func.ret_type));
        out.params = func
            .params
            .iter()
            .map(|p| CppParam {
                ty: map_type(&p.ty),
                name: sanitize_identifier(&p.name),
            })
            .collect();
        out.body = match &func.body {
            Some(body) => Some(self.lower_body(body, !func.ret_type.is_unit())?),
            None => None,
        };
        FunctionDecorator::new(&self.events).decorate(&mut out, func.effects);
        Ok(out)
    }

    pub fn lower_type_item(&self, item: &ir::TypeItem) -> Vec<CppTypeDecl> {
        use aurora_sema::Ty;
        match &item.ty {
            Ty::Record { fields, .. } => vec![CppTypeDecl::Struct {
                name: sanitize_identifier(&item.name),
                fields: fields
                    .iter()
                    .map(|f| CppParam {
                        ty: map_type(&f.ty),
                        name: sanitize_identifier(&f.name),
                    })
                    .collect(),
            }],
            Ty::Sum { variants, .. } => {
                let mut decls = Vec::with_capacity(variants.len() + 1);
                for variant in variants {
                    decls.push(CppTypeDecl::Struct {
                        name: sanitize_identifier(&variant.name),
                        fields: variant
                            .fields
                            .iter()
                            .map(|f| CppParam {
                                ty: map_type(&f.ty),
                                name: sanitize_identifier(&f.name),
                            })
                            .collect(),
                    });
                }
                decls.push(CppTypeDecl::VariantAlias {
                    name: sanitize_identifier(&item.name),
                    alternatives: variants
                        .iter()
                        .map(|v| sanitize_identifier(&v.name))
                        .collect(),
                });
                decls
            }
            other => vec![CppTypeDecl::Alias {
                name: sanitize_identifier(&item.name),
                ty: map_type(other),
            }],
        }
    }

    /// Dispatch one expression through the rule list.
    pub fn lower_expr(&self, node: &ir::Expr) -> Result<CppExpr, CompileError> {
        for (_, rule) in EXPR_RULES {
            if let Some(lowered) = rule(self, node)? {
                return Ok(lowered);
            }
        }
        Err(CompileError::internal(format!(
            "no lowering rule for expression kind '{}'",
            expr_kind_name(node)
        ))
        .with_origin(node.origin))
    }

    /// Dispatch one statement through the rule list.
    pub fn lower_stmt(&self, node: &ir::Stmt) -> Result<Vec<CppStmt>, CompileError> {
        for (_, rule) in STMT_RULES {
            if let Some(lowered) = rule(self, node)? {
                return Ok(lowered);
            }
        }
        Err(CompileError::internal(format!(
            "no lowering rule for statement kind '{}'",
            stmt_kind_name(node)
        )))
    }

    /// Lower a function (or lambda) body expression to statements. When
    /// `returns` is set the trailing value becomes a return statement;
    /// otherwise a trailing unit value vanishes.
    pub(crate) fn lower_body(
        &self,
        body: &ir::Expr,
        returns: bool,
    ) -> Result<Vec<CppStmt>, CompileError> {
        match &body.kind {
            ir::ExprKind::Block { stmts, result } => {
                let mut out = Vec::with_capacity(stmts.len() + 1);
                for stmt in stmts {
                    out.extend(self.lower_stmt(stmt)?);
                }
                out.extend(self.lower_tail(result, returns)?);
                Ok(out)
            }
            _ => self.lower_tail(body, returns),
        }
    }

    fn lower_tail(&self, value: &ir::Expr, returns: bool) -> Result<Vec<CppStmt>, CompileError> {
        if value.is_unit_literal() {
            return Ok(vec![]);
        }
        if returns && !value.ty.is_unit() {
            return Ok(vec![CppStmt::Return(Some(self.lower_expr(value)?))]);
        }
        // Effect-only tail: keep loops and conditionals in statement form.
        match &value.kind {
            ir::ExprKind::Block { .. }
            | ir::ExprKind::If { .. }
            | ir::ExprKind::Match { .. }
            | ir::ExprKind::While { .. }
            | ir::ExprKind::For { .. } => self.statementize(value),
            _ => Ok(vec![CppStmt::Expr(self.lower_expr(value)?)]),
        }
    }

    /// Lower a unit-typed expression as statements rather than wrapping
    /// it in an immediately-invoked lambda.
    pub(crate) fn statementize(&self, value: &ir::Expr) -> Result<Vec<CppStmt>, CompileError> {
        match &value.kind {
            ir::ExprKind::Block { .. } => self.lower_body(value, false),
            ir::ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => Ok(vec![CppStmt::If {
                cond: self.lower_expr(cond)?,
                then_block: self.lower_body(then_branch, false)?,
                else_block: match else_branch {
                    Some(e) => Some(self.lower_body(e, false)?),
                    None => None,
                },
            }]),
            ir::ExprKind::Match { scrutinee, arms } => {
                stmt::lower_match(self, scrutinee, arms, false)
            }
            ir::ExprKind::While { cond, body } => {
                let mut stmts = Vec::new();
                for s in body {
                    stmts.extend(self.lower_stmt(s)?);
                }
                Ok(vec![CppStmt::While {
                    cond: self.lower_expr(cond)?,
                    body: stmts,
                }])
            }
            ir::ExprKind::For {
                var,
                iterable,
                body,
            } => {
                let mut stmts = Vec::new();
                for s in body {
                    stmts.extend(self.lower_stmt(s)?);
                }
                Ok(vec![CppStmt::ForEach {
                    var: sanitize_identifier(var),
                    iterable: self.lower_expr(iterable)?,
                    body: stmts,
                }])
            }
            _ => Ok(vec![CppStmt::Expr(self.lower_expr(value)?)]),
        }
    }
}

fn expr_kind_name(node: &ir::Expr) -> &'static str {
    match node.kind {
        ir::ExprKind::Literal(_) => "literal",
        ir::ExprKind::Var(_) => "var",
        ir::ExprKind::Binary { .. } => "binary",
        ir::ExprKind::Unary { .. } => "unary",
        ir::ExprKind::Call { .. } => "call",
        ir::ExprKind::Member { .. } => "member",
        ir::ExprKind::Index { .. } => "index",
        ir::ExprKind::Record { .. } => "record",
        ir::ExprKind::Array(_) => "array",
        ir::ExprKind::Block { .. } => "block",
        ir::ExprKind::If { .. } => "if",
        ir::ExprKind::Match { .. } => "match",
        ir::ExprKind::While { .. } => "while",
        ir::ExprKind::For { .. } => "for",
    }
}

fn stmt_kind_name(node: &ir::Stmt) -> &'static str {
    match node {
        ir::Stmt::Expr(_) => "expr",
        ir::Stmt::Let { .. } => "let",
        ir::Stmt::Assign { .. } => "assign",
        ir::Stmt::Return(_) => "return",
        ir::Stmt::If { .. } => "if",
        ir::Stmt::Match { .. } => "match",
        ir::Stmt::While { .. } => "while",
        ir::Stmt::For { .. } => "for",
        ir::Stmt::Break => "break",
        ir::Stmt::Continue => "continue",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_lists_cover_every_node_kind() {
        let expr_names: Vec<&str> = EXPR_RULES.iter().map(|(n, _)| *n).collect();
        for kind in [
            "literal", "var", "binary", "unary", "call", "member", "index", "array", "record",
            "block", "if", "match",
        ] {
            assert!(expr_names.contains(&kind), "missing expression rule {kind}");
        }
        let stmt_names: Vec<&str> = STMT_RULES.iter().map(|(n, _)| *n).collect();
        for kind in [
            "expr", "let", "assign", "return", "if", "match", "while", "for", "break", "continue",
        ] {
            assert!(stmt_names.contains(&kind), "missing statement rule {kind}");
        }
    }
}
