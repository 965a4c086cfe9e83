//! Statement lowering rules, plus the structural match lowering shared
//! with expression position.

use aurora_common::CompileError;
use aurora_sema::ir;

use super::Generator;
use crate::cpp::{map_type, sanitize_identifier, CppExpr, CppStmt};

type RuleResult = Result<Option<Vec<CppStmt>>, CompileError>;

pub(super) fn expr_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::Expr(expr) = node else {
        return Ok(None);
    };
    gen.statementize(expr).map(Some)
}

pub(super) fn let_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::Let {
        name,
        ty,
        value,
        mutable,
    } = node
    else {
        return Ok(None);
    };
    Ok(Some(vec![CppStmt::VarDecl {
        ty: map_type(ty),
        name: sanitize_identifier(name),
        init: gen.lower_expr(value)?,
        is_const: !mutable,
    }]))
}

pub(super) fn assign(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::Assign { target, value } = node else {
        return Ok(None);
    };
    Ok(Some(vec![CppStmt::Assign {
        target: gen.lower_expr(target)?,
        value: gen.lower_expr(value)?,
    }]))
}

pub(super) fn return_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::Return(value) = node else {
        return Ok(None);
    };
    let value = value.as_ref().map(|v| gen.lower_expr(v)).transpose()?;
    Ok(Some(vec![CppStmt::Return(value)]))
}

pub(super) fn if_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::If {
        cond,
        then_block,
        else_block,
    } = node
    else {
        return Ok(None);
    };
    Ok(Some(vec![CppStmt::If {
        cond: gen.lower_expr(cond)?,
        then_block: lower_stmts(gen, then_block)?,
        else_block: else_block
            .as_ref()
            .map(|b| lower_stmts(gen, b))
            .transpose()?,
    }]))
}

pub(super) fn match_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::Match { scrutinee, arms } = node else {
        return Ok(None);
    };
    lower_match(gen, scrutinee, arms, false).map(Some)
}

pub(super) fn while_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::While { cond, body } = node else {
        return Ok(None);
    };
    Ok(Some(vec![CppStmt::While {
        cond: gen.lower_expr(cond)?,
        body: lower_stmts(gen, body)?,
    }]))
}

pub(super) fn for_stmt(gen: &Generator, node: &ir::Stmt) -> RuleResult {
    let ir::Stmt::For {
        var,
        iterable,
        body,
    } = node
    else {
        return Ok(None);
    };
    Ok(Some(vec![CppStmt::ForEach {
        var: sanitize_identifier(var),
        iterable: gen.lower_expr(iterable)?,
        body: lower_stmts(gen, body)?,
    }]))
}

pub(super) fn break_stmt(_gen: &Generator, node: &ir::Stmt) -> RuleResult {
    Ok(matches!(node, ir::Stmt::Break).then(|| vec![CppStmt::Break]))
}

pub(super) fn continue_stmt(_gen: &Generator, node: &ir::Stmt) -> RuleResult {
    Ok(matches!(node, ir::Stmt::Continue).then(|| vec![CppStmt::Continue]))
}

fn lower_stmts(gen: &Generator, stmts: &[ir::Stmt]) -> Result<Vec<CppStmt>, CompileError> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        out.extend(gen.lower_stmt(stmt)?);
    }
    Ok(out)
}

/// Structural match lowering: the scrutinee binds to a reference once,
/// then the arms become an if/else chain over `std::holds_alternative`,
/// with variant fields recovered positionally through `std::get` and a
/// structured binding. A wildcard arm becomes the final else block. In
/// value position (`returns`) every arm body returns, and a non-exhaustive
/// chain ends in `std::abort()`. A guard nests inside its variant branch,
/// so a chain containing any guard is never treated as exhaustive: a
/// failed guard must reach the abort, not fall off the lambda's end.
pub(super) fn lower_match(
    gen: &Generator,
    scrutinee: &ir::Expr,
    arms: &[ir::MatchArm],
    returns: bool,
) -> Result<Vec<CppStmt>, CompileError> {
    let subject = "__subject";
    let mut out = vec![CppStmt::VarDecl {
        ty: "auto&".to_string(),
        name: subject.to_string(),
        init: gen.lower_expr(scrutinee)?,
        is_const: true,
    }];

    let exhaustive = arms.iter().all(|arm| arm.guard.is_none())
        && arms
            .iter()
            .any(|arm| matches!(arm.pattern, ir::Pattern::Wildcard));
    let mut chain: Option<Vec<CppStmt>> = None;
    for arm in arms.iter().rev() {
        let mut body = if returns {
            gen.lower_body(&arm.body, true)?
        } else {
            gen.statementize(&arm.body)?
        };
        if let Some(guard) = &arm.guard {
            body = vec![CppStmt::If {
                cond: gen.lower_expr(guard)?,
                then_block: body,
                else_block: None,
            }];
        }
        match &arm.pattern {
            ir::Pattern::Wildcard => {
                chain = Some(body);
            }
            ir::Pattern::Variant { name, bindings } => {
                let variant = sanitize_identifier(name);
                let mut block = Vec::with_capacity(body.len() + 1);
                if !bindings.is_empty() {
                    block.push(CppStmt::StructuredBinding {
                        names: bindings
                            .iter()
                            .map(|(n, _)| sanitize_identifier(n))
                            .collect(),
                        init: CppExpr::call(
                            CppExpr::ident(format!("std::get<{variant}>")),
                            vec![CppExpr::ident(subject)],
                        ),
                    });
                }
                block.extend(body);
                let cond = CppExpr::call(
                    CppExpr::ident(format!("std::holds_alternative<{variant}>")),
                    vec![CppExpr::ident(subject)],
                );
                chain = Some(vec![CppStmt::If {
                    cond,
                    then_block: block,
                    else_block: chain,
                }]);
            }
        }
    }
    out.extend(chain.unwrap_or_default());
    if returns && !exhaustive {
        out.push(CppStmt::Expr(CppExpr::call(
            CppExpr::ident("std::abort"),
            vec![],
        )));
    }
    Ok(out)
}
