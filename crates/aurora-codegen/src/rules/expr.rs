//! Expression lowering rules: typed IR expressions to C++ expressions.
//!
//! Value-producing block-like constructs (blocks, matches, unit-typed
//! conditionals in value position) lower to immediately-invoked lambdas;
//! value-producing `if` lowers to the ternary operator.

use aurora_common::CompileError;
use aurora_sema::ir;
use aurora_sema::Ty;

use super::{stmt, Generator};
use crate::cpp::{map_type, sanitize_identifier, CppExpr};

type RuleResult = Result<Option<CppExpr>, CompileError>;

pub(super) fn literal(_gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Literal(lit) = &node.kind else {
        return Ok(None);
    };
    let spelled = match lit {
        ir::Lit::Int(n) => n.to_string(),
        ir::Lit::Float(f) => format!("{f:?}"),
        ir::Lit::Bool(b) => b.to_string(),
        ir::Lit::Str(s) => format!("{s:?}"),
        ir::Lit::Unit => {
            return Err(CompileError::internal("unit literal in value position")
                .with_origin(node.origin))
        }
    };
    Ok(Some(CppExpr::Literal(spelled)))
}

pub(super) fn var(_gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Var(name) = &node.kind else {
        return Ok(None);
    };
    Ok(Some(CppExpr::ident(sanitize_identifier(name))))
}

pub(super) fn binary(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Binary { op, left, right } = &node.kind else {
        return Ok(None);
    };
    Ok(Some(CppExpr::Binary {
        op: op.symbol().to_string(),
        left: Box::new(gen.lower_expr(left)?),
        right: Box::new(gen.lower_expr(right)?),
    }))
}

pub(super) fn unary(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Unary { op, operand } = &node.kind else {
        return Ok(None);
    };
    Ok(Some(CppExpr::Unary {
        op: op.symbol().to_string(),
        operand: Box::new(gen.lower_expr(operand)?),
    }))
}

pub(super) fn call(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Call { callee, args } = &node.kind else {
        return Ok(None);
    };
    let callee = gen.lower_expr(callee)?;
    let args = args
        .iter()
        .map(|a| gen.lower_expr(a))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(CppExpr::call(callee, args)))
}

pub(super) fn member(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Member { object, member } = &node.kind else {
        return Ok(None);
    };
    Ok(Some(CppExpr::Member {
        object: Box::new(gen.lower_expr(object)?),
        field: sanitize_identifier(member),
    }))
}

pub(super) fn index(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Index { object, index } = &node.kind else {
        return Ok(None);
    };
    Ok(Some(CppExpr::Index {
        object: Box::new(gen.lower_expr(object)?),
        index: Box::new(gen.lower_expr(index)?),
    }))
}

pub(super) fn array(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Array(elems) = &node.kind else {
        return Ok(None);
    };
    let values = elems
        .iter()
        .map(|e| gen.lower_expr(e))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(CppExpr::InitList {
        name: map_type(&node.ty),
        values,
    }))
}

/// Records lower to brace initialization; values are emitted in declared
/// field order, whatever order the source literal used.
pub(super) fn record(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Record { fields, .. } = &node.kind else {
        return Ok(None);
    };
    let mut ordered: Vec<&ir::Expr> = Vec::with_capacity(fields.len());
    match &node.ty {
        Ty::Record {
            fields: declared, ..
        } if !declared.is_empty() => {
            for decl in declared {
                if let Some((_, value)) = fields.iter().find(|(n, _)| n == &decl.name) {
                    ordered.push(value);
                }
            }
        }
        _ => ordered.extend(fields.iter().map(|(_, v)| v)),
    }
    let values = ordered
        .into_iter()
        .map(|v| gen.lower_expr(v))
        .collect::<Result<Vec<_>, _>>()?;
    let name = match &node.ty {
        Ty::Record { name, .. } if !name.is_empty() => sanitize_identifier(name),
        _ => String::new(),
    };
    Ok(Some(CppExpr::InitList { name, values }))
}

pub(super) fn block(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Block { .. } = &node.kind else {
        return Ok(None);
    };
    let stmts = gen.lower_body(node, !node.ty.is_unit())?;
    Ok(Some(CppExpr::Iife(stmts)))
}

pub(super) fn if_expr(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::If {
        cond,
        then_branch,
        else_branch,
    } = &node.kind
    else {
        return Ok(None);
    };
    if node.ty.is_unit() {
        return Ok(Some(CppExpr::Iife(gen.statementize(node)?)));
    }
    let Some(else_branch) = else_branch else {
        return Err(CompileError::internal(
            "value-producing if without an else branch",
        )
        .with_origin(node.origin));
    };
    Ok(Some(CppExpr::Ternary {
        cond: Box::new(gen.lower_expr(cond)?),
        then_value: Box::new(gen.lower_expr(then_branch)?),
        else_value: Box::new(gen.lower_expr(else_branch)?),
    }))
}

pub(super) fn match_expr(gen: &Generator, node: &ir::Expr) -> RuleResult {
    let ir::ExprKind::Match { scrutinee, arms } = &node.kind else {
        return Ok(None);
    };
    let stmts = stmt::lower_match(gen, scrutinee, arms, !node.ty.is_unit())?;
    Ok(Some(CppExpr::Iife(stmts)))
}

pub(super) fn loop_expr(gen: &Generator, node: &ir::Expr) -> RuleResult {
    match &node.kind {
        ir::ExprKind::While { .. } | ir::ExprKind::For { .. } => {
            Ok(Some(CppExpr::Iife(gen.statementize(node)?)))
        }
        _ => Ok(None),
    }
}
