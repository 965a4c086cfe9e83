//! Expression rules.
//!
//! Each rule returns `Ok(None)` when it does not apply; the dispatcher in
//! `mod.rs` tries them in list order. Rewrite rules (pipe desugaring, the
//! module-member rewrite, static-method calls) sit ahead of the structural
//! rules they would otherwise shadow.

use aurora_common::CompileError;
use aurora_syntax as ast;

use super::types::mangle_static;
use super::Lowerer;
use crate::ir;
use crate::solve::{self, TypeMap};
use crate::ty::{Field, Ty, Variant};

type RuleResult = Result<Option<ir::Expr>, CompileError>;

/// `a |> f(b, c)` becomes `f(a, b, c)`; `a |> f` becomes `f(a)`. The
/// desugared call re-enters dispatch from the top.
pub(super) fn pipe(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Pipe { value, target } = &node.kind else {
        return Ok(None);
    };
    let call = match &target.kind {
        ast::ExprKind::Call { callee, args } => {
            let mut piped = Vec::with_capacity(args.len() + 1);
            piped.push((**value).clone());
            piped.extend(args.iter().cloned());
            ast::ExprKind::Call {
                callee: callee.clone(),
                args: piped,
            }
        }
        _ => ast::ExprKind::Call {
            callee: target.clone(),
            args: vec![(**value).clone()],
        },
    };
    lowerer
        .lower_expr(&ast::Expr::new(call, node.origin))
        .map(Some)
}

/// `Module.member` becomes a qualified-name variable reference carrying
/// the member's function type, when the qualified name resolves. An
/// unresolvable receiver falls through to ordinary member access.
pub(super) fn module_member(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Member { object, member } = &node.kind else {
        return Ok(None);
    };
    let ast::ExprKind::Var(receiver) = &object.kind else {
        return Ok(None);
    };
    if lowerer.vars.contains(receiver) {
        return Ok(None);
    }
    let qualified = format!("{receiver}.{member}");
    let Some(sig) = lowerer.functions.fetch(&qualified) else {
        return Ok(None);
    };
    let ty = sig.as_ty();
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Var(qualified),
        ty,
        node.origin,
    )))
}

/// `Type.method(args)` resolves through the trait registry and lowers to
/// a call of the mangled free function.
pub(super) fn static_method_call(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Call { callee, args } = &node.kind else {
        return Ok(None);
    };
    let ast::ExprKind::Member { object, member } = &callee.kind else {
        return Ok(None);
    };
    let ast::ExprKind::Var(type_name) = &object.kind else {
        return Ok(None);
    };
    if lowerer.vars.contains(type_name) || !lowerer.types.contains(type_name) {
        return Ok(None);
    }
    let Some(sig) = lowerer.traits.resolve_static(type_name, member).cloned() else {
        return Err(CompileError::type_error(format!(
            "type '{type_name}' has no static method '{member}'"
        ))
        .with_origin(node.origin));
    };

    let args = lower_args(lowerer, args)?;
    let arg_types: Vec<Ty> = args.iter().map(|a| a.ty.clone()).collect();
    let inst = solve::instantiate(&sig, &arg_types, node.origin)?;
    mark_moved_args(lowerer, &args);

    let mangled = mangle_static(type_name, member);
    let callee_ty = Ty::func(inst.param_types, inst.ret_type.clone());
    let callee = ir::Expr::new(ir::ExprKind::Var(mangled), callee_ty, callee.origin);
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Call {
            callee: Box::new(callee),
            args,
        },
        inst.ret_type,
        node.origin,
    )))
}

pub(super) fn call(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Call { callee, args } = &node.kind else {
        return Ok(None);
    };

    // Direct call of a registered function (including sum constructors):
    // resolve through the solver so generics instantiate.
    if let ast::ExprKind::Var(name) = &callee.kind {
        if !lowerer.vars.contains(name) {
            if let Some(sig) = lowerer.functions.fetch(name).cloned() {
                let args = lower_args(lowerer, args)?;
                let arg_types: Vec<Ty> = args.iter().map(|a| a.ty.clone()).collect();
                let inst = solve::instantiate(&sig, &arg_types, node.origin)?;
                mark_moved_args(lowerer, &args);
                let callee_ty = Ty::func(inst.param_types, inst.ret_type.clone());
                let callee =
                    ir::Expr::new(ir::ExprKind::Var(name.clone()), callee_ty, callee.origin);
                return Ok(Some(ir::Expr::new(
                    ir::ExprKind::Call {
                        callee: Box::new(callee),
                        args,
                    },
                    inst.ret_type,
                    node.origin,
                )));
            }
        }
    }

    // Indirect call through a function-typed value.
    let callee = lowerer.lower_expr(callee)?;
    let args = lower_args(lowerer, args)?;
    let ret = match &callee.ty {
        Ty::Func { params, ret } => {
            if args.len() != params.len() {
                return Err(CompileError::type_error(format!(
                    "call expects {} argument(s), got {}",
                    params.len(),
                    args.len()
                ))
                .with_origin(node.origin));
            }
            for (i, (arg, param)) in args.iter().zip(params).enumerate() {
                if !arg.ty.is_compatible(param) {
                    return Err(CompileError::type_error(format!(
                        "argument {} has type {}, expected {param}",
                        i + 1,
                        arg.ty
                    ))
                    .with_origin(arg.origin));
                }
            }
            (**ret).clone()
        }
        Ty::Error => Ty::Error,
        other => {
            return Err(CompileError::type_error(format!(
                "type '{other}' is not callable"
            ))
            .with_origin(node.origin))
        }
    };
    mark_moved_args(lowerer, &args);
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Call {
            callee: Box::new(callee),
            args,
        },
        ret,
        node.origin,
    )))
}

pub(super) fn literal(_lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Literal(lit) = &node.kind else {
        return Ok(None);
    };
    let ty = match lit {
        ast::Lit::Int(_) => Ty::i32(),
        ast::Lit::Float(_) => Ty::f64(),
        ast::Lit::Bool(_) => Ty::bool(),
        ast::Lit::Str(_) => Ty::string(),
        ast::Lit::Unit => Ty::Unit,
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Literal(lit.clone()),
        ty,
        node.origin,
    )))
}

pub(super) fn var_ref(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Var(name) = &node.kind else {
        return Ok(None);
    };
    if let Some(ty) = lowerer.vars.get(name).cloned() {
        if ty.is_move_semantic() && lowerer.vars.is_moved(name) {
            return Err(CompileError::type_error(format!(
                "use of moved value '{name}'"
            ))
            .with_origin(node.origin));
        }
        return Ok(Some(ir::Expr::new(
            ir::ExprKind::Var(name.clone()),
            ty,
            node.origin,
        )));
    }
    if let Some(sig) = lowerer.functions.fetch(name) {
        let ty = sig.as_ty();
        return Ok(Some(ir::Expr::new(
            ir::ExprKind::Var(name.clone()),
            ty,
            node.origin,
        )));
    }
    Err(CompileError::scope(format!("undefined variable '{name}'")).with_origin(node.origin))
}

pub(super) fn binary(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Binary { op, left, right } = &node.kind else {
        return Ok(None);
    };
    let left = lowerer.lower_expr(left)?;
    let right = lowerer.lower_expr(right)?;
    let ty = if op.is_logical() {
        for side in [&left, &right] {
            if !side.ty.is_bool() && !side.ty.is_error() {
                return Err(CompileError::type_error(format!(
                    "operands of '{}' must be bool, got {}",
                    op.symbol(),
                    side.ty
                ))
                .with_origin(side.origin));
            }
        }
        Ty::bool()
    } else if op.is_comparison() {
        if !left.ty.is_compatible(&right.ty) {
            return Err(CompileError::type_error(format!(
                "cannot compare {} and {}",
                left.ty, right.ty
            ))
            .with_origin(node.origin));
        }
        Ty::bool()
    } else {
        if !left.ty.is_compatible(&right.ty) {
            return Err(CompileError::type_error(format!(
                "operands of '{}' have mismatched types: {} and {}",
                op.symbol(),
                left.ty,
                right.ty
            ))
            .with_origin(node.origin));
        }
        if left.ty.is_error() {
            right.ty.clone()
        } else {
            left.ty.clone()
        }
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Binary {
            op: *op,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
        node.origin,
    )))
}

pub(super) fn unary(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Unary { op, operand } = &node.kind else {
        return Ok(None);
    };
    let operand = lowerer.lower_expr(operand)?;
    let ty = match op {
        ast::UnOp::Neg => operand.ty.clone(),
        ast::UnOp::Not => {
            if !operand.ty.is_bool() && !operand.ty.is_error() {
                return Err(CompileError::type_error(format!(
                    "operand of '!' must be bool, got {}",
                    operand.ty
                ))
                .with_origin(operand.origin));
            }
            Ty::bool()
        }
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Unary {
            op: *op,
            operand: Box::new(operand),
        },
        ty,
        node.origin,
    )))
}

pub(super) fn member_access(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Member { object, member } = &node.kind else {
        return Ok(None);
    };
    let object = lowerer.lower_expr(object)?;
    let ty = match &object.ty {
        Ty::Record { name, fields } => match fields.iter().find(|f| &f.name == member) {
            Some(field) => field.ty.clone(),
            None => {
                return Err(CompileError::type_error(format!(
                    "type '{name}' has no field '{member}'"
                ))
                .with_origin(node.origin))
            }
        },
        Ty::Error => Ty::Error,
        other => {
            return Err(CompileError::type_error(format!(
                "type '{other}' has no field '{member}'"
            ))
            .with_origin(node.origin))
        }
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Member {
            object: Box::new(object),
            member: member.clone(),
        },
        ty,
        node.origin,
    )))
}

pub(super) fn index(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Index { object, index } = &node.kind else {
        return Ok(None);
    };
    let object = lowerer.lower_expr(object)?;
    let index = lowerer.lower_expr(index)?;
    match &index.ty {
        Ty::Prim(name) if name == "i32" || name == "i64" => {}
        Ty::Error => {}
        other => {
            return Err(CompileError::type_error(format!(
                "array index must be an integer, got {other}"
            ))
            .with_origin(index.origin))
        }
    }
    let ty = match &object.ty {
        Ty::Array(elem) => (**elem).clone(),
        Ty::Error => Ty::Error,
        other => {
            return Err(CompileError::type_error(format!(
                "type '{other}' cannot be indexed"
            ))
            .with_origin(node.origin))
        }
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Index {
            object: Box::new(object),
            index: Box::new(index),
        },
        ty,
        node.origin,
    )))
}

pub(super) fn array(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Array(elems) = &node.kind else {
        return Ok(None);
    };
    let elems = elems
        .iter()
        .map(|e| lowerer.lower_expr(e))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(first) = elems.first() else {
        return Err(CompileError::type_error(
            "cannot infer the element type of an empty array",
        )
        .with_origin(node.origin));
    };
    let elem_ty = first.ty.clone();
    for elem in &elems[1..] {
        if !elem.ty.is_compatible(&elem_ty) {
            return Err(CompileError::type_error(format!(
                "array elements have mismatched types: {elem_ty} and {}",
                elem.ty
            ))
            .with_origin(elem.origin));
        }
    }
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Array(elems),
        Ty::array(elem_ty),
        node.origin,
    )))
}

pub(super) fn record(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Record { name, fields } = &node.kind else {
        return Ok(None);
    };
    let mut lowered = Vec::with_capacity(fields.len());
    for (field, value) in fields {
        lowered.push((field.clone(), lowerer.lower_expr(value)?));
    }

    let ty = match name {
        Some(name) => {
            let declared = match lowerer.types.fetch_ty(name).cloned() {
                Some(Ty::Record { fields, .. }) => fields,
                Some(other) => {
                    return Err(CompileError::type_error(format!(
                        "'{name}' is not a record type (it is {other})"
                    ))
                    .with_origin(node.origin))
                }
                None => {
                    return Err(CompileError::scope(format!(
                        "undefined record type '{name}'"
                    ))
                    .with_origin(node.origin))
                }
            };
            for field in &declared {
                match lowered.iter().find(|(n, _)| n == &field.name) {
                    Some((_, value)) if value.ty.is_compatible(&field.ty) => {}
                    Some((_, value)) => {
                        return Err(CompileError::type_error(format!(
                            "field '{}' of '{name}' expects {}, got {}",
                            field.name, field.ty, value.ty
                        ))
                        .with_origin(value.origin))
                    }
                    None => {
                        return Err(CompileError::type_error(format!(
                            "missing field '{}' in record '{name}'",
                            field.name
                        ))
                        .with_origin(node.origin))
                    }
                }
            }
            for (provided, _) in &lowered {
                if !declared.iter().any(|f| &f.name == provided) {
                    return Err(CompileError::type_error(format!(
                        "record '{name}' has no field '{provided}'"
                    ))
                    .with_origin(node.origin));
                }
            }
            lowerer
                .types
                .fetch_ty(name)
                .cloned()
                .unwrap_or(Ty::Error)
        }
        None => Ty::Record {
            name: String::new(),
            fields: lowered
                .iter()
                .map(|(n, v)| Field {
                    name: n.clone(),
                    ty: v.ty.clone(),
                })
                .collect(),
        },
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Record {
            name: name.clone(),
            fields: lowered,
        },
        ty,
        node.origin,
    )))
}

/// Blocks snapshot the variable scope on entry and restore it on every
/// exit path, so block-local bindings never escape.
pub(super) fn block(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Block { stmts, result } = &node.kind else {
        return Ok(None);
    };
    let snapshot = lowerer.vars.snapshot();
    let lowered = block_inner(lowerer, stmts, result.as_deref(), node);
    lowerer.vars.restore(snapshot);
    let (stmts, result) = lowered?;
    let ty = result.ty.clone();
    Ok(Some(ir::Expr::new(
        ir::ExprKind::Block {
            stmts,
            result: Box::new(result),
        },
        ty,
        node.origin,
    )))
}

fn block_inner(
    lowerer: &mut Lowerer<'_>,
    stmts: &[ast::Stmt],
    result: Option<&ast::Expr>,
    node: &ast::Expr,
) -> Result<(Vec<ir::Stmt>, ir::Expr), CompileError> {
    let mut lowered = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        lowered.extend(lowerer.lower_stmt(stmt)?);
    }
    let result = match result {
        Some(expr) => lowerer.lower_expr(expr)?,
        None => ir::Expr::unit(node.origin),
    };
    Ok((lowered, result))
}

pub(super) fn if_expr(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::If {
        cond,
        then_branch,
        else_branch,
    } = &node.kind
    else {
        return Ok(None);
    };
    let cond = lowerer.lower_expr(cond)?;
    if !cond.ty.is_bool() && !cond.ty.is_error() {
        return Err(CompileError::type_error(format!(
            "if condition must be bool, got {}",
            cond.ty
        ))
        .with_origin(cond.origin));
    }
    let then_branch = lowerer.lower_expr(then_branch)?;
    let else_branch = else_branch
        .as_ref()
        .map(|e| lowerer.lower_expr(e))
        .transpose()?;
    let ty = match &else_branch {
        Some(else_branch) => {
            if !then_branch.ty.is_compatible(&else_branch.ty) {
                return Err(CompileError::type_error(format!(
                    "if branches have mismatched types: {} and {}",
                    then_branch.ty, else_branch.ty
                ))
                .with_origin(node.origin));
            }
            if then_branch.ty.is_error() {
                else_branch.ty.clone()
            } else {
                then_branch.ty.clone()
            }
        }
        None => Ty::Unit,
    };
    Ok(Some(ir::Expr::new(
        ir::ExprKind::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        },
        ty,
        node.origin,
    )))
}

pub(super) fn match_expr(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::Match { scrutinee, arms } = &node.kind else {
        return Ok(None);
    };
    let scrutinee = lowerer.lower_expr(scrutinee)?;

    // (sum name, variants, type-argument substitution); None when the
    // scrutinee is already error-typed and checks are suppressed.
    let shape: Option<(String, Vec<Variant>, TypeMap)> = match &scrutinee.ty {
        Ty::Sum { name, variants } => Some((name.clone(), variants.clone(), TypeMap::default())),
        Ty::Generic { base, args, .. } => match &**base {
            Ty::Sum { name, variants } => {
                let mut map = TypeMap::default();
                if let Some(entry) = lowerer.types.fetch(name) {
                    for (param, arg) in entry.type_params.iter().zip(args) {
                        map.insert(param.clone(), arg.clone());
                    }
                }
                Some((name.clone(), variants.clone(), map))
            }
            _ => {
                return Err(CompileError::type_error(format!(
                    "cannot match on type '{}'",
                    scrutinee.ty
                ))
                .with_origin(scrutinee.origin))
            }
        },
        Ty::Error => None,
        other => {
            return Err(CompileError::type_error(format!(
                "cannot match on type '{other}'"
            ))
            .with_origin(scrutinee.origin))
        }
    };

    if arms.is_empty() {
        return Err(
            CompileError::type_error("match expression has no arms").with_origin(node.origin)
        );
    }

    let mut lowered_arms = Vec::with_capacity(arms.len());
    for arm in arms {
        let snapshot = lowerer.vars.snapshot();
        let lowered = lower_arm(lowerer, arm, &shape);
        lowerer.vars.restore(snapshot);
        lowered_arms.push(lowered?);
    }

    let mut ty = lowered_arms[0].body.ty.clone();
    for arm in &lowered_arms[1..] {
        if !arm.body.ty.is_compatible(&ty) {
            return Err(CompileError::type_error(format!(
                "match arms have mismatched types: {ty} and {}",
                arm.body.ty
            ))
            .with_origin(arm.body.origin));
        }
        if ty.is_error() {
            ty = arm.body.ty.clone();
        }
    }

    Ok(Some(ir::Expr::new(
        ir::ExprKind::Match {
            scrutinee: Box::new(scrutinee),
            arms: lowered_arms,
        },
        ty,
        node.origin,
    )))
}

fn lower_arm(
    lowerer: &mut Lowerer<'_>,
    arm: &ast::MatchArm,
    shape: &Option<(String, Vec<Variant>, TypeMap)>,
) -> Result<ir::MatchArm, CompileError> {
    let pattern = match &arm.pattern {
        ast::Pattern::Wildcard => ir::Pattern::Wildcard,
        ast::Pattern::Variant { name, bindings } => {
            let bound: Vec<(String, Ty)> = match shape {
                Some((sum_name, variants, map)) => {
                    let Some(variant) = variants.iter().find(|v| &v.name == name) else {
                        return Err(CompileError::type_error(format!(
                            "'{sum_name}' has no variant '{name}'"
                        ))
                        .with_origin(arm.origin));
                    };
                    if bindings.len() != variant.fields.len() {
                        return Err(CompileError::type_error(format!(
                            "variant '{name}' has {} field(s), pattern binds {}",
                            variant.fields.len(),
                            bindings.len()
                        ))
                        .with_origin(arm.origin));
                    }
                    bindings
                        .iter()
                        .zip(&variant.fields)
                        .map(|(b, f)| (b.clone(), solve::substitute(&f.ty, map)))
                        .collect()
                }
                // Error-typed scrutinee: bind permissively, report nothing.
                None => bindings.iter().map(|b| (b.clone(), Ty::Error)).collect(),
            };
            for (binding, ty) in &bound {
                lowerer.vars.set(binding.clone(), ty.clone());
            }
            ir::Pattern::Variant {
                name: name.clone(),
                bindings: bound,
            }
        }
    };
    let guard = arm
        .guard
        .as_ref()
        .map(|g| lowerer.lower_expr(g))
        .transpose()?;
    if let Some(guard) = &guard {
        if !guard.ty.is_bool() && !guard.ty.is_error() {
            return Err(CompileError::type_error(format!(
                "match guard must be bool, got {}",
                guard.ty
            ))
            .with_origin(guard.origin));
        }
    }
    let body = lowerer.lower_expr(&arm.body)?;
    Ok(ir::MatchArm {
        pattern,
        guard,
        body,
    })
}

pub(super) fn for_loop(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::For {
        var,
        iterable,
        body,
    } = &node.kind
    else {
        return Ok(None);
    };
    let iterable = lowerer.lower_expr(iterable)?;
    let elem_ty = match &iterable.ty {
        Ty::Array(elem) => (**elem).clone(),
        Ty::Error => Ty::Error,
        other => {
            return Err(CompileError::type_error(format!(
                "for-loop iterable must be an array, got {other}"
            ))
            .with_origin(iterable.origin))
        }
    };

    // The loop variable temporarily shadows any outer binding of the same
    // name; the previous binding (or its absence) is restored afterwards.
    let previous = lowerer.vars.get(var).cloned();
    lowerer.vars.set(var.clone(), elem_ty);
    lowerer.loop_depth += 1;
    let body = lowerer.lower_expr(body);
    lowerer.loop_depth -= 1;
    match previous {
        Some(ty) => lowerer.vars.set(var.clone(), ty),
        None => lowerer.vars.delete(var),
    }
    let body = lowerer.expr_into_stmts(body?);

    Ok(Some(ir::Expr::new(
        ir::ExprKind::For {
            var: var.clone(),
            iterable: Box::new(iterable),
            body,
        },
        Ty::Unit,
        node.origin,
    )))
}

pub(super) fn while_loop(lowerer: &mut Lowerer<'_>, node: &ast::Expr) -> RuleResult {
    let ast::ExprKind::While { cond, body } = &node.kind else {
        return Ok(None);
    };
    let cond = lowerer.lower_expr(cond)?;
    if !cond.ty.is_bool() && !cond.ty.is_error() {
        return Err(CompileError::type_error(format!(
            "while condition must be bool, got {}",
            cond.ty
        ))
        .with_origin(cond.origin));
    }
    lowerer.loop_depth += 1;
    let body = lowerer.lower_expr(body);
    lowerer.loop_depth -= 1;
    let body = lowerer.expr_into_stmts(body?);
    Ok(Some(ir::Expr::new(
        ir::ExprKind::While {
            cond: Box::new(cond),
            body,
        },
        Ty::Unit,
        node.origin,
    )))
}

fn lower_args(
    lowerer: &mut Lowerer<'_>,
    args: &[ast::Expr],
) -> Result<Vec<ir::Expr>, CompileError> {
    args.iter().map(|a| lowerer.lower_expr(a)).collect()
}

/// Passing a move-semantic binding by value transfers ownership: the
/// binding is marked moved and later reads fail.
fn mark_moved_args(lowerer: &mut Lowerer<'_>, args: &[ir::Expr]) {
    for arg in args {
        if let ir::ExprKind::Var(name) = &arg.kind {
            if arg.ty.is_move_semantic() {
                lowerer.vars.mark_moved(name.clone());
            }
        }
    }
}
