//! Generic call resolution.
//!
//! Unification is a single structural pass over *named* type variables; the
//! source type language is first-order and non-recursive at the variable
//! level, so no occurs check or union-find table is needed.

use aurora_common::{CompileError, Span};
use rustc_hash::FxHashMap;

use crate::registry::FunctionSig;
use crate::ty::Ty;

/// A substitution mapping type-parameter names to concrete types.
pub type TypeMap = FxHashMap<String, Ty>;

/// The result of resolving a call against a (possibly generic) signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Instantiation {
    pub type_map: TypeMap,
    pub param_types: Vec<Ty>,
    pub ret_type: Ty,
}

/// Structurally match `declared` against `actual`, binding any type
/// variable in `declared` whose name is listed in `vars`. First binding
/// wins; a later conflicting occurrence is left to the per-argument
/// compatibility check to report.
pub fn unify(declared: &Ty, actual: &Ty, vars: &[String], map: &mut TypeMap) {
    match (declared, actual) {
        (Ty::Var(name), _) if vars.iter().any(|v| v == name) => {
            map.entry(name.clone()).or_insert_with(|| actual.clone());
        }
        (Ty::Array(d), Ty::Array(a)) => unify(d, a, vars, map),
        (
            Ty::Generic {
                base: db, args: da, ..
            },
            Ty::Generic {
                base: ab, args: aa, ..
            },
        ) => {
            unify(db, ab, vars, map);
            for (d, a) in da.iter().zip(aa) {
                unify(d, a, vars, map);
            }
        }
        (
            Ty::Func {
                params: dp,
                ret: dr,
            },
            Ty::Func {
                params: ap,
                ret: ar,
            },
        ) => {
            for (d, a) in dp.iter().zip(ap) {
                unify(d, a, vars, map);
            }
            unify(dr, ar, vars, map);
        }
        _ => {}
    }
}

/// Apply a substitution to a type, leaving unbound variables in place.
pub fn substitute(ty: &Ty, map: &TypeMap) -> Ty {
    match ty {
        Ty::Var(name) => map.get(name).cloned().unwrap_or_else(|| ty.clone()),
        Ty::Array(elem) => Ty::Array(Box::new(substitute(elem, map))),
        Ty::Generic {
            base,
            args,
            ownership,
        } => Ty::Generic {
            base: Box::new(substitute(base, map)),
            args: args.iter().map(|a| substitute(a, map)).collect(),
            ownership: *ownership,
        },
        Ty::Func { params, ret } => Ty::Func {
            params: params.iter().map(|p| substitute(p, map)).collect(),
            ret: Box::new(substitute(ret, map)),
        },
        Ty::Record { name, fields } => Ty::Record {
            name: name.clone(),
            fields: fields
                .iter()
                .map(|f| crate::ty::Field {
                    name: f.name.clone(),
                    ty: substitute(&f.ty, map),
                })
                .collect(),
        },
        Ty::Sum { name, variants } => Ty::Sum {
            name: name.clone(),
            variants: variants
                .iter()
                .map(|v| crate::ty::Variant {
                    name: v.name.clone(),
                    fields: v
                        .fields
                        .iter()
                        .map(|f| crate::ty::Field {
                            name: f.name.clone(),
                            ty: substitute(&f.ty, map),
                        })
                        .collect(),
                })
                .collect(),
        },
        _ => ty.clone(),
    }
}

/// Infer the substitution for a signature's type parameters from the
/// call-site argument types.
pub fn infer_type_arguments(sig: &FunctionSig, arg_types: &[Ty]) -> TypeMap {
    let mut map = TypeMap::default();
    for (declared, actual) in sig.param_types.iter().zip(arg_types) {
        unify(declared, actual, &sig.type_params, &mut map);
    }
    map
}

/// Resolve a call site against a signature.
///
/// Checks arity, infers and applies the type-parameter substitution (the
/// identity for non-generic signatures), and verifies each argument is
/// assignable to its substituted parameter type. The error sentinel passes
/// every compatibility check unconditionally.
pub fn instantiate(
    sig: &FunctionSig,
    arg_types: &[Ty],
    origin: Span,
) -> Result<Instantiation, CompileError> {
    if arg_types.len() != sig.param_types.len() {
        return Err(CompileError::type_error(format!(
            "function '{}' expects {} argument(s), got {}",
            sig.name,
            sig.param_types.len(),
            arg_types.len()
        ))
        .with_origin(origin));
    }

    let (type_map, param_types, ret_type) = if sig.is_generic() {
        let map = infer_type_arguments(sig, arg_types);
        let params = sig
            .param_types
            .iter()
            .map(|p| substitute(p, &map))
            .collect::<Vec<_>>();
        let ret = substitute(&sig.ret_type, &map);
        (map, params, ret)
    } else {
        (
            TypeMap::default(),
            sig.param_types.clone(),
            sig.ret_type.clone(),
        )
    };

    for (i, (arg, param)) in arg_types.iter().zip(&param_types).enumerate() {
        if !arg.is_compatible(param) {
            return Err(CompileError::type_error(format!(
                "argument {} of '{}' expects {param}, got {arg}",
                i + 1,
                sig.name
            ))
            .with_origin(origin));
        }
    }

    Ok(Instantiation {
        type_map,
        param_types,
        ret_type,
    })
}
