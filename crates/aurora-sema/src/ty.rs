//! Type representation for the Aurora semantic stage.
//!
//! Defines the core `Ty` enum covering primitives, records, sum types,
//! generics, functions, arrays, opaque extern types, named type variables,
//! and the error sentinel used for cascade suppression.

use std::fmt;

/// Ownership classification of a generic wrapper type.
///
/// Fixed at type-construction time from the wrapper's base name; move
/// tracking consults this field and never re-inspects names afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Move-semantic wrapper (`Owned<T>`): reading after a move is an error.
    Owned,
    /// Reference-counted wrapper (`Shared<T>`): freely copyable.
    Shared,
    /// Plain value type.
    Value,
}

/// A named field of a record or sum-type variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Ty,
}

/// One variant of a sum type.
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub name: String,
    pub fields: Vec<Field>,
}

/// An Aurora type.
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    /// A primitive: `i32`, `i64`, `f64`, `bool`, `string`.
    Prim(String),
    /// The unit type `()` -- expressions evaluated for effect only.
    Unit,
    /// A nominal record type.
    Record { name: String, fields: Vec<Field> },
    /// A nominal sum type with its variants.
    Sum { name: String, variants: Vec<Variant> },
    /// A generic application: `Owned<T>`, `Option<i32>`.
    Generic {
        base: Box<Ty>,
        args: Vec<Ty>,
        ownership: Ownership,
    },
    /// A function type.
    Func { params: Vec<Ty>, ret: Box<Ty> },
    /// `[T]`
    Array(Box<Ty>),
    /// A type without known structure (extern/stdlib only).
    Opaque(String),
    /// A named type variable from a generic signature.
    Var(String),
    /// The error sentinel: compatible with every type, used to suppress
    /// cascading reports downstream of an already-reported failure.
    Error,
}

impl Ty {
    pub fn prim(name: impl Into<String>) -> Ty {
        Ty::Prim(name.into())
    }

    pub fn i32() -> Ty {
        Ty::prim("i32")
    }

    pub fn i64() -> Ty {
        Ty::prim("i64")
    }

    pub fn f64() -> Ty {
        Ty::prim("f64")
    }

    pub fn bool() -> Ty {
        Ty::prim("bool")
    }

    pub fn string() -> Ty {
        Ty::prim("string")
    }

    pub fn var(name: impl Into<String>) -> Ty {
        Ty::Var(name.into())
    }

    pub fn array(elem: Ty) -> Ty {
        Ty::Array(Box::new(elem))
    }

    pub fn func(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Func {
            params,
            ret: Box::new(ret),
        }
    }

    /// Build a generic application, classifying ownership from the base
    /// name once, here.
    pub fn generic(base: Ty, args: Vec<Ty>) -> Ty {
        let ownership = match base.name() {
            Some("Owned") => Ownership::Owned,
            Some("Shared") => Ownership::Shared,
            _ => Ownership::Value,
        };
        Ty::Generic {
            base: Box::new(base),
            args,
            ownership,
        }
    }

    /// The nominal name of this type, when it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Ty::Prim(name) | Ty::Opaque(name) | Ty::Var(name) => Some(name),
            Ty::Record { name, .. } | Ty::Sum { name, .. } => Some(name),
            Ty::Generic { base, .. } => base.name(),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Ty::Unit)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Ty::Prim(name) if name == "bool")
    }

    /// Whether bindings of this type participate in moved-tracking.
    pub fn is_move_semantic(&self) -> bool {
        matches!(
            self,
            Ty::Generic {
                ownership: Ownership::Owned,
                ..
            }
        )
    }

    /// Whether this type cannot be produced at compile time in the target
    /// language (strings and collections are not C++20 literal types).
    pub fn is_non_literal(&self) -> bool {
        match self {
            Ty::Prim(name) => name == "string",
            Ty::Array(_) => true,
            Ty::Generic { base, .. } => matches!(
                base.name(),
                Some("Vec") | Some("HashMap") | Some("HashSet") | Some("Array")
            ),
            _ => false,
        }
    }

    /// Whether any type variable remains anywhere inside this type.
    pub fn contains_vars(&self) -> bool {
        match self {
            Ty::Var(_) => true,
            Ty::Generic { base, args, .. } => {
                base.contains_vars() || args.iter().any(Ty::contains_vars)
            }
            Ty::Array(elem) => elem.contains_vars(),
            Ty::Func { params, ret } => {
                params.iter().any(Ty::contains_vars) || ret.contains_vars()
            }
            Ty::Record { fields, .. } => fields.iter().any(|f| f.ty.contains_vars()),
            Ty::Sum { variants, .. } => variants
                .iter()
                .any(|v| v.fields.iter().any(|f| f.ty.contains_vars())),
            _ => false,
        }
    }

    /// Assignability check. The error sentinel is compatible with every
    /// type in both directions; everything else matches structurally, with
    /// nominal matching for records and sums.
    pub fn is_compatible(&self, other: &Ty) -> bool {
        match (self, other) {
            (Ty::Error, _) | (_, Ty::Error) => true,
            // An unresolved type variable accepts anything; a residual
            // variable means a reported failure already exists upstream.
            (Ty::Var(_), _) | (_, Ty::Var(_)) => true,
            (Ty::Prim(a), Ty::Prim(b)) => a == b,
            (Ty::Unit, Ty::Unit) => true,
            (Ty::Record { name: a, .. }, Ty::Record { name: b, .. }) => a == b,
            (Ty::Sum { name: a, .. }, Ty::Sum { name: b, .. }) => a == b,
            (Ty::Opaque(a), Ty::Opaque(b)) => a == b,
            // A bare sum name is compatible with its generic application
            // (Option vs Option<i32>) -- arises from constructor returns.
            (Ty::Sum { name, .. }, Ty::Generic { base, .. })
            | (Ty::Generic { base, .. }, Ty::Sum { name, .. }) => {
                base.name() == Some(name.as_str())
            }
            (
                Ty::Generic {
                    base: b1, args: a1, ..
                },
                Ty::Generic {
                    base: b2, args: a2, ..
                },
            ) => {
                b1.is_compatible(b2)
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2).all(|(x, y)| x.is_compatible(y))
            }
            (Ty::Array(a), Ty::Array(b)) => a.is_compatible(b),
            (
                Ty::Func {
                    params: p1,
                    ret: r1,
                },
                Ty::Func {
                    params: p2,
                    ret: r2,
                },
            ) => {
                p1.len() == p2.len()
                    && p1.iter().zip(p2).all(|(x, y)| x.is_compatible(y))
                    && r1.is_compatible(r2)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Prim(name) | Ty::Opaque(name) | Ty::Var(name) => write!(f, "{name}"),
            Ty::Unit => write!(f, "()"),
            Ty::Record { name, .. } | Ty::Sum { name, .. } => write!(f, "{name}"),
            Ty::Generic { base, args, .. } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Ty::Array(elem) => write!(f, "[{elem}]"),
            Ty::Func { params, ret } => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {ret}")
            }
            Ty::Error => write!(f, "<error>"),
        }
    }
}
