//! Function and type symbol tables.
//!
//! Signatures are stored behind `Rc` so that an aliased import and its
//! canonical name observably share one signature object.

use std::rc::Rc;

use aurora_common::{CompileError, Span};
use rustc_hash::FxHashMap;

use crate::ty::Ty;

/// The callable shape of one function, as seen by call resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub name: String,
    pub type_params: Vec<String>,
    pub param_types: Vec<Ty>,
    pub ret_type: Ty,
}

impl FunctionSig {
    pub fn new(
        name: impl Into<String>,
        type_params: Vec<String>,
        param_types: Vec<Ty>,
        ret_type: Ty,
    ) -> Self {
        FunctionSig {
            name: name.into(),
            type_params,
            param_types,
            ret_type,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.param_types.len()
    }

    /// The function type this signature denotes.
    pub fn as_ty(&self) -> Ty {
        Ty::func(self.param_types.clone(), self.ret_type.clone())
    }
}

/// Name-keyed table of function signatures.
///
/// Re-registering an identical signature is a no-op; registering a
/// different signature under a taken name is a scope error. Aliases map a
/// second name onto the *same* `Rc` entry.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    entries: FxHashMap<String, Rc<FunctionSig>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sig: FunctionSig, origin: Span) -> Result<(), CompileError> {
        self.register_rc(Rc::new(sig), origin)
    }

    pub fn register_rc(
        &mut self,
        sig: Rc<FunctionSig>,
        origin: Span,
    ) -> Result<(), CompileError> {
        if let Some(existing) = self.entries.get(&sig.name) {
            if **existing == *sig {
                return Ok(());
            }
            return Err(CompileError::scope(format!(
                "function '{}' is already defined with a different signature",
                sig.name
            ))
            .with_origin(origin));
        }
        self.entries.insert(sig.name.clone(), sig);
        Ok(())
    }

    /// Bind `alias` to the signature registered under `name`. Both names
    /// resolve to the same object afterwards.
    pub fn register_alias(
        &mut self,
        name: &str,
        alias: impl Into<String>,
        origin: Span,
    ) -> Result<(), CompileError> {
        let alias = alias.into();
        let sig = self.entries.get(name).cloned().ok_or_else(|| {
            CompileError::scope(format!("cannot alias unknown function '{name}'"))
                .with_origin(origin)
        })?;
        if let Some(existing) = self.entries.get(&alias) {
            if Rc::ptr_eq(existing, &sig) {
                return Ok(());
            }
            return Err(CompileError::scope(format!(
                "function '{alias}' is already defined with a different signature"
            ))
            .with_origin(origin));
        }
        self.entries.insert(alias, sig);
        Ok(())
    }

    pub fn fetch(&self, name: &str) -> Option<&Rc<FunctionSig>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A declared type shape with its formal parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub type_params: Vec<String>,
    pub ty: Ty,
}

/// Name-keyed table of declared types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: FxHashMap<String, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        type_params: Vec<String>,
        ty: Ty,
        origin: Span,
    ) -> Result<(), CompileError> {
        let name = name.into();
        let entry = TypeEntry { type_params, ty };
        if let Some(existing) = self.entries.get(&name) {
            if *existing == entry {
                return Ok(());
            }
            return Err(CompileError::scope(format!(
                "type '{name}' is already defined"
            ))
            .with_origin(origin));
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Replace an entry with a refined shape (full resolution after a
    /// pre-registration pass that may have used placeholders).
    pub fn redefine(&mut self, name: impl Into<String>, type_params: Vec<String>, ty: Ty) {
        self.entries.insert(name.into(), TypeEntry { type_params, ty });
    }

    pub fn fetch(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn fetch_ty(&self, name: &str) -> Option<&Ty> {
        self.entries.get(name).map(|e| &e.ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(name: &str, params: Vec<Ty>, ret: Ty) -> FunctionSig {
        FunctionSig::new(name, vec![], params, ret)
    }

    #[test]
    fn duplicate_identical_registration_is_idempotent() {
        let mut reg = FunctionRegistry::new();
        reg.register(sig("add", vec![Ty::i32(), Ty::i32()], Ty::i32()), Span::synthetic())
            .unwrap();
        reg.register(sig("add", vec![Ty::i32(), Ty::i32()], Ty::i32()), Span::synthetic())
            .unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn conflicting_registration_is_an_error() {
        let mut reg = FunctionRegistry::new();
        reg.register(sig("add", vec![Ty::i32()], Ty::i32()), Span::synthetic())
            .unwrap();
        let err = reg
            .register(sig("add", vec![Ty::f64()], Ty::f64()), Span::synthetic())
            .unwrap_err();
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn alias_shares_the_signature_object() {
        let mut reg = FunctionRegistry::new();
        reg.register(sig("sqrt", vec![Ty::f64()], Ty::f64()), Span::synthetic())
            .unwrap();
        reg.register_alias("sqrt", "M.sqrt", Span::synthetic()).unwrap();
        let canonical = reg.fetch("sqrt").unwrap();
        let aliased = reg.fetch("M.sqrt").unwrap();
        assert!(Rc::ptr_eq(canonical, aliased));
    }

    #[test]
    fn alias_of_unknown_function_fails() {
        let mut reg = FunctionRegistry::new();
        assert!(reg
            .register_alias("missing", "m", Span::synthetic())
            .is_err());
    }

    #[test]
    fn redefine_replaces_a_placeholder_shape() {
        let mut reg = TypeRegistry::new();
        reg.register("Meters", vec![], Ty::Opaque("Meters".into()), Span::synthetic())
            .unwrap();
        reg.redefine("Meters", vec![], Ty::f64());
        assert_eq!(reg.fetch_ty("Meters"), Some(&Ty::f64()));
    }
}
