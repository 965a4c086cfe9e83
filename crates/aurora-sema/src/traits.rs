//! Trait definitions, impl blocks, and static-method resolution.
//!
//! Impls are kept in registration order because resolution order is
//! observable: `Type.method()` consults the type's own extension methods
//! first, then each trait impl for that type in the order it was
//! registered, returning the first match.

use std::rc::Rc;

use aurora_common::{CompileError, Span};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::registry::FunctionSig;

/// A declared trait: a named set of required method signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitInfo {
    pub name: String,
    pub type_params: Vec<String>,
    pub methods: Vec<FunctionSig>,
}

/// One impl block. `trait_name` is `None` for a plain type extension.
#[derive(Debug, Clone)]
pub struct ImplInfo {
    pub type_name: String,
    pub trait_name: Option<String>,
    pub methods: Vec<Rc<FunctionSig>>,
}

impl ImplInfo {
    fn method(&self, name: &str) -> Option<&Rc<FunctionSig>> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Default)]
pub struct TraitRegistry {
    traits: FxHashMap<String, TraitInfo>,
    impls: Vec<ImplInfo>,
    impl_keys: FxHashSet<(String, Option<String>)>,
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_trait(&mut self, info: TraitInfo, origin: Span) -> Result<(), CompileError> {
        if self.traits.contains_key(&info.name) {
            return Err(CompileError::scope(format!(
                "trait '{}' is already defined",
                info.name
            ))
            .with_origin(origin));
        }
        self.traits.insert(info.name.clone(), info);
        Ok(())
    }

    pub fn trait_info(&self, name: &str) -> Option<&TraitInfo> {
        self.traits.get(name)
    }

    /// Register an impl block. An impl of a trait must name a known trait,
    /// and each (type, trait) pairing may be registered at most once; the
    /// same holds for a type's plain extension block.
    pub fn register_impl(&mut self, info: ImplInfo, origin: Span) -> Result<(), CompileError> {
        if let Some(trait_name) = &info.trait_name {
            if !self.traits.contains_key(trait_name) {
                return Err(CompileError::scope(format!(
                    "impl of unknown trait '{trait_name}' for '{}'",
                    info.type_name
                ))
                .with_origin(origin));
            }
        }
        let key = (info.type_name.clone(), info.trait_name.clone());
        if self.impl_keys.contains(&key) {
            let what = match &info.trait_name {
                Some(t) => format!("impl of '{t}' for '{}'", info.type_name),
                None => format!("extension of '{}'", info.type_name),
            };
            return Err(
                CompileError::scope(format!("duplicate {what}")).with_origin(origin)
            );
        }
        self.impl_keys.insert(key);
        self.impls.push(info);
        Ok(())
    }

    /// Resolve `type_name.method` to its signature: type-local extension
    /// methods first, then trait impls in registration order.
    pub fn resolve_static(&self, type_name: &str, method: &str) -> Option<&Rc<FunctionSig>> {
        self.impls
            .iter()
            .filter(|i| i.type_name == type_name && i.trait_name.is_none())
            .find_map(|i| i.method(method))
            .or_else(|| {
                self.impls
                    .iter()
                    .filter(|i| i.type_name == type_name && i.trait_name.is_some())
                    .find_map(|i| i.method(method))
            })
    }
}
