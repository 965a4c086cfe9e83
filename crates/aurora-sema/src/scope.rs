//! The variable-scope registry.
//!
//! One flat name-to-type table with snapshot/restore for lexical scoping
//! (blocks, match arms, loop bodies), plus initializer tracking for `let`
//! inference and a moved-set for move-semantic bindings.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ir;
use crate::ty::Ty;

/// A full copy of the registry state, restored on scope exit. Snapshots
/// nest strictly: restore order is the reverse of capture order.
#[derive(Debug, Clone)]
pub struct VarSnapshot {
    types: FxHashMap<String, Ty>,
    initializers: FxHashMap<String, ir::Expr>,
    moved: FxHashSet<String>,
}

/// Tracks the type, initializer, and moved state of every binding in the
/// current lexical scope.
#[derive(Debug, Default)]
pub struct VarTypeRegistry {
    types: FxHashMap<String, Ty>,
    initializers: FxHashMap<String, ir::Expr>,
    moved: FxHashSet<String>,
}

impl VarTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, ty: Ty) {
        let name = name.into();
        self.moved.remove(&name);
        self.types.insert(name, ty);
    }

    /// Record a binding together with the expression that initialized it.
    pub fn set_with_initializer(&mut self, name: impl Into<String>, ty: Ty, init: ir::Expr) {
        let name = name.into();
        self.initializers.insert(name.clone(), init);
        self.set(name, ty);
    }

    pub fn get(&self, name: &str) -> Option<&Ty> {
        self.types.get(name)
    }

    pub fn initializer(&self, name: &str) -> Option<&ir::Expr> {
        self.initializers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn delete(&mut self, name: &str) {
        self.types.remove(name);
        self.initializers.remove(name);
        self.moved.remove(name);
    }

    // ── Move tracking ──

    pub fn mark_moved(&mut self, name: impl Into<String>) {
        self.moved.insert(name.into());
    }

    pub fn is_moved(&self, name: &str) -> bool {
        self.moved.contains(name)
    }

    /// Clear the moved flag (re-initialization by assignment).
    pub fn reset_moved(&mut self, name: &str) {
        self.moved.remove(name);
    }

    // ── Scoping ──

    pub fn snapshot(&self) -> VarSnapshot {
        VarSnapshot {
            types: self.types.clone(),
            initializers: self.initializers.clone(),
            moved: self.moved.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: VarSnapshot) {
        self.types = snapshot.types;
        self.initializers = snapshot.initializers;
        self.moved = snapshot.moved;
    }
}
