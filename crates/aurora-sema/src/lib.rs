//! Semantic analysis for the Aurora compiler.
//!
//! Consumes the syntax tree produced by the front end and produces a typed
//! IR module ready for target lowering. The work happens in five passes over
//! a program (imports, import registration, type shapes, function
//! signatures, full lowering) driven by the [`lower::Lowerer`] engine, which
//! leans on:
//!
//! - [`registry`]: function and type symbol tables
//! - [`scope`]: the variable-scope registry with snapshot/restore
//! - [`solve`]: unification and generic call instantiation
//! - [`purity`]: purity classification and effect derivation
//! - [`traits`]: trait definitions, impls, and static-method resolution
//! - [`imports`]: stdlib/user-module import collaborators

pub mod imports;
pub mod ir;
pub mod lower;
pub mod purity;
pub mod registry;
pub mod scope;
pub mod solve;
pub mod traits;
pub mod ty;

pub use imports::{FileModuleLoader, Importer, ModuleLoader, ModulePathResolver, StdlibScanner};
pub use ir::{Effect, EffectSet};
pub use lower::Lowerer;
pub use purity::PurityAnalyzer;
pub use registry::{FunctionRegistry, FunctionSig, TypeRegistry};
pub use scope::VarTypeRegistry;
pub use solve::{instantiate, Instantiation};
pub use traits::TraitRegistry;
pub use ty::{Ownership, Ty};
