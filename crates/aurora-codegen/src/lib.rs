//! C++ target lowering for the Aurora compiler.
//!
//! Consumes the typed IR produced by semantic analysis and emits C++:
//!
//! - [`rules`]: the ordered rule engine turning IR nodes into the target AST
//! - [`cpp`]: the target AST, identifier sanitation, and type mapping
//! - [`decorate`]: effect-driven function decoration with telemetry events
//! - [`render`]: C++ source text rendering with scoped format modes
//! - [`metadata`]: export-surface summaries for cross-module imports

pub mod cpp;
pub mod decorate;
pub mod metadata;
pub mod render;
pub mod rules;

pub use cpp::{
    map_type, sanitize_identifier, CppExpr, CppFunction, CppModule, CppParam, CppStmt, CppTypeDecl,
};
pub use decorate::FunctionDecorator;
pub use metadata::generate;
pub use render::{FormatMode, RenderOptions, Renderer, ScopedMode};
pub use rules::Generator;
