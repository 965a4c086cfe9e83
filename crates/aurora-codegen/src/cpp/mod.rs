//! The C++ side of lowering: target AST nodes and type mapping.

pub mod ast;
pub mod types;

pub use ast::{CppExpr, CppFunction, CppModule, CppParam, CppStmt, CppTypeDecl};
pub use types::{map_type, sanitize_identifier};
