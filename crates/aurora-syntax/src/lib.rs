//! Syntax tree for the Aurora language.
//!
//! These nodes are the immutable output of the (external) parser and the
//! input of semantic generation. Every node category is a closed tagged
//! variant; shape recognition downstream happens through exhaustive pattern
//! matching, never through downcasting.
//!
//! Each node carries an `origin` span used only for diagnostics.

pub mod ast;

pub use ast::*;
