//! Shared infrastructure for the Aurora compiler.
//!
//! Home of the pieces every stage depends on: source spans, the compile
//! error taxonomy, the event bus used for compilation telemetry, and the
//! module metadata structures exchanged between the codegen stage and the
//! import resolver.

pub mod error;
pub mod events;
pub mod metadata;
pub mod span;

pub use error::{CompileError, CompileErrorKind};
pub use events::{Event, EventBus};
pub use metadata::{ExportKind, ExportedItem, ModuleMetadata};
pub use span::Span;
