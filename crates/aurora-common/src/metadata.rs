//! Module metadata exchanged between compilations.
//!
//! When a module is compiled, its exported surface is summarized into a
//! [`ModuleMetadata`] that the driver writes next to the module source (as a
//! `.aurm` JSON file). Importing modules read the same structure back to
//! learn signatures without re-compiling the exporter.

use serde::{Deserialize, Serialize};

/// What kind of item an export is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Function,
    Type,
}

/// One exported item of a compiled module.
///
/// Types are carried as their Aurora source spellings ("i32", "array<f64>");
/// the importer re-parses them into its own type representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedItem {
    pub name: String,
    pub kind: ExportKind,
    /// Parameter type spellings. Empty for type exports.
    #[serde(default)]
    pub param_types: Vec<String>,
    /// Return type spelling for functions, `None` for type exports.
    #[serde(default)]
    pub ret_type: Option<String>,
    /// Declared type parameters, in order.
    #[serde(default)]
    pub type_params: Vec<String>,
}

/// The exported surface of one compiled module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    pub module: String,
    pub exports: Vec<ExportedItem>,
}

impl ModuleMetadata {
    pub fn new(module: impl Into<String>) -> Self {
        ModuleMetadata {
            module: module.into(),
            exports: Vec::new(),
        }
    }

    /// Look up an export by name.
    pub fn find(&self, name: &str) -> Option<&ExportedItem> {
        self.exports.iter().find(|item| item.name == name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &ExportedItem> {
        self.exports
            .iter()
            .filter(|item| item.kind == ExportKind::Function)
    }

    pub fn types(&self) -> impl Iterator<Item = &ExportedItem> {
        self.exports
            .iter()
            .filter(|item| item.kind == ExportKind::Type)
    }
}
