//! Export-surface metadata generation.
//!
//! After lowering, the exported items of a module are summarized into a
//! [`ModuleMetadata`] the driver serializes next to the emitted C++ (as a
//! `.aurm` JSON file). Type spellings use the Aurora source syntax, the
//! same spellings the import layer parses back.

use aurora_common::{ExportKind, ExportedItem, ModuleMetadata};
use aurora_sema::ir;

/// Summarize a lowered module's exports.
pub fn generate(module: &ir::Module) -> ModuleMetadata {
    let mut meta = ModuleMetadata::new(module.name.clone());
    for item in &module.items {
        match item {
            ir::Item::Func(func) if func.exported => {
                meta.exports.push(ExportedItem {
                    name: func.name.clone(),
                    kind: ExportKind::Function,
                    param_types: func.params.iter().map(|p| p.ty.to_string()).collect(),
                    ret_type: Some(func.ret_type.to_string()),
                    type_params: func.type_params.clone(),
                });
            }
            ir::Item::Type(ty) if ty.exported => {
                meta.exports.push(ExportedItem {
                    name: ty.name.clone(),
                    kind: ExportKind::Type,
                    param_types: vec![],
                    ret_type: None,
                    type_params: ty.type_params.clone(),
                });
            }
            _ => {}
        }
    }
    meta
}
