//! Import resolution collaborators.
//!
//! Stdlib imports resolve through a [`StdlibScanner`]; user-module imports
//! (`./path`) resolve through the [`ModulePathResolver`] to a `.aurm`
//! metadata file read back by a [`ModuleLoader`]. Either way the result is
//! a [`ModuleSignatures`] bundle that the importer registers under the
//! module's qualified names, plus bare names for selective imports and
//! alias-qualified names for `as` imports.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use aurora_common::{CompileError, ExportKind, ModuleMetadata, Span};
use aurora_syntax::ImportDecl;

use crate::registry::{FunctionRegistry, FunctionSig, TypeRegistry};
use crate::ty::Ty;

/// File extension of module metadata produced by the metadata generator.
pub const METADATA_EXT: &str = "aurm";

/// What one module exposes to importers.
#[derive(Debug, Clone, Default)]
pub struct ModuleSignatures {
    pub functions: Vec<FunctionSig>,
    pub types: Vec<ExportedType>,
}

#[derive(Debug, Clone)]
pub struct ExportedType {
    pub name: String,
    pub type_params: Vec<String>,
    pub ty: Ty,
}

/// Supplies signatures for stdlib modules by name.
pub trait StdlibScanner {
    fn scan(&self, module: &str) -> Option<ModuleSignatures>;
}

/// Reads module metadata from a resolved path.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<ModuleMetadata, CompileError>;
}

/// Loads `.aurm` JSON metadata files from disk.
#[derive(Debug, Default)]
pub struct FileModuleLoader;

impl ModuleLoader for FileModuleLoader {
    fn load(&self, path: &Path) -> Result<ModuleMetadata, CompileError> {
        let text = fs::read_to_string(path).map_err(|e| {
            CompileError::import(format!("cannot read '{}': {e}", path.display()))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            CompileError::import(format!("malformed metadata in '{}': {e}", path.display()))
        })
    }
}

/// Turns an import path into a metadata file location: the exact-case file
/// name is tried first, then a lowercase fallback.
#[derive(Debug, Default)]
pub struct ModulePathResolver {
    search_dirs: Vec<PathBuf>,
}

impl ModulePathResolver {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        ModulePathResolver { search_dirs }
    }

    pub fn resolve(&self, import_path: &str) -> Option<PathBuf> {
        let name = module_name(import_path);
        for dir in &self.search_dirs {
            let exact = dir.join(format!("{name}.{METADATA_EXT}"));
            if exact.is_file() {
                return Some(exact);
            }
            let lower = dir.join(format!("{}.{METADATA_EXT}", name.to_lowercase()));
            if lower.is_file() {
                return Some(lower);
            }
        }
        None
    }
}

/// The last path segment of an import path, `./vec` and `Math` alike.
pub fn module_name(import_path: &str) -> &str {
    import_path
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(import_path)
}

/// Parse a metadata type spelling back into a [`Ty`].
///
/// Spellings are the `Display` form of `Ty`: `()`, `[T]`,
/// `fn(A, B) -> R`, `Base<Args>`, and bare names. Unknown bare names come
/// back opaque; single uppercase letters are treated as type variables.
pub fn type_from_spelling(spelling: &str) -> Ty {
    let s = spelling.trim();
    if s == "()" {
        return Ty::Unit;
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return Ty::array(type_from_spelling(inner));
    }
    if let Some(rest) = s.strip_prefix("fn(") {
        if let Some((params, ret)) = rest.split_once(") -> ") {
            let params = split_top_level(params)
                .into_iter()
                .map(type_from_spelling)
                .collect();
            return Ty::func(params, type_from_spelling(ret));
        }
    }
    if let Some((base, rest)) = s.split_once('<') {
        if let Some(args) = rest.strip_suffix('>') {
            let args = split_top_level(args)
                .into_iter()
                .map(type_from_spelling)
                .collect();
            return Ty::generic(Ty::Opaque(base.trim().to_string()), args);
        }
    }
    match s {
        "i32" | "i64" | "f64" | "bool" | "string" => Ty::prim(s),
        _ if s.len() == 1 && s.chars().all(|c| c.is_ascii_uppercase()) => Ty::var(s),
        _ => Ty::Opaque(s.to_string()),
    }
}

/// Split on commas at bracket depth zero.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' | '[' | '(' => depth += 1,
            '>' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

/// Convert loaded metadata into registrable signatures.
pub fn signatures_from_metadata(meta: &ModuleMetadata) -> ModuleSignatures {
    let mut out = ModuleSignatures::default();
    for item in &meta.exports {
        match item.kind {
            ExportKind::Function => {
                let params = item.param_types.iter().map(|s| type_from_spelling(s)).collect();
                let ret = item
                    .ret_type
                    .as_deref()
                    .map(type_from_spelling)
                    .unwrap_or(Ty::Unit);
                out.functions.push(FunctionSig::new(
                    item.name.clone(),
                    item.type_params.clone(),
                    params,
                    ret,
                ));
            }
            ExportKind::Type => {
                out.types.push(ExportedType {
                    name: item.name.clone(),
                    type_params: item.type_params.clone(),
                    ty: Ty::Opaque(item.name.clone()),
                });
            }
        }
    }
    out
}

/// Applies import declarations to the registries.
pub struct Importer<'a> {
    scanner: &'a dyn StdlibScanner,
    loader: &'a dyn ModuleLoader,
    resolver: &'a ModulePathResolver,
}

impl<'a> Importer<'a> {
    pub fn new(
        scanner: &'a dyn StdlibScanner,
        loader: &'a dyn ModuleLoader,
        resolver: &'a ModulePathResolver,
    ) -> Self {
        Importer {
            scanner,
            loader,
            resolver,
        }
    }

    /// Populate the registries from one import declaration.
    ///
    /// Every function lands under its canonical qualified name
    /// (`Module.func`); selective imports add the bare name and `as`
    /// imports add the alias-qualified name, all three resolving to the
    /// same signature object.
    pub fn resolve_import(
        &self,
        import: &ImportDecl,
        functions: &mut FunctionRegistry,
        types: &mut TypeRegistry,
    ) -> Result<(), CompileError> {
        let module = module_name(&import.path).to_string();
        let signatures = self.lookup(&import.path, &module, import.origin)?;

        for ty in &signatures.types {
            types.register(
                ty.name.clone(),
                ty.type_params.clone(),
                ty.ty.clone(),
                import.origin,
            )?;
        }

        for sig in &signatures.functions {
            if let Some(items) = &import.items {
                if !items.contains(&sig.name) {
                    continue;
                }
            }
            let qualified = format!("{module}.{}", sig.name);
            let shared = Rc::new(FunctionSig {
                name: qualified.clone(),
                type_params: sig.type_params.clone(),
                param_types: sig.param_types.clone(),
                ret_type: sig.ret_type.clone(),
            });
            functions.register_rc(shared, import.origin)?;
            if import.items.is_some() {
                functions.register_alias(&qualified, sig.name.clone(), import.origin)?;
            }
            if let Some(alias) = &import.alias {
                functions.register_alias(
                    &qualified,
                    format!("{alias}.{}", sig.name),
                    import.origin,
                )?;
            }
        }

        if let Some(items) = &import.items {
            for item in items {
                let known = signatures.functions.iter().any(|f| &f.name == item)
                    || signatures.types.iter().any(|t| &t.name == item);
                if !known {
                    return Err(CompileError::import(format!(
                        "module '{module}' has no export named '{item}'"
                    ))
                    .with_origin(import.origin));
                }
            }
        }
        Ok(())
    }

    fn lookup(
        &self,
        path: &str,
        module: &str,
        origin: Span,
    ) -> Result<ModuleSignatures, CompileError> {
        if path.starts_with("./") || path.starts_with("../") {
            let resolved = self.resolver.resolve(path).ok_or_else(|| {
                CompileError::import(format!("cannot resolve module path '{path}'"))
                    .with_origin(origin)
            })?;
            let meta = self.loader.load(&resolved)?;
            Ok(signatures_from_metadata(&meta))
        } else {
            self.scanner.scan(module).ok_or_else(|| {
                CompileError::import(format!("unknown module '{module}'")).with_origin(origin)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScanner;

    impl StdlibScanner for FixedScanner {
        fn scan(&self, module: &str) -> Option<ModuleSignatures> {
            if module != "Math" {
                return None;
            }
            Some(ModuleSignatures {
                functions: vec![
                    FunctionSig::new("sqrt", vec![], vec![Ty::f64()], Ty::f64()),
                    FunctionSig::new("pow", vec![], vec![Ty::f64(), Ty::f64()], Ty::f64()),
                ],
                types: vec![],
            })
        }
    }

    struct NoLoader;

    impl ModuleLoader for NoLoader {
        fn load(&self, path: &Path) -> Result<ModuleMetadata, CompileError> {
            Err(CompileError::import(format!(
                "unexpected load of '{}'",
                path.display()
            )))
        }
    }

    fn importer_parts() -> (FixedScanner, NoLoader, ModulePathResolver) {
        (FixedScanner, NoLoader, ModulePathResolver::default())
    }

    fn import(path: &str, items: Option<Vec<&str>>, alias: Option<&str>) -> ImportDecl {
        ImportDecl {
            path: path.into(),
            items: items.map(|v| v.into_iter().map(String::from).collect()),
            alias: alias.map(String::from),
            origin: Span::synthetic(),
        }
    }

    #[test]
    fn whole_module_import_registers_qualified_names() {
        let (scanner, loader, resolver) = importer_parts();
        let importer = Importer::new(&scanner, &loader, &resolver);
        let mut funcs = FunctionRegistry::new();
        let mut types = TypeRegistry::new();
        importer
            .resolve_import(&import("Math", None, None), &mut funcs, &mut types)
            .unwrap();
        assert!(funcs.contains("Math.sqrt"));
        assert!(funcs.contains("Math.pow"));
        assert!(!funcs.contains("sqrt"));
    }

    #[test]
    fn selective_import_adds_bare_names_sharing_the_signature() {
        let (scanner, loader, resolver) = importer_parts();
        let importer = Importer::new(&scanner, &loader, &resolver);
        let mut funcs = FunctionRegistry::new();
        let mut types = TypeRegistry::new();
        importer
            .resolve_import(
                &import("Math", Some(vec!["sqrt"]), None),
                &mut funcs,
                &mut types,
            )
            .unwrap();
        assert!(funcs.contains("sqrt"));
        assert!(!funcs.contains("pow"));
        let bare = funcs.fetch("sqrt").unwrap();
        let qualified = funcs.fetch("Math.sqrt").unwrap();
        assert!(Rc::ptr_eq(bare, qualified));
    }

    #[test]
    fn aliased_import_shares_signatures_across_both_spellings() {
        let (scanner, loader, resolver) = importer_parts();
        let importer = Importer::new(&scanner, &loader, &resolver);
        let mut funcs = FunctionRegistry::new();
        let mut types = TypeRegistry::new();
        importer
            .resolve_import(&import("Math", None, Some("M")), &mut funcs, &mut types)
            .unwrap();
        let canonical = funcs.fetch("Math.sqrt").unwrap();
        let aliased = funcs.fetch("M.sqrt").unwrap();
        assert!(Rc::ptr_eq(canonical, aliased));
    }

    #[test]
    fn unknown_stdlib_module_is_an_import_error() {
        let (scanner, loader, resolver) = importer_parts();
        let importer = Importer::new(&scanner, &loader, &resolver);
        let mut funcs = FunctionRegistry::new();
        let mut types = TypeRegistry::new();
        let err = importer
            .resolve_import(&import("Nope", None, None), &mut funcs, &mut types)
            .unwrap_err();
        assert!(err.to_string().contains("unknown module 'Nope'"));
    }

    #[test]
    fn selective_import_of_missing_item_is_an_import_error() {
        let (scanner, loader, resolver) = importer_parts();
        let importer = Importer::new(&scanner, &loader, &resolver);
        let mut funcs = FunctionRegistry::new();
        let mut types = TypeRegistry::new();
        let err = importer
            .resolve_import(
                &import("Math", Some(vec!["cbrt"]), None),
                &mut funcs,
                &mut types,
            )
            .unwrap_err();
        assert!(err.to_string().contains("no export named 'cbrt'"));
    }

    #[test]
    fn type_spellings_round_trip() {
        assert_eq!(type_from_spelling("i32"), Ty::i32());
        assert_eq!(type_from_spelling("()"), Ty::Unit);
        assert_eq!(type_from_spelling("[f64]"), Ty::array(Ty::f64()));
        assert_eq!(
            type_from_spelling("fn(i32, i32) -> bool"),
            Ty::func(vec![Ty::i32(), Ty::i32()], Ty::bool())
        );
        assert_eq!(
            type_from_spelling("Option<i32>"),
            Ty::generic(Ty::Opaque("Option".into()), vec![Ty::i32()])
        );
        assert_eq!(type_from_spelling("T"), Ty::var("T"));
        assert_eq!(type_from_spelling("Window"), Ty::Opaque("Window".into()));
    }

    #[test]
    fn module_name_strips_path_prefixes() {
        assert_eq!(module_name("Math"), "Math");
        assert_eq!(module_name("./vec"), "vec");
        assert_eq!(module_name("../geo/shapes"), "shapes");
    }
}
