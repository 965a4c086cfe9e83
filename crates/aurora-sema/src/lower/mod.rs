//! The semantic-IR generation engine.
//!
//! Drives five passes over one program: collect imports, resolve imports
//! into the registries, pre-register type shapes, pre-register function
//! signatures, then produce fully typed items (types first, functions
//! after, each group in declaration order).
//!
//! Expression lowering is table-driven: [`EXPR_RULES`] is an immutable
//! ordered list of named rules assembled at compile time; the first rule
//! that matches a node produces its IR, and a node no rule matches is an
//! internal error, never a silent drop.

mod expr;
mod stmt;
mod types;

use aurora_common::{CompileError, Span};
use aurora_syntax as ast;

use crate::imports::Importer;
use crate::ir;
use crate::purity::PurityAnalyzer;
use crate::registry::{FunctionRegistry, FunctionSig, TypeRegistry};
use crate::scope::VarTypeRegistry;
use crate::traits::TraitRegistry;
use crate::ty::Ty;

/// One expression rule: a diagnostic name and a matcher that returns
/// `Ok(None)` when the rule does not apply.
pub type ExprRule = (
    &'static str,
    fn(&mut Lowerer<'_>, &ast::Expr) -> Result<Option<ir::Expr>, CompileError>,
);

/// The ordered expression rule list. Desugaring and rewrite rules come
/// before the structural rules they feed.
pub const EXPR_RULES: &[ExprRule] = &[
    ("pipe", expr::pipe),
    ("module-member", expr::module_member),
    ("static-method-call", expr::static_method_call),
    ("call", expr::call),
    ("literal", expr::literal),
    ("var-ref", expr::var_ref),
    ("binary", expr::binary),
    ("unary", expr::unary),
    ("member-access", expr::member_access),
    ("index", expr::index),
    ("array", expr::array),
    ("record", expr::record),
    ("block", expr::block),
    ("if", expr::if_expr),
    ("match", expr::match_expr),
    ("for", expr::for_loop),
    ("while", expr::while_loop),
];

pub struct Lowerer<'a> {
    module: String,
    pub functions: FunctionRegistry,
    pub types: TypeRegistry,
    pub traits: TraitRegistry,
    pub vars: VarTypeRegistry,
    pub purity: PurityAnalyzer,
    importer: Option<Importer<'a>>,
    pub(crate) loop_depth: usize,
    pub(crate) current_ret: Option<Ty>,
    /// Type parameters of the declaration currently being lowered.
    pub(crate) type_params: Vec<String>,
}

impl<'a> Lowerer<'a> {
    pub fn new(module: impl Into<String>) -> Self {
        Lowerer {
            module: module.into(),
            functions: FunctionRegistry::new(),
            types: TypeRegistry::new(),
            traits: TraitRegistry::new(),
            vars: VarTypeRegistry::new(),
            purity: PurityAnalyzer::new(),
            importer: None,
            loop_depth: 0,
            current_ret: None,
            type_params: Vec::new(),
        }
    }

    pub fn with_importer(mut self, importer: Importer<'a>) -> Self {
        self.importer = Some(importer);
        self
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// Lower one program to a typed IR module.
    pub fn lower_program(&mut self, program: &ast::Program) -> Result<ir::Module, CompileError> {
        if let Some(module) = &program.module {
            self.module = module.name.clone();
        }

        // Pass 1: collect raw import records.
        let imports: Vec<ir::Import> = program
            .imports
            .iter()
            .map(|i| ir::Import {
                path: i.path.clone(),
                items: i.items.clone(),
            })
            .collect();

        // Pass 2: populate the registries from each import.
        for import in &program.imports {
            match &self.importer {
                Some(importer) => {
                    importer.resolve_import(import, &mut self.functions, &mut self.types)?
                }
                None => {
                    return Err(CompileError::import(format!(
                        "cannot resolve import '{}': no import resolver configured",
                        import.path
                    ))
                    .with_origin(import.origin))
                }
            }
        }

        // Pass 3: pre-register type shapes, traits, and impl signatures so
        // forward references resolve.
        for decl in &program.decls {
            match decl {
                ast::Decl::Type(ty) => self.register_type_shape(ty)?,
                ast::Decl::Trait(tr) => self.register_trait_decl(tr)?,
                _ => {}
            }
        }
        for decl in &program.decls {
            if let ast::Decl::Impl(im) = decl {
                self.register_impl_decl(im)?;
            }
        }

        // Pass 4: pre-register function signatures (and sum constructors)
        // so call sites resolve before any body is visited.
        for decl in &program.decls {
            match decl {
                ast::Decl::Func(func) => self.register_func_sig(func)?,
                ast::Decl::Type(ty) => self.register_constructors(ty)?,
                _ => {}
            }
        }

        // Pass 5: full lowering, type items before function items.
        let mut items = Vec::new();
        for decl in &program.decls {
            if let ast::Decl::Type(ty) = decl {
                items.push(ir::Item::Type(self.lower_type_decl(ty)?));
            }
        }
        for decl in &program.decls {
            match decl {
                ast::Decl::Func(func) => {
                    items.push(ir::Item::Func(self.lower_func_decl(func)?));
                }
                ast::Decl::Impl(im) => {
                    for method in &im.methods {
                        items.push(ir::Item::Func(self.lower_impl_method(im, method)?));
                    }
                }
                _ => {}
            }
        }

        Ok(ir::Module {
            name: self.module.clone(),
            imports,
            items,
        })
    }

    /// Dispatch one expression through the rule list.
    pub fn lower_expr(&mut self, node: &ast::Expr) -> Result<ir::Expr, CompileError> {
        for (_, rule) in EXPR_RULES {
            if let Some(lowered) = rule(self, node)? {
                return Ok(lowered);
            }
        }
        Err(CompileError::internal(format!(
            "no expression rule for node kind '{}'",
            kind_name(&node.kind)
        ))
        .with_origin(node.origin))
    }

    fn register_func_sig(&mut self, func: &ast::FuncDecl) -> Result<(), CompileError> {
        let sig = self.signature_of(func, &func.name)?;
        self.functions.register(sig, func.origin)
    }

    /// Resolve a declaration's signature under its own type parameters.
    pub(crate) fn signature_of(
        &self,
        func: &ast::FuncDecl,
        registered_name: &str,
    ) -> Result<FunctionSig, CompileError> {
        let type_params: Vec<String> =
            func.type_params.iter().map(|p| p.name.clone()).collect();
        let mut param_types = Vec::with_capacity(func.params.len());
        for param in &func.params {
            param_types.push(self.resolve_type_expr(&param.ty, &type_params)?);
        }
        let ret_type = match &func.ret_type {
            Some(te) => self.resolve_type_expr(te, &type_params)?,
            None => Ty::Unit,
        };
        Ok(FunctionSig::new(
            registered_name,
            type_params,
            param_types,
            ret_type,
        ))
    }

    /// Lower one function declaration to a typed item.
    pub(crate) fn lower_func_decl(
        &mut self,
        func: &ast::FuncDecl,
    ) -> Result<ir::FuncItem, CompileError> {
        self.lower_func_named(func, &func.name)
    }

    pub(crate) fn lower_func_named(
        &mut self,
        func: &ast::FuncDecl,
        name: &str,
    ) -> Result<ir::FuncItem, CompileError> {
        let sig = self.signature_of(func, name)?;

        let snapshot = self.vars.snapshot();
        let prev_ret = self.current_ret.replace(sig.ret_type.clone());
        let prev_params = std::mem::replace(&mut self.type_params, sig.type_params.clone());
        for (param, ty) in func.params.iter().zip(&sig.param_types) {
            self.vars.set(param.name.clone(), ty.clone());
        }

        let body = match &func.body {
            Some(expr) => Some(self.lower_expr(expr)),
            None => None,
        };
        self.vars.restore(snapshot);
        self.current_ret = prev_ret;
        self.type_params = prev_params;
        let body = body.transpose()?;

        if let Some(body) = &body {
            // A block whose last statement is an explicit `return` has
            // unit type; the return statement itself was checked against
            // the declared type, so the unit result carries no value.
            if !body.ty.is_compatible(&sig.ret_type) && !ends_in_return(body) {
                return Err(CompileError::type_error(format!(
                    "function '{name}' declares return type {}, body has type {}",
                    sig.ret_type, body.ty
                ))
                .with_origin(func.origin));
            }
        }

        let params = func
            .params
            .iter()
            .zip(&sig.param_types)
            .map(|(p, ty)| ir::Param {
                name: p.name.clone(),
                ty: ty.clone(),
            })
            .collect();

        let mut item = ir::FuncItem {
            name: name.to_string(),
            type_params: sig.type_params,
            params,
            ret_type: sig.ret_type,
            body,
            effects: ir::EffectSet::empty(),
            exported: func.exported,
            external: func.external,
            origin: func.origin,
        };
        item.effects = self.purity.derive_effects(&item);
        Ok(item)
    }

    pub(crate) fn internal_at(&self, msg: impl Into<String>, origin: Span) -> CompileError {
        CompileError::internal(msg).with_origin(origin)
    }
}

/// Whether a body is a block whose final statement is an explicit
/// `return`, leaving only the synthetic unit result after it.
fn ends_in_return(body: &ir::Expr) -> bool {
    let ir::ExprKind::Block { stmts, result } = &body.kind else {
        return false;
    };
    result.is_unit_literal() && matches!(stmts.last(), Some(ir::Stmt::Return(_)))
}

pub(crate) fn kind_name(kind: &ast::ExprKind) -> &'static str {
    match kind {
        ast::ExprKind::Literal(_) => "literal",
        ast::ExprKind::Var(_) => "var",
        ast::ExprKind::Binary { .. } => "binary",
        ast::ExprKind::Unary { .. } => "unary",
        ast::ExprKind::Call { .. } => "call",
        ast::ExprKind::Member { .. } => "member",
        ast::ExprKind::Index { .. } => "index",
        ast::ExprKind::Record { .. } => "record",
        ast::ExprKind::Array(_) => "array",
        ast::ExprKind::Block { .. } => "block",
        ast::ExprKind::If { .. } => "if",
        ast::ExprKind::Match { .. } => "match",
        ast::ExprKind::For { .. } => "for",
        ast::ExprKind::While { .. } => "while",
        ast::ExprKind::Pipe { .. } => "pipe",
    }
}
