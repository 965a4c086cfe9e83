//! Type-declaration lowering: annotation resolution, shape registration,
//! sum-type constructors, and trait/impl registration.

use std::rc::Rc;

use aurora_common::CompileError;
use aurora_syntax as ast;

use super::Lowerer;
use crate::ir;
use crate::registry::FunctionSig;
use crate::traits::{ImplInfo, TraitInfo};
use crate::ty::{Field, Ty, Variant};

const PRIMS: &[&str] = &["i32", "i64", "f64", "bool", "string"];

/// The free-function name a static method lowers to.
pub fn mangle_static(type_name: &str, method: &str) -> String {
    format!("{type_name}_{method}")
}

impl<'a> Lowerer<'a> {
    /// Resolve a source-level type annotation. Names bound in
    /// `type_params` become type variables; names with no declaration are
    /// opaque extern types.
    pub(crate) fn resolve_type_expr(
        &self,
        te: &ast::TypeExpr,
        type_params: &[String],
    ) -> Result<Ty, CompileError> {
        match te {
            ast::TypeExpr::Name(name) => {
                if type_params.iter().any(|p| p == name) {
                    return Ok(Ty::var(name.clone()));
                }
                if PRIMS.contains(&name.as_str()) {
                    return Ok(Ty::prim(name.clone()));
                }
                match self.types.fetch_ty(name) {
                    Some(ty) => Ok(ty.clone()),
                    None => Ok(Ty::Opaque(name.clone())),
                }
            }
            ast::TypeExpr::Generic { base, args } => {
                let base_ty = match self.types.fetch_ty(base) {
                    Some(ty) => ty.clone(),
                    None => Ty::Opaque(base.clone()),
                };
                let args = args
                    .iter()
                    .map(|a| self.resolve_type_expr(a, type_params))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Ty::generic(base_ty, args))
            }
            ast::TypeExpr::Array(elem) => {
                Ok(Ty::array(self.resolve_type_expr(elem, type_params)?))
            }
            ast::TypeExpr::Func { params, ret } => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_type_expr(p, type_params))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Ty::func(params, self.resolve_type_expr(ret, type_params)?))
            }
            ast::TypeExpr::Unit => Ok(Ty::Unit),
        }
    }

    fn shape_of(&self, decl: &ast::TypeDecl) -> Result<Ty, CompileError> {
        let type_params: Vec<String> =
            decl.type_params.iter().map(|p| p.name.clone()).collect();
        match &decl.body {
            ast::TypeDeclBody::Record(fields) => Ok(Ty::Record {
                name: decl.name.clone(),
                fields: self.resolve_fields(fields, &type_params)?,
            }),
            ast::TypeDeclBody::Sum(variants) => {
                let variants = variants
                    .iter()
                    .map(|v| {
                        Ok(Variant {
                            name: v.name.clone(),
                            fields: self.resolve_fields(&v.fields, &type_params)?,
                        })
                    })
                    .collect::<Result<Vec<_>, CompileError>>()?;
                Ok(Ty::Sum {
                    name: decl.name.clone(),
                    variants,
                })
            }
            ast::TypeDeclBody::Alias(te) => self.resolve_type_expr(te, &type_params),
        }
    }

    fn resolve_fields(
        &self,
        fields: &[ast::FieldDecl],
        type_params: &[String],
    ) -> Result<Vec<Field>, CompileError> {
        fields
            .iter()
            .map(|f| {
                Ok(Field {
                    name: f.name.clone(),
                    ty: self.resolve_type_expr(&f.ty, type_params)?,
                })
            })
            .collect()
    }

    /// Pre-register a declaration's shape so forward references resolve.
    pub(crate) fn register_type_shape(
        &mut self,
        decl: &ast::TypeDecl,
    ) -> Result<(), CompileError> {
        let type_params = decl.type_params.iter().map(|p| p.name.clone()).collect();
        let shape = self.shape_of(decl)?;
        self.types
            .register(decl.name.clone(), type_params, shape, decl.origin)
    }

    /// Full type-declaration lowering. The shape is re-resolved because
    /// the pre-registration pass may have left forward references opaque.
    pub(crate) fn lower_type_decl(
        &mut self,
        decl: &ast::TypeDecl,
    ) -> Result<ir::TypeItem, CompileError> {
        let type_params: Vec<String> =
            decl.type_params.iter().map(|p| p.name.clone()).collect();
        let shape = self.shape_of(decl)?;
        self.types
            .redefine(decl.name.clone(), type_params.clone(), shape.clone());
        Ok(ir::TypeItem {
            name: decl.name.clone(),
            type_params,
            ty: shape,
            exported: decl.exported,
            origin: decl.origin,
        })
    }

    /// Register each sum-type variant as a constructor function: its
    /// parameters are the variant's field types and its return type is
    /// the (generically applied) sum type.
    pub(crate) fn register_constructors(
        &mut self,
        decl: &ast::TypeDecl,
    ) -> Result<(), CompileError> {
        let ast::TypeDeclBody::Sum(_) = &decl.body else {
            return Ok(());
        };
        let type_params: Vec<String> =
            decl.type_params.iter().map(|p| p.name.clone()).collect();
        // Re-resolve the shape rather than fetching the stored entry: the
        // pre-registration pass may have left a forward-referenced field
        // type opaque, and every declared shape is registered by now.
        let sum = self.shape_of(decl)?;
        let Ty::Sum { variants, .. } = sum.clone() else {
            return Err(self.internal_at(
                format!("'{}' resolved to a non-sum shape", decl.name),
                decl.origin,
            ));
        };
        let ret_type = if type_params.is_empty() {
            sum
        } else {
            Ty::generic(sum, type_params.iter().map(|p| Ty::var(p.clone())).collect())
        };
        for variant in &variants {
            let sig = FunctionSig::new(
                variant.name.clone(),
                type_params.clone(),
                variant.fields.iter().map(|f| f.ty.clone()).collect(),
                ret_type.clone(),
            );
            self.functions.register(sig, decl.origin)?;
        }
        Ok(())
    }

    pub(crate) fn register_trait_decl(
        &mut self,
        decl: &ast::TraitDecl,
    ) -> Result<(), CompileError> {
        let type_params: Vec<String> =
            decl.type_params.iter().map(|p| p.name.clone()).collect();
        let mut methods = Vec::with_capacity(decl.methods.len());
        for method in &decl.methods {
            let mut param_types = Vec::with_capacity(method.params.len());
            for param in &method.params {
                param_types.push(self.resolve_type_expr(&param.ty, &type_params)?);
            }
            let ret_type = match &method.ret_type {
                Some(te) => self.resolve_type_expr(te, &type_params)?,
                None => Ty::Unit,
            };
            methods.push(FunctionSig::new(
                method.name.clone(),
                vec![],
                param_types,
                ret_type,
            ));
        }
        self.traits.register_trait(
            TraitInfo {
                name: decl.name.clone(),
                type_params,
                methods,
            },
            decl.origin,
        )
    }

    /// Register an impl block's method signatures under their mangled
    /// free-function names. A trait impl must supply every method the
    /// trait requires.
    pub(crate) fn register_impl_decl(
        &mut self,
        decl: &ast::ImplDecl,
    ) -> Result<(), CompileError> {
        if let Some(trait_name) = &decl.trait_name {
            let required: Vec<String> = self
                .traits
                .trait_info(trait_name)
                .ok_or_else(|| {
                    CompileError::scope(format!(
                        "impl of unknown trait '{trait_name}' for '{}'",
                        decl.type_name
                    ))
                    .with_origin(decl.origin)
                })?
                .methods
                .iter()
                .map(|m| m.name.clone())
                .collect();
            for name in &required {
                if !decl.methods.iter().any(|m| &m.name == name) {
                    return Err(CompileError::type_error(format!(
                        "impl of '{trait_name}' for '{}' is missing method '{name}'",
                        decl.type_name
                    ))
                    .with_origin(decl.origin));
                }
            }
        }
        let mut methods = Vec::with_capacity(decl.methods.len());
        for method in &decl.methods {
            let mangled = mangle_static(&decl.type_name, &method.name);
            let mut sig = self.signature_of(method, &mangled)?;
            // resolve_static matches on the source-level method name.
            sig.name = method.name.clone();
            methods.push(Rc::new(sig));
        }
        self.traits.register_impl(
            ImplInfo {
                type_name: decl.type_name.clone(),
                trait_name: decl.trait_name.clone(),
                methods,
            },
            decl.origin,
        )
    }

    pub(crate) fn lower_impl_method(
        &mut self,
        decl: &ast::ImplDecl,
        method: &ast::FuncDecl,
    ) -> Result<ir::FuncItem, CompileError> {
        let mangled = mangle_static(&decl.type_name, &method.name);
        self.lower_func_named(method, &mangled)
    }
}
