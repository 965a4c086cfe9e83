//! C++ source rendering.
//!
//! Rendering is configured by an explicit [`RenderOptions`] value passed
//! to the renderer; there is no process-global mode. A temporary override
//! is taken with [`RenderOptions::scoped`], whose guard restores the
//! previous mode when dropped, so nested overrides unwind correctly even
//! on early exits.

use std::cell::Cell;

use crate::cpp::{CppExpr, CppFunction, CppModule, CppStmt, CppTypeDecl};

const INDENT: &str = "    ";

/// How much whitespace the output carries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormatMode {
    /// Indented, one statement per line.
    #[default]
    Pretty,
    /// Minimal whitespace, one line per top-level item.
    Lossless,
}

/// Rendering configuration.
#[derive(Debug, Default)]
pub struct RenderOptions {
    mode: Cell<FormatMode>,
}

impl RenderOptions {
    pub fn new(mode: FormatMode) -> Self {
        RenderOptions {
            mode: Cell::new(mode),
        }
    }

    pub fn mode(&self) -> FormatMode {
        self.mode.get()
    }

    pub fn set_mode(&self, mode: FormatMode) {
        self.mode.set(mode);
    }

    /// Override the mode until the returned guard drops.
    pub fn scoped(&self, mode: FormatMode) -> ScopedMode<'_> {
        let previous = self.mode.replace(mode);
        ScopedMode {
            options: self,
            previous,
        }
    }
}

/// Guard restoring the previous format mode on drop.
pub struct ScopedMode<'a> {
    options: &'a RenderOptions,
    previous: FormatMode,
}

impl Drop for ScopedMode<'_> {
    fn drop(&mut self) {
        self.options.mode.set(self.previous);
    }
}

/// Renders target AST nodes to C++ source text.
pub struct Renderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Renderer { options }
    }

    fn pretty(&self) -> bool {
        self.options.mode() == FormatMode::Pretty
    }

    fn indent(&self, depth: usize) -> String {
        if self.pretty() {
            INDENT.repeat(depth)
        } else {
            String::new()
        }
    }

    pub fn render_module(&self, module: &CppModule) -> String {
        let mut sections: Vec<String> = Vec::new();
        sections.extend(module.types.iter().map(|t| self.render_type_decl(t)));
        sections.extend(module.functions.iter().map(|f| self.render_function(f)));
        let sep = if self.pretty() { "\n\n" } else { "\n" };
        sections.join(sep)
    }

    pub fn render_type_decl(&self, decl: &CppTypeDecl) -> String {
        match decl {
            CppTypeDecl::Struct { name, fields } => {
                if fields.is_empty() {
                    return format!("struct {name} {{}};");
                }
                if self.pretty() {
                    let fields = fields
                        .iter()
                        .map(|f| format!("{INDENT}{} {};", f.ty, f.name))
                        .collect::<Vec<_>>()
                        .join("\n");
                    format!("struct {name} {{\n{fields}\n}};")
                } else {
                    let fields = fields
                        .iter()
                        .map(|f| format!("{} {};", f.ty, f.name))
                        .collect::<Vec<_>>()
                        .join(" ");
                    format!("struct {name} {{ {fields} }};")
                }
            }
            CppTypeDecl::VariantAlias { name, alternatives } => {
                format!("using {name} = std::variant<{}>;", alternatives.join(", "))
            }
            CppTypeDecl::Alias { name, ty } => format!("using {name} = {ty};"),
        }
    }

    pub fn render_function(&self, func: &CppFunction) -> String {
        let mut head = String::new();
        for modifier in &func.prefix_modifiers {
            head.push_str(modifier);
            head.push(' ');
        }
        let params = func
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        head.push_str(&format!("{} {}({params})", func.ret_type, func.name));
        for modifier in &func.suffix_modifiers {
            head.push(' ');
            head.push_str(modifier);
        }
        match &func.body {
            None => format!("{head};"),
            Some(body) => format!("{head} {}", self.render_block(body, 0)),
        }
    }

    fn render_block(&self, stmts: &[CppStmt], depth: usize) -> String {
        if stmts.is_empty() {
            return "{}".to_string();
        }
        if self.pretty() {
            let body = stmts
                .iter()
                .map(|s| format!("{}{}", self.indent(depth + 1), self.render_stmt(s, depth + 1)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{{\n{body}\n{}}}", self.indent(depth))
        } else {
            let body = stmts
                .iter()
                .map(|s| self.render_stmt(s, depth))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{ {body} }}")
        }
    }

    pub fn render_stmt(&self, stmt: &CppStmt, depth: usize) -> String {
        match stmt {
            CppStmt::Expr(expr) => format!("{};", self.render_expr_at(expr, depth)),
            CppStmt::VarDecl {
                ty,
                name,
                init,
                is_const,
            } => {
                let prefix = if *is_const { "const " } else { "" };
                format!(
                    "{prefix}{ty} {name} = {};",
                    self.render_expr_at(init, depth)
                )
            }
            CppStmt::StructuredBinding { names, init } => format!(
                "auto& [{}] = {};",
                names.join(", "),
                self.render_expr_at(init, depth)
            ),
            CppStmt::Assign { target, value } => format!(
                "{} = {};",
                self.render_expr_at(target, depth),
                self.render_expr_at(value, depth)
            ),
            CppStmt::Return(None) => "return;".to_string(),
            CppStmt::Return(Some(value)) => {
                format!("return {};", self.render_expr_at(value, depth))
            }
            CppStmt::If {
                cond,
                then_block,
                else_block,
            } => {
                let mut out = format!(
                    "if ({}) {}",
                    self.render_expr_at(cond, depth),
                    self.render_block(then_block, depth)
                );
                if let Some(else_block) = else_block {
                    out.push_str(" else ");
                    out.push_str(&self.render_block(else_block, depth));
                }
                out
            }
            CppStmt::While { cond, body } => format!(
                "while ({}) {}",
                self.render_expr_at(cond, depth),
                self.render_block(body, depth)
            ),
            CppStmt::ForEach {
                var,
                iterable,
                body,
            } => format!(
                "for (const auto& {var} : {}) {}",
                self.render_expr_at(iterable, depth),
                self.render_block(body, depth)
            ),
            CppStmt::Break => "break;".to_string(),
            CppStmt::Continue => "continue;".to_string(),
        }
    }

    pub fn render_expr(&self, expr: &CppExpr) -> String {
        self.render_expr_at(expr, 0)
    }

    fn render_expr_at(&self, expr: &CppExpr, depth: usize) -> String {
        match expr {
            CppExpr::Literal(text) | CppExpr::Ident(text) => text.clone(),
            CppExpr::Unary { op, operand } => {
                format!("{op}{}", self.render_expr_at(operand, depth))
            }
            CppExpr::Binary { op, left, right } => format!(
                "({} {op} {})",
                self.render_expr_at(left, depth),
                self.render_expr_at(right, depth)
            ),
            CppExpr::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|a| self.render_expr_at(a, depth))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({args})", self.render_expr_at(callee, depth))
            }
            CppExpr::Member { object, field } => {
                format!("{}.{field}", self.render_expr_at(object, depth))
            }
            CppExpr::Index { object, index } => format!(
                "{}[{}]",
                self.render_expr_at(object, depth),
                self.render_expr_at(index, depth)
            ),
            CppExpr::Ternary {
                cond,
                then_value,
                else_value,
            } => format!(
                "({} ? {} : {})",
                self.render_expr_at(cond, depth),
                self.render_expr_at(then_value, depth),
                self.render_expr_at(else_value, depth)
            ),
            CppExpr::InitList { name, values } => {
                let values = values
                    .iter()
                    .map(|v| self.render_expr_at(v, depth))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{name}{{{values}}}")
            }
            CppExpr::Iife(stmts) => format!("[&]() {}()", self.render_block(stmts, depth)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpp::CppParam;

    fn sample_function() -> CppFunction {
        let mut func = CppFunction::new("add", "int32_t");
        func.params = vec![
            CppParam {
                ty: "int32_t".into(),
                name: "a".into(),
            },
            CppParam {
                ty: "int32_t".into(),
                name: "b".into(),
            },
        ];
        func.body = Some(vec![CppStmt::Return(Some(CppExpr::Binary {
            op: "+".into(),
            left: Box::new(CppExpr::ident("a")),
            right: Box::new(CppExpr::ident("b")),
        }))]);
        func.add_prefix_modifier("constexpr");
        func.add_suffix_modifier("noexcept");
        func
    }

    #[test]
    fn pretty_rendering_indents_the_body() {
        let options = RenderOptions::new(FormatMode::Pretty);
        let rendered = Renderer::new(&options).render_function(&sample_function());
        assert_eq!(
            rendered,
            "constexpr int32_t add(int32_t a, int32_t b) noexcept {\n    return (a + b);\n}"
        );
    }

    #[test]
    fn lossless_rendering_is_single_line() {
        let options = RenderOptions::new(FormatMode::Lossless);
        let rendered = Renderer::new(&options).render_function(&sample_function());
        assert_eq!(
            rendered,
            "constexpr int32_t add(int32_t a, int32_t b) noexcept { return (a + b); }"
        );
    }

    #[test]
    fn external_functions_render_as_declarations() {
        let mut func = CppFunction::new("sqrt", "double");
        func.params = vec![CppParam {
            ty: "double".into(),
            name: "x".into(),
        }];
        func.add_suffix_modifier("noexcept");
        let options = RenderOptions::default();
        assert_eq!(
            Renderer::new(&options).render_function(&func),
            "double sqrt(double x) noexcept;"
        );
    }

    #[test]
    fn scoped_mode_restores_on_drop() {
        let options = RenderOptions::new(FormatMode::Pretty);
        {
            let _guard = options.scoped(FormatMode::Lossless);
            assert_eq!(options.mode(), FormatMode::Lossless);
            {
                let _inner = options.scoped(FormatMode::Pretty);
                assert_eq!(options.mode(), FormatMode::Pretty);
            }
            assert_eq!(options.mode(), FormatMode::Lossless);
        }
        assert_eq!(options.mode(), FormatMode::Pretty);
    }

    #[test]
    fn variant_alias_rendering() {
        let options = RenderOptions::default();
        let decl = CppTypeDecl::VariantAlias {
            name: "Option".into(),
            alternatives: vec!["Some".into(), "None".into()],
        };
        assert_eq!(
            Renderer::new(&options).render_type_decl(&decl),
            "using Option = std::variant<Some, None>;"
        );
    }
}
