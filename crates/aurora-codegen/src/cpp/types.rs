//! Aurora-to-C++ type mapping and identifier sanitation.

use std::sync::OnceLock;

use aurora_sema::Ty;
use rustc_hash::FxHashSet;

/// C++ reserved words that are legal Aurora identifiers. An identifier
/// that collides is suffixed with `_` during lowering.
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "co_await", "co_return", "co_yield", "compl", "concept", "const", "consteval",
    "constexpr", "constinit", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept",
    "not", "nullptr", "operator", "or", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor",
];

fn keyword_set() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| CPP_KEYWORDS.iter().copied().collect())
}

/// Make an Aurora identifier safe in C++ output. Qualified names
/// (`Math.sqrt`) become scoped names (`Math::sqrt`), and reserved words
/// get a trailing underscore.
pub fn sanitize_identifier(name: &str) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(sanitize_identifier)
            .collect::<Vec<_>>()
            .join("::");
    }
    if keyword_set().contains(name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// The C++ spelling of an Aurora type.
pub fn map_type(ty: &Ty) -> String {
    match ty {
        Ty::Prim(name) => match name.as_str() {
            "i32" => "int32_t".to_string(),
            "i64" => "int64_t".to_string(),
            "f64" => "double".to_string(),
            "bool" => "bool".to_string(),
            "string" => "std::string".to_string(),
            other => sanitize_identifier(other),
        },
        Ty::Unit => "void".to_string(),
        Ty::Record { name, .. } | Ty::Sum { name, .. } => sanitize_identifier(name),
        Ty::Generic { base, args, .. } => {
            let args = args.iter().map(map_type).collect::<Vec<_>>().join(", ");
            // The base is a template name here, never a pointer.
            let base = base
                .name()
                .map(sanitize_identifier)
                .unwrap_or_else(|| map_type(base));
            format!("{base}<{args}>")
        }
        Ty::Array(elem) => format!("std::vector<{}>", map_type(elem)),
        Ty::Func { params, ret } => {
            let params = params.iter().map(map_type).collect::<Vec<_>>().join(", ");
            format!("std::function<{}({params})>", map_type(ret))
        }
        // Opaque extern types cross the boundary as raw pointers.
        Ty::Opaque(name) => format!("{}*", sanitize_identifier(name)),
        Ty::Var(name) => sanitize_identifier(name),
        Ty::Error => "void".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_suffixed() {
        assert_eq!(sanitize_identifier("class"), "class_");
        assert_eq!(sanitize_identifier("template"), "template_");
        assert_eq!(sanitize_identifier("point"), "point");
    }

    #[test]
    fn qualified_names_become_scoped() {
        assert_eq!(sanitize_identifier("Math.sqrt"), "Math::sqrt");
    }

    #[test]
    fn primitive_and_collection_mapping() {
        assert_eq!(map_type(&Ty::i32()), "int32_t");
        assert_eq!(map_type(&Ty::string()), "std::string");
        assert_eq!(map_type(&Ty::array(Ty::f64())), "std::vector<double>");
        assert_eq!(
            map_type(&Ty::func(vec![Ty::i32(), Ty::i32()], Ty::bool())),
            "std::function<bool(int32_t, int32_t)>"
        );
        assert_eq!(map_type(&Ty::Opaque("Window".into())), "Window*");
        assert_eq!(map_type(&Ty::Unit), "void");
    }

    #[test]
    fn generic_applications_map_recursively() {
        let owned = Ty::generic(Ty::Opaque("Owned".into()), vec![Ty::array(Ty::i32())]);
        assert_eq!(map_type(&owned), "Owned<std::vector<int32_t>>");
    }
}
