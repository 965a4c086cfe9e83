//! End-to-end lowering tests: typed IR modules through the rule engine,
//! decoration, rendering, and metadata generation.

use aurora_codegen::{generate, FormatMode, Generator, RenderOptions, Renderer};
use aurora_common::{Event, ExportKind, Span};
use aurora_sema::ir::{
    self, BinOp, Effect, EffectSet, Expr, ExprKind, FuncItem, Item, Lit, MatchArm, Module, Param,
    Pattern, Stmt, TypeItem,
};
use aurora_sema::ty::{Field, Variant};
use aurora_sema::Ty;

fn expr(kind: ExprKind, ty: Ty) -> Expr {
    Expr::new(kind, ty, Span::synthetic())
}

fn int(n: i64) -> Expr {
    expr(ExprKind::Literal(Lit::Int(n)), Ty::i32())
}

fn var(name: &str, ty: Ty) -> Expr {
    expr(ExprKind::Var(name.into()), ty)
}

fn block(stmts: Vec<Stmt>, result: Expr) -> Expr {
    let ty = result.ty.clone();
    expr(
        ExprKind::Block {
            stmts,
            result: Box::new(result),
        },
        ty,
    )
}

fn func(name: &str, params: Vec<(&str, Ty)>, ret_type: Ty, body: Expr) -> FuncItem {
    FuncItem {
        name: name.into(),
        type_params: vec![],
        params: params
            .into_iter()
            .map(|(name, ty)| Param {
                name: name.into(),
                ty,
            })
            .collect(),
        ret_type,
        body: Some(body),
        effects: EffectSet::empty(),
        exported: false,
        external: false,
        origin: Span::synthetic(),
    }
}

fn shape_sum() -> Ty {
    Ty::Sum {
        name: "Shape".into(),
        variants: vec![
            Variant {
                name: "Circle".into(),
                fields: vec![Field {
                    name: "radius".into(),
                    ty: Ty::f64(),
                }],
            },
            Variant {
                name: "Square".into(),
                fields: vec![Field {
                    name: "side".into(),
                    ty: Ty::f64(),
                }],
            },
        ],
    }
}

fn render(module: &ir::Module, mode: FormatMode) -> String {
    let lowered = Generator::new().lower_module(module).unwrap();
    let options = RenderOptions::new(mode);
    Renderer::new(&options).render_module(&lowered)
}

#[test]
fn decorated_function_renders_with_both_modifiers() {
    let body = block(
        vec![],
        expr(
            ExprKind::Binary {
                op: BinOp::Add,
                left: Box::new(var("a", Ty::i32())),
                right: Box::new(var("b", Ty::i32())),
            },
            Ty::i32(),
        ),
    );
    let mut item = func("add", vec![("a", Ty::i32()), ("b", Ty::i32())], Ty::i32(), body);
    item.effects.insert(Effect::Constexpr);
    item.effects.insert(Effect::Noexcept);
    let module = Module {
        name: "math".into(),
        imports: vec![],
        items: vec![Item::Func(item)],
    };

    let rendered = render(&module, FormatMode::Pretty);
    assert_eq!(
        rendered,
        "constexpr int32_t add(int32_t a, int32_t b) noexcept {\n    return (a + b);\n}"
    );
}

#[test]
fn decoration_events_are_published_per_function() {
    let module = Module {
        name: "m".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "noop",
            vec![],
            Ty::Unit,
            block(vec![], Expr::unit(Span::synthetic())),
        ))],
    };
    let mut gen = Generator::new();
    let recorded = gen.events.subscribe_recorder();
    gen.lower_module(&module).unwrap();
    assert_eq!(
        recorded.borrow().as_slice(),
        [Event::FunctionDecorated {
            name: "noop".into(),
            effects: vec![],
        }]
    );
}

#[test]
fn sum_types_become_variant_structs_and_an_alias() {
    let module = Module {
        name: "shapes".into(),
        imports: vec![],
        items: vec![Item::Type(TypeItem {
            name: "Shape".into(),
            type_params: vec![],
            ty: shape_sum(),
            exported: true,
            origin: Span::synthetic(),
        })],
    };
    let rendered = render(&module, FormatMode::Lossless);
    assert_eq!(
        rendered,
        "struct Circle { double radius; };\n\
         struct Square { double side; };\n\
         using Shape = std::variant<Circle, Square>;"
    );
}

#[test]
fn match_in_value_position_is_a_holds_alternative_chain() {
    let arms = vec![
        MatchArm {
            pattern: Pattern::Variant {
                name: "Circle".into(),
                bindings: vec![("radius".into(), Ty::f64())],
            },
            guard: None,
            body: var("radius", Ty::f64()),
        },
        MatchArm {
            pattern: Pattern::Variant {
                name: "Square".into(),
                bindings: vec![("side".into(), Ty::f64())],
            },
            guard: None,
            body: var("side", Ty::f64()),
        },
    ];
    let body = expr(
        ExprKind::Match {
            scrutinee: Box::new(var("shape", shape_sum())),
            arms,
        },
        Ty::f64(),
    );
    let module = Module {
        name: "shapes".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "extent",
            vec![("shape", shape_sum())],
            Ty::f64(),
            body,
        ))],
    };
    let rendered = render(&module, FormatMode::Lossless);
    assert!(rendered.contains("const auto& __subject = shape;"));
    assert!(rendered.contains("if (std::holds_alternative<Circle>(__subject))"));
    assert!(rendered.contains("auto& [radius] = std::get<Circle>(__subject);"));
    assert!(rendered.contains("return radius;"));
    // No wildcard arm: the chain falls through to an abort.
    assert!(rendered.contains("std::abort();"));
}

#[test]
fn wildcard_arm_makes_the_chain_exhaustive() {
    let arms = vec![
        MatchArm {
            pattern: Pattern::Variant {
                name: "Circle".into(),
                bindings: vec![],
            },
            guard: None,
            body: int(1),
        },
        MatchArm {
            pattern: Pattern::Wildcard,
            guard: None,
            body: int(0),
        },
    ];
    let body = expr(
        ExprKind::Match {
            scrutinee: Box::new(var("shape", shape_sum())),
            arms,
        },
        Ty::i32(),
    );
    let module = Module {
        name: "shapes".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "tag",
            vec![("shape", shape_sum())],
            Ty::i32(),
            body,
        ))],
    };
    let rendered = render(&module, FormatMode::Lossless);
    assert!(rendered.contains("else { return 0; }"));
    assert!(!rendered.contains("std::abort"));
}

#[test]
fn guarded_arm_keeps_the_fallthrough_abort() {
    let arms = vec![
        MatchArm {
            pattern: Pattern::Variant {
                name: "Circle".into(),
                bindings: vec![("radius".into(), Ty::f64())],
            },
            guard: Some(expr(
                ExprKind::Binary {
                    op: BinOp::Gt,
                    left: Box::new(var("radius", Ty::f64())),
                    right: Box::new(int(0)),
                },
                Ty::bool(),
            )),
            body: int(1),
        },
        MatchArm {
            pattern: Pattern::Wildcard,
            guard: None,
            body: int(0),
        },
    ];
    let body = expr(
        ExprKind::Match {
            scrutinee: Box::new(var("shape", shape_sum())),
            arms,
        },
        Ty::i32(),
    );
    let module = Module {
        name: "shapes".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "classify",
            vec![("shape", shape_sum())],
            Ty::i32(),
            body,
        ))],
    };
    let rendered = render(&module, FormatMode::Lossless);
    // The guard nests inside the Circle branch; when it fails, control
    // falls out of the chain, so the abort must stay.
    assert!(rendered.contains("if ((radius > 0))"));
    assert!(rendered.contains("std::abort();"));
}

#[test]
fn scrutinee_binding_does_not_shadow_user_variables() {
    let arms = vec![MatchArm {
        pattern: Pattern::Variant {
            name: "Circle".into(),
            bindings: vec![],
        },
        guard: None,
        body: var("subject", Ty::i32()),
    }];
    let body = expr(
        ExprKind::Match {
            scrutinee: Box::new(var("shape", shape_sum())),
            arms,
        },
        Ty::i32(),
    );
    let module = Module {
        name: "shapes".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "inspect",
            vec![("shape", shape_sum()), ("subject", Ty::i32())],
            Ty::i32(),
            body,
        ))],
    };
    let rendered = render(&module, FormatMode::Lossless);
    assert!(rendered.contains("const auto& __subject = shape;"));
    assert!(rendered.contains("return subject;"));
}

#[test]
fn value_if_renders_as_a_ternary() {
    let body = expr(
        ExprKind::If {
            cond: Box::new(var("flag", Ty::bool())),
            then_branch: Box::new(int(1)),
            else_branch: Some(Box::new(int(2))),
        },
        Ty::i32(),
    );
    let module = Module {
        name: "m".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "pick",
            vec![("flag", Ty::bool())],
            Ty::i32(),
            body,
        ))],
    };
    let rendered = render(&module, FormatMode::Lossless);
    assert!(rendered.contains("return (flag ? 1 : 2);"));
}

#[test]
fn block_in_value_position_becomes_an_invoked_lambda() {
    let inner = block(
        vec![Stmt::Let {
            name: "x".into(),
            ty: Ty::i32(),
            value: int(1),
            mutable: false,
        }],
        var("x", Ty::i32()),
    );
    let body = block(
        vec![Stmt::Let {
            name: "y".into(),
            ty: Ty::i32(),
            value: inner,
            mutable: false,
        }],
        var("y", Ty::i32()),
    );
    let module = Module {
        name: "m".into(),
        imports: vec![],
        items: vec![Item::Func(func("f", vec![], Ty::i32(), body))],
    };
    let rendered = render(&module, FormatMode::Lossless);
    assert!(rendered.contains("const int32_t y = [&]() { const int32_t x = 1; return x; }();"));
}

#[test]
fn pretty_and_lossless_agree_modulo_whitespace() {
    let body = block(
        vec![Stmt::If {
            cond: var("flag", Ty::bool()),
            then_block: vec![Stmt::Return(Some(int(1)))],
            else_block: None,
        }],
        int(0),
    );
    let module = Module {
        name: "m".into(),
        imports: vec![],
        items: vec![Item::Func(func(
            "f",
            vec![("flag", Ty::bool())],
            Ty::i32(),
            body,
        ))],
    };
    let pretty = render(&module, FormatMode::Pretty);
    let lossless = render(&module, FormatMode::Lossless);
    assert!(pretty.contains('\n'));
    let squeeze = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(squeeze(&pretty), squeeze(&lossless));
}

#[test]
fn exported_functions_appear_in_metadata() {
    let mut item = func("area", vec![("shape", shape_sum())], Ty::f64(), int(0));
    item.exported = true;
    let module = Module {
        name: "shapes".into(),
        imports: vec![],
        items: vec![Item::Func(item)],
    };
    let meta = generate(&module);
    let area = meta.find("area").unwrap();
    assert_eq!(area.kind, ExportKind::Function);
    assert_eq!(area.param_types, vec!["Shape"]);
    assert_eq!(area.ret_type.as_deref(), Some("f64"));
}
