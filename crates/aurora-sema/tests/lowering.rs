//! End-to-end lowering tests: syntax tree in, typed IR module out.

use aurora_common::Span;
use aurora_sema::imports::{
    FileModuleLoader, Importer, ModulePathResolver, ModuleSignatures, StdlibScanner,
};
use aurora_sema::ir;
use aurora_sema::{Effect, FunctionSig, Lowerer, Ty};
use aurora_syntax as ast;

fn expr(kind: ast::ExprKind) -> ast::Expr {
    ast::Expr::new(kind, Span::synthetic())
}

fn stmt(kind: ast::StmtKind) -> ast::Stmt {
    ast::Stmt::new(kind, Span::synthetic())
}

fn int(n: i64) -> ast::Expr {
    expr(ast::ExprKind::Literal(ast::Lit::Int(n)))
}

fn var(name: &str) -> ast::Expr {
    expr(ast::ExprKind::Var(name.into()))
}

fn call(callee: ast::Expr, args: Vec<ast::Expr>) -> ast::Expr {
    expr(ast::ExprKind::Call {
        callee: Box::new(callee),
        args,
    })
}

fn member(object: ast::Expr, name: &str) -> ast::Expr {
    expr(ast::ExprKind::Member {
        object: Box::new(object),
        member: name.into(),
    })
}

fn param(name: &str, ty: ast::TypeExpr) -> ast::Param {
    ast::Param {
        name: name.into(),
        ty,
        origin: Span::synthetic(),
    }
}

fn name_ty(name: &str) -> ast::TypeExpr {
    ast::TypeExpr::Name(name.into())
}

fn func(
    name: &str,
    params: Vec<ast::Param>,
    ret: Option<ast::TypeExpr>,
    body: ast::Expr,
) -> ast::FuncDecl {
    ast::FuncDecl {
        name: name.into(),
        type_params: vec![],
        params,
        ret_type: ret,
        body: Some(body),
        exported: false,
        external: false,
        origin: Span::synthetic(),
    }
}

fn lower(program: &ast::Program) -> Result<ir::Module, aurora_common::CompileError> {
    Lowerer::new("main").lower_program(program)
}

fn only_func(module: &ir::Module) -> &ir::FuncItem {
    module
        .items
        .iter()
        .find_map(|item| match item {
            ir::Item::Func(f) => Some(f),
            _ => None,
        })
        .expect("module has a function item")
}

#[test]
fn add_function_lowers_with_compile_time_effects() {
    let body = expr(ast::ExprKind::Binary {
        op: ast::BinOp::Add,
        left: Box::new(var("a")),
        right: Box::new(var("b")),
    });
    let program = ast::Program::new(vec![ast::Decl::Func(func(
        "add",
        vec![param("a", name_ty("i32")), param("b", name_ty("i32"))],
        Some(name_ty("i32")),
        body,
    ))]);
    let module = lower(&program).unwrap();
    let add = only_func(&module);
    assert_eq!(add.name, "add");
    assert_eq!(add.ret_type, Ty::i32());
    assert_eq!(add.body.as_ref().unwrap().ty, Ty::i32());
    assert!(add.effects.contains(Effect::Constexpr));
    assert!(add.effects.contains(Effect::Noexcept));
}

#[test]
fn calling_with_wrong_arity_names_both_counts() {
    let add = func(
        "add",
        vec![param("a", name_ty("i32")), param("b", name_ty("i32"))],
        Some(name_ty("i32")),
        expr(ast::ExprKind::Binary {
            op: ast::BinOp::Add,
            left: Box::new(var("a")),
            right: Box::new(var("b")),
        }),
    );
    let caller = func(
        "caller",
        vec![],
        Some(name_ty("i32")),
        call(var("add"), vec![int(1), int(2), int(3)]),
    );
    let program = ast::Program::new(vec![ast::Decl::Func(add), ast::Decl::Func(caller)]);
    let err = lower(&program).unwrap_err();
    assert!(err
        .to_string()
        .contains("function 'add' expects 2 argument(s), got 3"));
}

fn option_decl() -> ast::TypeDecl {
    ast::TypeDecl {
        name: "Option".into(),
        type_params: vec![ast::TypeParam {
            name: "T".into(),
            origin: Span::synthetic(),
        }],
        body: ast::TypeDeclBody::Sum(vec![
            ast::VariantDecl {
                name: "Some".into(),
                fields: vec![ast::FieldDecl {
                    name: "value".into(),
                    ty: name_ty("T"),
                }],
                origin: Span::synthetic(),
            },
            ast::VariantDecl {
                name: "None".into(),
                fields: vec![],
                origin: Span::synthetic(),
            },
        ]),
        exported: false,
        origin: Span::synthetic(),
    }
}

#[test]
fn sum_declaration_registers_variant_constructors() {
    let wrap = func(
        "wrap",
        vec![param("x", name_ty("i32"))],
        Some(ast::TypeExpr::Generic {
            base: "Option".into(),
            args: vec![name_ty("i32")],
        }),
        call(var("Some"), vec![var("x")]),
    );
    let program = ast::Program::new(vec![
        ast::Decl::Type(option_decl()),
        ast::Decl::Func(wrap),
    ]);
    let module = lower(&program).unwrap();
    let wrap = only_func(&module);
    let body = wrap.body.as_ref().unwrap();
    assert_eq!(body.ty.to_string(), "Option<i32>");
    assert!(!body.ty.contains_vars());
}

#[test]
fn zero_argument_constructor_needs_no_arguments() {
    let none = func(
        "none",
        vec![],
        Some(ast::TypeExpr::Generic {
            base: "Option".into(),
            args: vec![name_ty("i32")],
        }),
        call(var("None"), vec![]),
    );
    let program = ast::Program::new(vec![
        ast::Decl::Type(option_decl()),
        ast::Decl::Func(none),
    ]);
    assert!(lower(&program).is_ok());
}

#[test]
fn constructor_fields_may_forward_reference_later_declarations() {
    let wrapper = ast::TypeDecl {
        name: "Wrapper".into(),
        type_params: vec![],
        body: ast::TypeDeclBody::Sum(vec![
            ast::VariantDecl {
                name: "Holds".into(),
                fields: vec![ast::FieldDecl {
                    name: "p".into(),
                    ty: name_ty("Point"),
                }],
                origin: Span::synthetic(),
            },
            ast::VariantDecl {
                name: "Empty".into(),
                fields: vec![],
                origin: Span::synthetic(),
            },
        ]),
        exported: false,
        origin: Span::synthetic(),
    };
    let point = ast::TypeDecl {
        name: "Point".into(),
        type_params: vec![],
        body: ast::TypeDeclBody::Record(vec![ast::FieldDecl {
            name: "x".into(),
            ty: name_ty("f64"),
        }]),
        exported: false,
        origin: Span::synthetic(),
    };
    let wrap = func(
        "wrap",
        vec![param("pt", name_ty("Point"))],
        Some(name_ty("Wrapper")),
        call(var("Holds"), vec![var("pt")]),
    );
    let program = ast::Program::new(vec![
        ast::Decl::Type(wrapper),
        ast::Decl::Type(point),
        ast::Decl::Func(wrap),
    ]);
    let module = lower(&program).unwrap();
    let wrap = only_func(&module);
    assert_eq!(wrap.body.as_ref().unwrap().ty.to_string(), "Wrapper");
}

#[test]
fn explicit_trailing_return_satisfies_the_declared_type() {
    let body = expr(ast::ExprKind::Block {
        stmts: vec![stmt(ast::StmtKind::Return(Some(int(1))))],
        result: None,
    });
    let program = ast::Program::new(vec![ast::Decl::Func(func(
        "one",
        vec![],
        Some(name_ty("i32")),
        body,
    ))]);
    let module = lower(&program).unwrap();
    let one = only_func(&module);
    assert_eq!(one.ret_type, Ty::i32());
}

struct MathScanner;

impl StdlibScanner for MathScanner {
    fn scan(&self, module: &str) -> Option<ModuleSignatures> {
        (module == "Math").then(|| ModuleSignatures {
            functions: vec![FunctionSig::new("sqrt", vec![], vec![Ty::f64()], Ty::f64())],
            types: vec![],
        })
    }
}

#[test]
fn module_member_access_rewrites_to_a_qualified_callable() {
    let scanner = MathScanner;
    let loader = FileModuleLoader;
    let resolver = ModulePathResolver::default();
    let importer = Importer::new(&scanner, &loader, &resolver);

    let body = call(member(var("Math"), "sqrt"), vec![var("x")]);
    let program = ast::Program {
        module: None,
        imports: vec![ast::ImportDecl {
            path: "Math".into(),
            items: None,
            alias: None,
            origin: Span::synthetic(),
        }],
        decls: vec![ast::Decl::Func(func(
            "root",
            vec![param("x", name_ty("f64"))],
            Some(name_ty("f64")),
            body,
        ))],
    };
    let module = Lowerer::new("main")
        .with_importer(importer)
        .lower_program(&program)
        .unwrap();
    let root = only_func(&module);
    let ir::ExprKind::Call { callee, .. } = &root.body.as_ref().unwrap().kind else {
        panic!("body should be a call");
    };
    assert_eq!(callee.kind, ir::ExprKind::Var("Math.sqrt".into()));
    assert!(matches!(callee.ty, Ty::Func { .. }));
}

#[test]
fn pipe_desugars_into_a_prefix_argument() {
    let inc = func(
        "inc",
        vec![param("x", name_ty("i32"))],
        Some(name_ty("i32")),
        expr(ast::ExprKind::Binary {
            op: ast::BinOp::Add,
            left: Box::new(var("x")),
            right: Box::new(int(1)),
        }),
    );
    let piped = func(
        "piped",
        vec![],
        Some(name_ty("i32")),
        expr(ast::ExprKind::Pipe {
            value: Box::new(int(41)),
            target: Box::new(var("inc")),
        }),
    );
    let program = ast::Program::new(vec![ast::Decl::Func(inc), ast::Decl::Func(piped)]);
    let module = lower(&program).unwrap();
    let piped = module
        .items
        .iter()
        .find_map(|item| match item {
            ir::Item::Func(f) if f.name == "piped" => Some(f),
            _ => None,
        })
        .unwrap();
    let ir::ExprKind::Call { args, .. } = &piped.body.as_ref().unwrap().kind else {
        panic!("pipe should lower to a call");
    };
    assert_eq!(args.len(), 1);
}

#[test]
fn passing_an_owned_value_twice_is_a_move_error() {
    let consume = ast::FuncDecl {
        name: "consume".into(),
        type_params: vec![],
        params: vec![param(
            "h",
            ast::TypeExpr::Generic {
                base: "Owned".into(),
                args: vec![name_ty("i32")],
            },
        )],
        ret_type: None,
        body: None,
        exported: false,
        external: true,
        origin: Span::synthetic(),
    };
    let body = expr(ast::ExprKind::Block {
        stmts: vec![
            stmt(ast::StmtKind::Expr(call(var("consume"), vec![var("h")]))),
            stmt(ast::StmtKind::Expr(call(var("consume"), vec![var("h")]))),
        ],
        result: None,
    });
    let twice = func(
        "twice",
        vec![param(
            "h",
            ast::TypeExpr::Generic {
                base: "Owned".into(),
                args: vec![name_ty("i32")],
            },
        )],
        None,
        body,
    );
    let program = ast::Program::new(vec![ast::Decl::Func(consume), ast::Decl::Func(twice)]);
    let err = lower(&program).unwrap_err();
    assert!(err.to_string().contains("use of moved value 'h'"));
}

#[test]
fn block_bindings_do_not_escape() {
    let body = expr(ast::ExprKind::Block {
        stmts: vec![stmt(ast::StmtKind::Expr(expr(ast::ExprKind::Block {
            stmts: vec![stmt(ast::StmtKind::Let {
                name: "inner".into(),
                ty: None,
                value: int(1),
                mutable: false,
            })],
            result: None,
        })))],
        result: Some(Box::new(var("inner"))),
    });
    let program = ast::Program::new(vec![ast::Decl::Func(func(
        "leaky",
        vec![],
        Some(name_ty("i32")),
        body,
    ))]);
    let err = lower(&program).unwrap_err();
    assert!(err.to_string().contains("undefined variable 'inner'"));
}

#[test]
fn unit_if_in_statement_position_becomes_an_if_statement() {
    let cond = expr(ast::ExprKind::Binary {
        op: ast::BinOp::Gt,
        left: Box::new(var("x")),
        right: Box::new(int(0)),
    });
    let print_call = call(var("println"), vec![var("x")]);
    let body = expr(ast::ExprKind::Block {
        stmts: vec![stmt(ast::StmtKind::Expr(expr(ast::ExprKind::If {
            cond: Box::new(cond),
            then_branch: Box::new(expr(ast::ExprKind::Block {
                stmts: vec![stmt(ast::StmtKind::Expr(print_call))],
                result: None,
            })),
            else_branch: None,
        })))],
        result: None,
    });
    let println = ast::FuncDecl {
        name: "println".into(),
        type_params: vec![],
        params: vec![param("x", name_ty("i32"))],
        ret_type: None,
        body: None,
        exported: false,
        external: true,
        origin: Span::synthetic(),
    };
    let program = ast::Program::new(vec![
        ast::Decl::Func(println),
        ast::Decl::Func(func("report", vec![param("x", name_ty("i32"))], None, body)),
    ]);
    let module = lower(&program).unwrap();
    let report = module
        .items
        .iter()
        .find_map(|item| match item {
            ir::Item::Func(f) if f.name == "report" => Some(f),
            _ => None,
        })
        .unwrap();
    let ir::ExprKind::Block { stmts, .. } = &report.body.as_ref().unwrap().kind else {
        panic!("body should be a block");
    };
    assert!(matches!(stmts[0], ir::Stmt::If { .. }));
}

#[test]
fn break_outside_a_loop_is_rejected() {
    let body = expr(ast::ExprKind::Block {
        stmts: vec![stmt(ast::StmtKind::Break)],
        result: None,
    });
    let program = ast::Program::new(vec![ast::Decl::Func(func("oops", vec![], None, body))]);
    let err = lower(&program).unwrap_err();
    assert!(err.to_string().contains("'break' outside of a loop"));
}

#[test]
fn static_method_calls_resolve_through_impls_to_mangled_names() {
    let point = ast::TypeDecl {
        name: "Point".into(),
        type_params: vec![],
        body: ast::TypeDeclBody::Record(vec![
            ast::FieldDecl {
                name: "x".into(),
                ty: name_ty("f64"),
            },
            ast::FieldDecl {
                name: "y".into(),
                ty: name_ty("f64"),
            },
        ]),
        exported: false,
        origin: Span::synthetic(),
    };
    let origin = func(
        "origin",
        vec![],
        Some(name_ty("Point")),
        expr(ast::ExprKind::Record {
            name: Some("Point".into()),
            fields: vec![
                ("x".into(), expr(ast::ExprKind::Literal(ast::Lit::Float(0.0)))),
                ("y".into(), expr(ast::ExprKind::Literal(ast::Lit::Float(0.0)))),
            ],
        }),
    );
    let imp = ast::ImplDecl {
        type_name: "Point".into(),
        trait_name: None,
        methods: vec![origin],
        origin: Span::synthetic(),
    };
    let user = func(
        "start",
        vec![],
        Some(name_ty("Point")),
        call(member(var("Point"), "origin"), vec![]),
    );
    let program = ast::Program::new(vec![
        ast::Decl::Type(point),
        ast::Decl::Impl(imp),
        ast::Decl::Func(user),
    ]);
    let module = lower(&program).unwrap();
    let start = module
        .items
        .iter()
        .find_map(|item| match item {
            ir::Item::Func(f) if f.name == "start" => Some(f),
            _ => None,
        })
        .unwrap();
    let ir::ExprKind::Call { callee, .. } = &start.body.as_ref().unwrap().kind else {
        panic!("body should be a call");
    };
    assert_eq!(callee.kind, ir::ExprKind::Var("Point_origin".into()));
    assert!(module.items.iter().any(|item| match item {
        ir::Item::Func(f) => f.name == "Point_origin",
        _ => false,
    }));
}

#[test]
fn match_on_a_sum_binds_variant_fields_at_instantiated_types() {
    let unwrap = func(
        "unwrap_or_zero",
        vec![param(
            "o",
            ast::TypeExpr::Generic {
                base: "Option".into(),
                args: vec![name_ty("i32")],
            },
        )],
        Some(name_ty("i32")),
        expr(ast::ExprKind::Match {
            scrutinee: Box::new(var("o")),
            arms: vec![
                ast::MatchArm {
                    pattern: ast::Pattern::Variant {
                        name: "Some".into(),
                        bindings: vec!["v".into()],
                    },
                    guard: None,
                    body: var("v"),
                    origin: Span::synthetic(),
                },
                ast::MatchArm {
                    pattern: ast::Pattern::Wildcard,
                    guard: None,
                    body: int(0),
                    origin: Span::synthetic(),
                },
            ],
        }),
    );
    let program = ast::Program::new(vec![
        ast::Decl::Type(option_decl()),
        ast::Decl::Func(unwrap),
    ]);
    let module = lower(&program).unwrap();
    let unwrap = only_func(&module);
    let body = unwrap.body.as_ref().unwrap();
    assert_eq!(body.ty, Ty::i32());
    let ir::ExprKind::Match { arms, .. } = &body.kind else {
        panic!("body should be a match");
    };
    let ir::Pattern::Variant { bindings, .. } = &arms[0].pattern else {
        panic!("first arm should be a variant pattern");
    };
    assert_eq!(bindings[0], ("v".to_string(), Ty::i32()));
}

#[test]
fn items_are_types_first_then_functions_in_declaration_order() {
    let one = func("one", vec![], Some(name_ty("i32")), int(1));
    let two = func("two", vec![], Some(name_ty("i32")), int(2));
    let program = ast::Program::new(vec![
        ast::Decl::Func(one),
        ast::Decl::Type(option_decl()),
        ast::Decl::Func(two),
    ]);
    let module = lower(&program).unwrap();
    let names: Vec<&str> = module.items.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["Option", "one", "two"]);
}
