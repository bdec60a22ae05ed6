use archscan_core::source::{
    BinaryOp, ControlKind, DeclKind, ExprKind, Import, LiteralKind, NodeKind, SourceUnit,
    SyntaxNode,
};
use archscan_core::{AnalysisConfig, AnalysisEngine, Category, ModuleId, Span};

fn ident(name: &str, at: usize) -> SyntaxNode {
    SyntaxNode::leaf(
        NodeKind::Identifier(name.to_string()),
        Span::new(at, at + name.len()),
    )
}

fn int_lit(at: usize) -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Literal(LiteralKind::Int), Span::new(at, at + 2))
}

fn binary_stmt(lhs: &str, rhs: &str, at: usize) -> SyntaxNode {
    SyntaxNode::new(
        NodeKind::Expression(ExprKind::Binary(BinaryOp::Add)),
        Span::new(at, at + 8),
        vec![ident(lhs, at), ident(rhs, at + 4)],
    )
}

/// `if cond { return <lit> } else { return <lit> }` - 8 nodes.
fn if_return_stmt(cond: &str, at: usize) -> SyntaxNode {
    let branch = |off: usize| {
        SyntaxNode::new(
            NodeKind::Block,
            Span::new(off, off + 12),
            vec![SyntaxNode::new(
                NodeKind::Control(ControlKind::Return),
                Span::new(off + 2, off + 10),
                vec![int_lit(off + 9)],
            )],
        )
    };
    SyntaxNode::new(
        NodeKind::Control(ControlKind::If),
        Span::new(at, at + 40),
        vec![ident(cond, at + 3), branch(at + 10), branch(at + 25)],
    )
}

/// Function whose 15-node body qualifies for duplication candidacy
/// while every inner construct stays below the default threshold.
fn fn_with_branchy_body(cond: &str, a: &str, b: &str, at: usize) -> SyntaxNode {
    let body = SyntaxNode::new(
        NodeKind::Block,
        Span::new(at + 5, at + 90),
        vec![
            if_return_stmt(cond, at + 8),
            binary_stmt(a, b, at + 52),
            binary_stmt(b, a, at + 64),
        ],
    );
    SyntaxNode::new(
        NodeKind::Declaration(DeclKind::Function),
        Span::new(at, at + 95),
        vec![ident("f", at), body],
    )
}

fn tiny_root() -> SyntaxNode {
    SyntaxNode::leaf(NodeKind::Block, Span::new(0, 0))
}

fn unit(path: &str, module: &str, root: SyntaxNode) -> SourceUnit {
    SourceUnit::new(path, ModuleId::new(module), root)
}

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(AnalysisConfig::default()).unwrap()
}

fn by_category(diags: &[archscan_core::Diagnostic], category: Category) -> Vec<&archscan_core::Diagnostic> {
    diags.iter().filter(|d| d.category == category).collect()
}

#[test]
fn scenario_three_module_import_cycle() {
    let import = |from: &str, to: &str| {
        Import::new(
            to,
            archscan_core::SourcePosition::new(format!("{from}/mod.go"), 10),
        )
    };
    let units = vec![
        unit("a/mod.go", "a", tiny_root()).with_imports(vec![import("a", "b")]),
        unit("b/mod.go", "b", tiny_root()).with_imports(vec![import("b", "c")]),
        unit("c/mod.go", "c", tiny_root()).with_imports(vec![import("c", "a")]),
    ];
    let diags = engine().analyze(&units).unwrap();
    let cycles = by_category(&diags, Category::ImportCycle);
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].message.contains("a -> b -> c -> a"));
    assert_eq!(cycles[0].related.len(), 3);
}

#[test]
fn scenario_duplicated_control_flow_across_units() {
    // Same shape, different identifier spellings and literal values
    let units = vec![
        unit(
            "pkg/orders.go",
            "pkg",
            fn_with_branchy_body("ready", "total", "count", 0),
        ),
        unit(
            "pkg/users.go",
            "pkg",
            fn_with_branchy_body("active", "limit", "seen", 0),
        ),
    ];
    let diags = engine().analyze(&units).unwrap();
    let dups = by_category(&diags, Category::Duplication);
    assert_eq!(dups.len(), 1, "both bodies should land in one group");
    assert!(dups[0].message.contains("2 occurrences"));
    assert_eq!(dups[0].position.file.to_str(), Some("pkg/orders.go"));
    assert_eq!(dups[0].related.len(), 1);
}

#[test]
fn scenario_camel_case_file_name() {
    let units = vec![unit("pkg/UserService.go", "pkg", tiny_root())];
    let diags = engine().analyze(&units).unwrap();
    let naming = by_category(&diags, Category::Naming);
    assert_eq!(naming.len(), 1);
    assert!(naming[0].message.contains("user_service.go"));
}

#[test]
fn scenario_two_entry_points_in_one_command_module() {
    let units = vec![
        unit("cmd/api/main.go", "cmd/api", tiny_root()).with_entry_points(["main"]),
        unit("cmd/api/worker.go", "cmd/api", tiny_root()).with_entry_points(["main"]),
    ];
    let diags = engine().analyze(&units).unwrap();
    let entry = by_category(&diags, Category::EntryPoint);
    assert_eq!(entry.len(), 1);
    assert!(entry[0].message.contains("cmd/api/main.go"));
    assert!(entry[0].message.contains("cmd/api/worker.go"));
}

#[test]
fn scenario_below_threshold_duplicates_not_reported() {
    // 5-node block (block + two 2-node returns), triplicated
    let small = || {
        SyntaxNode::new(
            NodeKind::Block,
            Span::new(0, 20),
            vec![
                SyntaxNode::new(
                    NodeKind::Control(ControlKind::Return),
                    Span::new(2, 8),
                    vec![int_lit(9)],
                ),
                SyntaxNode::new(
                    NodeKind::Control(ControlKind::Return),
                    Span::new(10, 16),
                    vec![int_lit(17)],
                ),
            ],
        )
    };
    let units = vec![
        unit("pkg/one.go", "pkg", small()),
        unit("pkg/two.go", "pkg", small()),
        unit("pkg/three.go", "pkg", small()),
    ];
    let diags = engine().analyze(&units).unwrap();
    assert!(by_category(&diags, Category::Duplication).is_empty());
}

#[test]
fn full_pipeline_is_deterministic() {
    let import = |from: &str, to: &str| {
        Import::new(
            to,
            archscan_core::SourcePosition::new(format!("{from}/mod.go"), 4),
        )
    };
    let units = vec![
        unit("cmd/api/Main.go", "cmd/api", tiny_root()).with_entry_points(["main"]),
        unit("cmd/api/server.go", "cmd/api", tiny_root()).with_entry_points(["main"]),
        unit("a/mod.go", "a", fn_with_branchy_body("x", "y", "z", 0))
            .with_imports(vec![import("a", "b")]),
        unit("b/mod.go", "b", fn_with_branchy_body("p", "q", "r", 0))
            .with_imports(vec![import("b", "a")]),
    ];
    let eng = engine();
    let first = eng.analyze(&units).unwrap();
    let second = eng.analyze(&units).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn independent_analyzers_all_report_in_one_run() {
    let units = vec![
        unit("cmd/api/Main.go", "cmd/api", tiny_root())
            .with_entry_points(["main"])
            .with_imports(vec![Import::new(
                "cmd/api",
                archscan_core::SourcePosition::new("cmd/api/Main.go", 4),
            )]),
        unit("cmd/api/second.go", "cmd/api", tiny_root()).with_entry_points(["main"]),
    ];
    let diags = engine().analyze(&units).unwrap();
    assert_eq!(by_category(&diags, Category::Naming).len(), 1);
    assert_eq!(by_category(&diags, Category::EntryPoint).len(), 1);
    // Self-import is a degenerate single-node cycle
    assert_eq!(by_category(&diags, Category::ImportCycle).len(), 1);
}

#[test]
fn malformed_import_degrades_to_warning() {
    let units = vec![
        unit("a/mod.go", "a", tiny_root()).with_imports(vec![Import::new(
            "not a module",
            archscan_core::SourcePosition::new("a/mod.go", 4),
        )]),
        unit("b/mod.go", "b", tiny_root()),
    ];
    let diags = engine().analyze(&units).unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, archscan_core::Severity::Warning);
    assert!(diags[0].message.contains("malformed import"));
}

#[test]
fn diagnostics_serialize_round_trip() {
    let units = vec![unit("pkg/BadName.go", "pkg", tiny_root())];
    let diags = engine().analyze(&units).unwrap();
    let json = serde_json::to_string(&diags).unwrap();
    let back: Vec<archscan_core::Diagnostic> = serde_json::from_str(&json).unwrap();
    assert_eq!(diags, back);
}
