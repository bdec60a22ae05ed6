use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::types::{ModuleId, SourcePosition, Span};

/// Stable index of a SourceUnit within one analysis run's unit slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub usize);

/// A single import statement: target module path plus the statement's
/// own location, so cycle diagnostics can point at the edge's origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub target: String,
    pub position: SourcePosition,
}

impl Import {
    pub fn new(target: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            target: target.into(),
            position,
        }
    }
}

/// One compilation unit: a parsed source file with its module identity,
/// imports, syntax tree, and declared entry-point symbols. Immutable
/// after construction; owned by the run that created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub module_id: ModuleId,
    pub imports: Vec<Import>,
    pub syntax_root: SyntaxNode,
    pub entry_points: BTreeSet<String>,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, module_id: ModuleId, syntax_root: SyntaxNode) -> Self {
        Self {
            path: path.into(),
            module_id,
            imports: Vec::new(),
            syntax_root,
            entry_points: BTreeSet::new(),
        }
    }

    pub fn with_imports(mut self, imports: Vec<Import>) -> Self {
        self.imports = imports;
        self
    }

    pub fn with_entry_points<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_points = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// File name component of the unit's path, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// Position pointing at the start of this unit's file.
    pub fn start_position(&self) -> SourcePosition {
        SourcePosition::new(self.path.clone(), 0)
    }
}

/// Kind of declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclKind {
    Function,
    Type,
    Const,
    Var,
}

/// Kind of control-flow statement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    If,
    For,
    While,
    Switch,
    Return,
}

/// Binary operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Unary operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    Deref,
    Ref,
}

/// Kind of expression node. Binary and unary expressions carry their
/// operator so fingerprints distinguish `a+b` from `a-b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprKind {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Call,
    Index,
    Member,
    Assign,
}

/// Kind of literal node. Values are not carried into fingerprints,
/// only the kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Int,
    Float,
    Str,
    Bool,
    Char,
    Nil,
}

/// Closed set of syntax node kinds relevant to analysis. Adding a kind
/// forces every traversal to handle it at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Declaration(DeclKind),
    Block,
    Control(ControlKind),
    Expression(ExprKind),
    Identifier(String),
    Literal(LiteralKind),
}

/// One node of a unit's read-only syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Span, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            span,
            children,
        }
    }

    pub fn leaf(kind: NodeKind, span: Span) -> Self {
        Self::new(kind, span, Vec::new())
    }

    /// Number of nodes in this subtree, including the root. Used as the
    /// approximate token count for duplication thresholds.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> SyntaxNode {
        SyntaxNode::leaf(NodeKind::Identifier(name.to_string()), Span::new(0, 1))
    }

    #[test]
    fn test_node_count_single() {
        assert_eq!(ident("x").node_count(), 1);
    }

    #[test]
    fn test_node_count_nested() {
        let add = SyntaxNode::new(
            NodeKind::Expression(ExprKind::Binary(BinaryOp::Add)),
            Span::new(0, 5),
            vec![ident("a"), ident("b")],
        );
        let block = SyntaxNode::new(NodeKind::Block, Span::new(0, 10), vec![add]);
        assert_eq!(block.node_count(), 4);
    }

    #[test]
    fn test_unit_builders() {
        let root = SyntaxNode::leaf(NodeKind::Block, Span::new(0, 0));
        let unit = SourceUnit::new("cmd/api/main.go", ModuleId::new("cmd/api"), root)
            .with_imports(vec![Import::new(
                "pkg/db",
                SourcePosition::new("cmd/api/main.go", 12),
            )])
            .with_entry_points(["main"]);
        assert_eq!(unit.file_name(), Some("main.go"));
        assert_eq!(unit.imports.len(), 1);
        assert!(unit.entry_points.contains("main"));
        assert_eq!(unit.start_position().offset, 0);
    }
}
