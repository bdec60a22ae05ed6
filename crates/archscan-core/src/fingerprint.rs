use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::source::{
    BinaryOp, ControlKind, DeclKind, ExprKind, LiteralKind, NodeKind, SyntaxNode, UnaryOp,
};

/// Digest over a subtree's canonical token stream. Two fingerprints are
/// equal iff the underlying streams are byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralFingerprint([u8; 32]);

impl fmt::Display for StructuralFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Fingerprint one subtree.
///
/// Pre-order traversal: identifiers contribute a fixed marker (never
/// their spelling), literals contribute only their kind marker, and all
/// other nodes contribute kind plus operator tags. Subtree boundaries
/// are delimited so `f(a, b)` and `f(a)(b)` cannot collide. The result
/// preserves shape and operator semantics while discarding naming
/// noise: `a+b` collides with `c+d`, never with `a-b`.
pub fn fingerprint(node: &SyntaxNode) -> StructuralFingerprint {
    let mut hasher = Sha256::new();
    feed(node, &mut hasher);
    StructuralFingerprint(hasher.finalize().into())
}

fn feed(node: &SyntaxNode, hasher: &mut Sha256) {
    hasher.update(b"(");
    hasher.update(kind_tag(&node.kind));
    for child in &node.children {
        feed(child, hasher);
    }
    hasher.update(b")");
}

fn kind_tag(kind: &NodeKind) -> &'static [u8] {
    match kind {
        NodeKind::Declaration(d) => match d {
            DeclKind::Function => b"DECL:FN",
            DeclKind::Type => b"DECL:TY",
            DeclKind::Const => b"DECL:CONST",
            DeclKind::Var => b"DECL:VAR",
        },
        NodeKind::Block => b"BLOCK",
        NodeKind::Control(c) => match c {
            ControlKind::If => b"CTRL:IF",
            ControlKind::For => b"CTRL:FOR",
            ControlKind::While => b"CTRL:WHILE",
            ControlKind::Switch => b"CTRL:SWITCH",
            ControlKind::Return => b"CTRL:RET",
        },
        NodeKind::Expression(e) => match e {
            ExprKind::Binary(op) => match op {
                BinaryOp::Add => b"BIN:ADD",
                BinaryOp::Sub => b"BIN:SUB",
                BinaryOp::Mul => b"BIN:MUL",
                BinaryOp::Div => b"BIN:DIV",
                BinaryOp::Rem => b"BIN:REM",
                BinaryOp::Eq => b"BIN:EQ",
                BinaryOp::Ne => b"BIN:NE",
                BinaryOp::Lt => b"BIN:LT",
                BinaryOp::Le => b"BIN:LE",
                BinaryOp::Gt => b"BIN:GT",
                BinaryOp::Ge => b"BIN:GE",
                BinaryOp::And => b"BIN:AND",
                BinaryOp::Or => b"BIN:OR",
            },
            ExprKind::Unary(op) => match op {
                UnaryOp::Neg => b"UN:NEG",
                UnaryOp::Not => b"UN:NOT",
                UnaryOp::Deref => b"UN:DEREF",
                UnaryOp::Ref => b"UN:REF",
            },
            ExprKind::Call => b"EXPR:CALL",
            ExprKind::Index => b"EXPR:INDEX",
            ExprKind::Member => b"EXPR:MEMBER",
            ExprKind::Assign => b"EXPR:ASSIGN",
        },
        // Spelling is deliberately not hashed
        NodeKind::Identifier(_) => b"ID",
        NodeKind::Literal(l) => match l {
            LiteralKind::Int => b"LIT:INT",
            LiteralKind::Float => b"LIT:FLOAT",
            LiteralKind::Str => b"LIT:STR",
            LiteralKind::Bool => b"LIT:BOOL",
            LiteralKind::Char => b"LIT:CHAR",
            LiteralKind::Nil => b"LIT:NIL",
        },
    }
}
