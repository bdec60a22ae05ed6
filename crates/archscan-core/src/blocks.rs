use serde::{Deserialize, Serialize};

use crate::fingerprint::{fingerprint, StructuralFingerprint};
use crate::source::{ControlKind, NodeKind, SourceUnit, SyntaxNode, UnitId};
use crate::types::Span;

/// One duplication candidate: a qualifying subtree of one unit.
/// Ephemeral; lives only for the duration of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub unit: UnitId,
    pub span: Span,
    pub approx_token_count: usize,
    pub fingerprint: StructuralFingerprint,
}

/// Walk one unit's syntax tree and collect every candidate block whose
/// descendant node count meets the threshold.
///
/// Candidates are function bodies, block statements, and branching or
/// looping constructs. Nested qualifying blocks are extracted
/// independently: a large function yields both its body and any
/// qualifying inner block, so duplication surfaces at whatever
/// granularity it occurs.
pub fn extract_blocks(unit_id: UnitId, unit: &SourceUnit, min_tokens: usize) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    collect(unit_id, &unit.syntax_root, min_tokens, &mut blocks);
    blocks
}

fn collect(unit_id: UnitId, node: &SyntaxNode, min_tokens: usize, out: &mut Vec<CodeBlock>) {
    if is_candidate(&node.kind) {
        let count = node.node_count();
        if count >= min_tokens {
            out.push(CodeBlock {
                unit: unit_id,
                span: node.span,
                approx_token_count: count,
                fingerprint: fingerprint(node),
            });
        }
    }
    for child in &node.children {
        collect(unit_id, child, min_tokens, out);
    }
}

fn is_candidate(kind: &NodeKind) -> bool {
    match kind {
        NodeKind::Block => true,
        NodeKind::Control(c) => match c {
            ControlKind::If | ControlKind::For | ControlKind::While | ControlKind::Switch => true,
            ControlKind::Return => false,
        },
        NodeKind::Declaration(_) | NodeKind::Expression(_) => false,
        NodeKind::Identifier(_) | NodeKind::Literal(_) => false,
    }
}
