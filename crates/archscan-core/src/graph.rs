use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

use crate::source::SourceUnit;
use crate::types::{Category, Diagnostic, ModuleId, Severity, SourcePosition};

/// Edge payload: the location of the import statement that created the
/// edge. When the same (from, to) pair appears several times, the first
/// import's position is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgePayload {
    pub position: SourcePosition,
}

/// Directed dependency graph of analyzed modules, keyed by ModuleId.
pub struct DependencyGraph {
    graph: DiGraph<ModuleId, EdgePayload>,
    index: HashMap<ModuleId, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Build the graph from all units in the current run.
    ///
    /// Only imports whose target is a module known in this run become
    /// edges; external targets are dropped (they cannot contribute to
    /// an internal cycle). Malformed import strings are skipped with a
    /// Warning diagnostic each; those warnings carry
    /// `Category::ImportCycle`, the import analyzer's category, and are
    /// distinguishable from actual cycles by their `malformed import`
    /// message prefix and Warning severity.
    pub fn build(units: &[SourceUnit]) -> (Self, Vec<Diagnostic>) {
        let mut graph = Self::new();
        let mut diagnostics = Vec::new();

        let known: HashSet<&str> = units.iter().map(|u| u.module_id.as_str()).collect();

        for unit in units {
            graph.ensure_node(&unit.module_id);
        }

        let mut seen_edges: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
        for unit in units {
            let from = graph.ensure_node(&unit.module_id);
            for import in &unit.imports {
                if is_malformed(&import.target) {
                    diagnostics.push(Diagnostic::new(
                        Category::ImportCycle,
                        Severity::Warning,
                        format!(
                            "malformed import '{}' in '{}' skipped",
                            import.target,
                            unit.path.display()
                        ),
                        import.position.clone(),
                    ));
                    continue;
                }
                if !known.contains(import.target.as_str()) {
                    continue;
                }
                let to = graph.ensure_node(&ModuleId::new(import.target.clone()));
                if seen_edges.insert((from, to)) {
                    graph.graph.add_edge(
                        from,
                        to,
                        EdgePayload {
                            position: import.position.clone(),
                        },
                    );
                }
            }
        }

        (graph, diagnostics)
    }

    fn ensure_node(&mut self, id: &ModuleId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.index.contains_key(id)
    }

    /// Successors of a module, sorted ascending for deterministic walks.
    pub fn neighbors_sorted(&self, id: &ModuleId) -> Vec<&ModuleId> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&ModuleId> = self.graph.neighbors(idx).map(|n| &self.graph[n]).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Position of the import statement behind the (from, to) edge.
    pub fn edge_position(&self, from: &ModuleId, to: &ModuleId) -> Option<&SourcePosition> {
        let from_idx = *self.index.get(from)?;
        let to_idx = *self.index.get(to)?;
        self.graph
            .find_edge(from_idx, to_idx)
            .map(|e| &self.graph[e].position)
    }

    /// Whether a module imports itself.
    pub fn has_self_loop(&self, id: &ModuleId) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| self.graph.find_edge(idx, idx).is_some())
    }

    pub(crate) fn inner(&self) -> &DiGraph<ModuleId, EdgePayload> {
        &self.graph
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Malformed: empty after trimming, or internal whitespace.
fn is_malformed(target: &str) -> bool {
    let trimmed = target.trim();
    trimmed.is_empty() || trimmed.chars().any(char::is_whitespace)
}
