use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::graph::DependencyGraph;
use crate::types::{Category, Diagnostic, ModuleId, Severity, SourcePosition};

/// A closed simple walk through the dependency graph: first and last
/// element identical, no repeated interior nodes. A self-import is the
/// degenerate `[a, a]` cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle(pub Vec<ModuleId>);

impl Cycle {
    /// Walk edges as (from, to) pairs.
    pub fn edges(&self) -> impl Iterator<Item = (&ModuleId, &ModuleId)> {
        self.0.windows(2).map(|w| (&w[0], &w[1]))
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.0.iter().map(ModuleId::as_str).collect();
        write!(f, "{}", parts.join(" -> "))
    }
}

/// Find every cycle-bearing strongly-connected component and
/// materialize one minimal simple cycle per component.
///
/// Tarjan's algorithm runs once over the whole graph; each component
/// with two or more nodes, plus each single node with a self-loop,
/// yields exactly one cycle. Reconstruction is a breadth-first
/// shortest-return-path search from the lexicographically smallest
/// module of the component, neighbors expanded in ascending order, so
/// the reported cycle is minimal and output is byte-identical across
/// runs on identical input.
pub fn detect_cycles(graph: &DependencyGraph) -> Result<Vec<Cycle>, EngineError> {
    let inner = graph.inner();
    let sccs = petgraph::algo::tarjan_scc(inner);

    let mut cycles = Vec::new();
    for scc in sccs {
        if scc.len() == 1 {
            let id = &inner[scc[0]];
            if graph.has_self_loop(id) {
                cycles.push(Cycle(vec![id.clone(), id.clone()]));
            }
            continue;
        }

        let component: HashSet<&ModuleId> = scc.iter().map(|&idx| &inner[idx]).collect();
        let start = component
            .iter()
            .min()
            .copied()
            .ok_or_else(|| EngineError::InvariantViolation("empty SCC from Tarjan".to_string()))?;

        let cycle = reconstruct_cycle(graph, &component, start).ok_or_else(|| {
            // A >= 2-node SCC always contains a cycle; reaching this
            // branch means the graph and the SCC disagree.
            EngineError::InvariantViolation(format!(
                "no cycle reconstructible in {}-node strongly-connected component containing '{start}'",
                component.len()
            ))
        })?;
        cycles.push(cycle);
    }

    cycles.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(cycles)
}

/// Breadth-first search restricted to one component, neighbors
/// expanded in ascending ModuleId order. The first edge found leading
/// back to `start` closes a shortest return path, so the reported
/// cycle is minimal; among equal-length cycles the ascending expansion
/// order picks the lexicographically earliest branch.
fn reconstruct_cycle(
    graph: &DependencyGraph,
    component: &HashSet<&ModuleId>,
    start: &ModuleId,
) -> Option<Cycle> {
    let mut parent: HashMap<ModuleId, ModuleId> = HashMap::new();
    let mut visited: HashSet<ModuleId> = HashSet::from([start.clone()]);
    let mut queue: VecDeque<ModuleId> = VecDeque::from([start.clone()]);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors_sorted(&current) {
            if next == start {
                return close_walk(&parent, start, &current);
            }
            if !component.contains(next) || visited.contains(next) {
                continue;
            }
            visited.insert(next.clone());
            parent.insert(next.clone(), current.clone());
            queue.push_back(next.clone());
        }
    }
    None
}

/// Rebuild the walk start -> ... -> `last` -> start from the BFS
/// parent links. A broken parent chain yields None, which the caller
/// surfaces as an invariant violation.
fn close_walk(
    parent: &HashMap<ModuleId, ModuleId>,
    start: &ModuleId,
    last: &ModuleId,
) -> Option<Cycle> {
    let mut reversed = Vec::new();
    let mut node = last.clone();
    while node != *start {
        reversed.push(node.clone());
        node = parent.get(&node)?.clone();
    }
    let mut walk = vec![start.clone()];
    walk.extend(reversed.into_iter().rev());
    walk.push(start.clone());
    Some(Cycle(walk))
}

/// Convert one cycle into an ImportCycle diagnostic. The primary
/// position is the import statement behind the first edge; related
/// positions cover every edge of the walk in order.
pub fn cycle_diagnostic(graph: &DependencyGraph, cycle: &Cycle) -> Diagnostic {
    let positions: Vec<SourcePosition> = cycle
        .edges()
        .filter_map(|(from, to)| graph.edge_position(from, to).cloned())
        .collect();

    let primary = positions
        .first()
        .cloned()
        .unwrap_or_else(|| SourcePosition::new("<unknown>", 0));

    Diagnostic::new(
        Category::ImportCycle,
        Severity::Error,
        format!("circular module dependency: {cycle}"),
        primary,
    )
    .with_related(positions)
}
