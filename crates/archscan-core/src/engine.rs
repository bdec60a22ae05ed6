use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::blocks::{self, CodeBlock};
use crate::config::AnalysisConfig;
use crate::cycles;
use crate::duplicates;
use crate::entrypoint;
use crate::error::EngineError;
use crate::graph::DependencyGraph;
use crate::naming;
use crate::source::{SourceUnit, UnitId};
use crate::types::Diagnostic;

/// The analysis engine: runs the four analyzers over one run's units
/// and returns a flat, ordered diagnostic list.
///
/// Analyzers share only the SourceUnit model, never internal state; a
/// failure in one degrades to a Warning diagnostic instead of aborting
/// the run. Only configuration errors and internal invariant
/// violations surface as `Err`.
pub struct AnalysisEngine {
    config: AnalysisConfig,
    filename_pattern: Regex,
}

impl AnalysisEngine {
    /// Validate the configuration and build an engine. Invalid
    /// configuration is rejected here, before any analysis starts.
    pub fn new(config: AnalysisConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let filename_pattern = Regex::new(&config.filename_pattern)
            .map_err(|e| EngineError::Config(format!("invalid filename_pattern: {e}")))?;
        Ok(Self {
            config,
            filename_pattern,
        })
    }

    /// Analyze one run's units.
    ///
    /// The per-unit phase (naming checks, block extraction and
    /// fingerprinting) runs in parallel with no shared mutable state.
    /// The whole-program phase (dependency graph, cycle detection,
    /// entry-point grouping, duplicate grouping) runs after the join,
    /// since it needs the complete unit set. Diagnostics are stably
    /// sorted by primary position, then category.
    pub fn analyze(&self, units: &[SourceUnit]) -> Result<Vec<Diagnostic>, EngineError> {
        debug!(units = units.len(), "starting analysis run");

        let per_unit: Vec<(Vec<Diagnostic>, Vec<CodeBlock>)> = units
            .par_iter()
            .enumerate()
            .map(|(i, unit)| {
                let naming_diags = naming::check_file_name(
                    unit,
                    &self.filename_pattern,
                    &self.config.generated_file_suffixes,
                );
                let unit_blocks =
                    blocks::extract_blocks(UnitId(i), unit, self.config.min_duplicate_tokens);
                (naming_diags, unit_blocks)
            })
            .collect();

        let mut diagnostics = Vec::new();
        let mut all_blocks = Vec::new();
        for (unit_diags, unit_blocks) in per_unit {
            diagnostics.extend(unit_diags);
            all_blocks.extend(unit_blocks);
        }
        debug!(candidates = all_blocks.len(), "per-unit phase complete");

        let (graph, import_diags) = DependencyGraph::build(units);
        diagnostics.extend(import_diags);

        let found_cycles = cycles::detect_cycles(&graph)?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            cycles = found_cycles.len(),
            "dependency graph analyzed"
        );
        diagnostics.extend(
            found_cycles
                .iter()
                .map(|cycle| cycles::cycle_diagnostic(&graph, cycle)),
        );

        diagnostics.extend(entrypoint::check_entry_points(units));

        diagnostics.extend(duplicates::group_duplicates(
            &all_blocks,
            units,
            self.config.max_reported_duplicates_per_group,
        ));

        diagnostics.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.category.cmp(&b.category))
        });
        debug!(diagnostics = diagnostics.len(), "analysis run complete");
        Ok(diagnostics)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}
