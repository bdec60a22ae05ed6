use std::collections::HashMap;

use crate::blocks::CodeBlock;
use crate::fingerprint::StructuralFingerprint;
use crate::source::SourceUnit;
use crate::types::{Category, Diagnostic, Severity, SourcePosition};

/// Members of a surviving group stay within this fraction of the
/// group's maximum token count. Guards against hash collisions between
/// structurally similar but differently sized blocks.
const SIZE_SIMILARITY: f64 = 0.8;

/// Group candidate blocks by fingerprint and report each surviving
/// group as one Duplication diagnostic.
///
/// Singleton groups are discarded; within a group, blocks deviating
/// more than 20% below the group's maximum token count are dropped and
/// the group is re-checked. Groups are ordered by first occurrence.
/// The first occurrence becomes the primary position; up to
/// `max_reported` further occurrences become related positions, with a
/// count of anything beyond the cap folded into the message.
pub fn group_duplicates(
    blocks: &[CodeBlock],
    units: &[SourceUnit],
    max_reported: usize,
) -> Vec<Diagnostic> {
    let mut groups: HashMap<StructuralFingerprint, Vec<&CodeBlock>> = HashMap::new();
    for block in blocks {
        groups.entry(block.fingerprint).or_default().push(block);
    }

    let mut surviving: Vec<Vec<&CodeBlock>> = Vec::new();
    for (_, mut members) in groups {
        if members.len() < 2 {
            continue;
        }
        members.sort_by_key(|b| (b.unit, b.span.start));

        let max_count = members
            .iter()
            .map(|b| b.approx_token_count)
            .max()
            .unwrap_or(0);
        let floor = (max_count as f64 * SIZE_SIMILARITY).ceil() as usize;
        members.retain(|b| b.approx_token_count >= floor);
        if members.len() < 2 {
            continue;
        }
        surviving.push(members);
    }

    surviving.sort_by_key(|members| (members[0].unit, members[0].span.start));

    surviving
        .into_iter()
        .map(|members| {
            let total = members.len();
            let primary = position_of(members[0], units);
            let related: Vec<SourcePosition> = members[1..]
                .iter()
                .take(max_reported)
                .map(|b| position_of(b, units))
                .collect();
            let beyond_cap = total.saturating_sub(1 + max_reported);
            // The similarity filter is anchored on the group max, so
            // the message reports that same figure
            let max_count = members
                .iter()
                .map(|b| b.approx_token_count)
                .max()
                .unwrap_or(0);

            let mut message =
                format!("duplicated code block ({total} occurrences, ~{max_count} tokens)");
            if beyond_cap > 0 {
                message.push_str(&format!("; {beyond_cap} further occurrences not listed"));
            }

            Diagnostic::new(Category::Duplication, Severity::Warning, message, primary)
                .with_related(related)
        })
        .collect()
}

fn position_of(block: &CodeBlock, units: &[SourceUnit]) -> SourcePosition {
    SourcePosition::new(units[block.unit.0].path.clone(), block.span.start)
}
