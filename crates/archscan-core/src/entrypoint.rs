use std::collections::BTreeMap;

use crate::source::SourceUnit;
use crate::types::{Category, Diagnostic, ModuleId, Severity};

/// Check that each command module declares at most one entry point.
///
/// A unit declares when its `entry_points` set is non-empty. Zero
/// declarers in a module is not flagged here; that decision belongs to
/// the caller. With k >= 2 declarers (ordered by path), the first is
/// canonical and each of the k-1 excess declarers yields one Error
/// diagnostic naming all offending paths.
pub fn check_entry_points(units: &[SourceUnit]) -> Vec<Diagnostic> {
    let mut declarers: BTreeMap<&ModuleId, Vec<&SourceUnit>> = BTreeMap::new();
    for unit in units {
        if !unit.entry_points.is_empty() {
            declarers.entry(&unit.module_id).or_default().push(unit);
        }
    }

    let mut diagnostics = Vec::new();
    for (module_id, mut offenders) in declarers {
        if offenders.len() < 2 {
            continue;
        }
        offenders.sort_by(|a, b| a.path.cmp(&b.path));

        let all_paths: Vec<String> = offenders
            .iter()
            .map(|u| u.path.display().to_string())
            .collect();

        for excess in &offenders[1..] {
            let related = offenders
                .iter()
                .filter(|u| u.path != excess.path)
                .map(|u| u.start_position())
                .collect();
            diagnostics.push(
                Diagnostic::new(
                    Category::EntryPoint,
                    Severity::Error,
                    format!(
                        "module '{}' declares multiple entry points ({})",
                        module_id,
                        all_paths.join(", ")
                    ),
                    excess.start_position(),
                )
                .with_related(related),
            );
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{NodeKind, SyntaxNode};
    use crate::types::{ModuleId, Span};

    fn make_unit(path: &str, module: &str, entry: bool) -> SourceUnit {
        let unit = SourceUnit::new(
            path,
            ModuleId::new(module),
            SyntaxNode::leaf(NodeKind::Block, Span::new(0, 0)),
        );
        if entry {
            unit.with_entry_points(["main"])
        } else {
            unit
        }
    }

    #[test]
    fn test_single_entry_point_ok() {
        let units = vec![
            make_unit("cmd/api/main.go", "cmd/api", true),
            make_unit("cmd/api/server.go", "cmd/api", false),
        ];
        assert!(check_entry_points(&units).is_empty());
    }

    #[test]
    fn test_zero_entry_points_not_flagged() {
        let units = vec![make_unit("cmd/api/server.go", "cmd/api", false)];
        assert!(check_entry_points(&units).is_empty());
    }

    #[test]
    fn test_two_declarers_one_diagnostic() {
        let units = vec![
            make_unit("cmd/api/main.go", "cmd/api", true),
            make_unit("cmd/api/extra.go", "cmd/api", true),
        ];
        let diags = check_entry_points(&units);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::EntryPoint);
        assert_eq!(diags[0].severity, Severity::Error);
        // Excess declarer is the later path; first by path is canonical
        assert_eq!(diags[0].position.file.to_str(), Some("cmd/api/main.go"));
        assert!(diags[0].message.contains("cmd/api/extra.go"));
        assert!(diags[0].message.contains("cmd/api/main.go"));
        assert_eq!(diags[0].related.len(), 1);
    }

    #[test]
    fn test_three_declarers_two_diagnostics() {
        let units = vec![
            make_unit("cmd/api/a.go", "cmd/api", true),
            make_unit("cmd/api/b.go", "cmd/api", true),
            make_unit("cmd/api/c.go", "cmd/api", true),
        ];
        let diags = check_entry_points(&units);
        assert_eq!(diags.len(), 2);
        for diag in &diags {
            assert_eq!(diag.related.len(), 2);
        }
    }

    #[test]
    fn test_modules_checked_independently() {
        let units = vec![
            make_unit("cmd/api/main.go", "cmd/api", true),
            make_unit("cmd/worker/main.go", "cmd/worker", true),
        ];
        assert!(check_entry_points(&units).is_empty());
    }
}
