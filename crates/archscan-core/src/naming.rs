use regex::Regex;

use crate::source::SourceUnit;
use crate::types::{Category, Diagnostic, Severity};

/// Check one unit's file name against the configured pattern.
///
/// Generated files (stem ending in one of `generated_suffixes`) are
/// skipped entirely. Pure function; returns zero or one diagnostics.
pub fn check_file_name(
    unit: &SourceUnit,
    pattern: &Regex,
    generated_suffixes: &[String],
) -> Vec<Diagnostic> {
    let Some(name) = unit.file_name() else {
        return Vec::new();
    };

    if is_generated(name, generated_suffixes) {
        return Vec::new();
    }

    if pattern.is_match(name) {
        return Vec::new();
    }

    let suggestion = suggest_name(name);
    vec![Diagnostic::new(
        Category::Naming,
        Severity::Warning,
        format!("file name '{name}' violates naming convention; rename to '{suggestion}'"),
        unit.start_position(),
    )]
}

/// True when the file stem (name without its final extension) ends with
/// one of the configured generated-file suffixes.
fn is_generated(name: &str, suffixes: &[String]) -> bool {
    let stem = match name.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => name,
    };
    suffixes.iter().any(|s| stem.ends_with(s.as_str()))
}

/// Suggested replacement: camelCase split into snake_case, hyphens
/// mapped to underscores, everything lowered.
fn suggest_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '-' {
            out.push('_');
            prev_lower = false;
        } else if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{NodeKind, SyntaxNode};
    use crate::types::{ModuleId, Span};

    fn make_unit(path: &str) -> SourceUnit {
        SourceUnit::new(
            path,
            ModuleId::new("pkg"),
            SyntaxNode::leaf(NodeKind::Block, Span::new(0, 0)),
        )
    }

    fn default_pattern() -> Regex {
        Regex::new(r"^[a-z][a-z0-9_]*(_test)?\.[a-z0-9]+$").unwrap()
    }

    fn suffixes() -> Vec<String> {
        vec!["_gen".into(), "_generated".into(), ".pb".into()]
    }

    #[test]
    fn test_valid_names_pass() {
        let pattern = default_pattern();
        for name in ["user.go", "user_service.go", "user_service_test.go"] {
            let diags = check_file_name(&make_unit(name), &pattern, &suffixes());
            assert!(diags.is_empty(), "{name} should pass");
        }
    }

    #[test]
    fn test_camel_case_rejected_with_suggestion() {
        let diags = check_file_name(&make_unit("UserService.go"), &default_pattern(), &suffixes());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::Naming);
        assert_eq!(diags[0].severity, Severity::Warning);
        assert!(diags[0].message.contains("user_service.go"));
    }

    #[test]
    fn test_hyphen_rejected_with_suggestion() {
        let diags = check_file_name(&make_unit("user-service.go"), &default_pattern(), &suffixes());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("user_service.go"));
    }

    #[test]
    fn test_generated_files_skipped() {
        let pattern = default_pattern();
        for name in ["Model_gen.go", "Types_generated.go", "User.pb.go"] {
            let diags = check_file_name(&make_unit(name), &pattern, &suffixes());
            assert!(diags.is_empty(), "{name} should be skipped");
        }
    }

    #[test]
    fn test_leading_uppercase_lowered() {
        assert_eq!(suggest_name("Main.go"), "main.go");
        assert_eq!(suggest_name("HTTPServer.go"), "httpserver.go");
    }
}
