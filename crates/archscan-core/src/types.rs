use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Unique identifier for a module: the deployability/ownership boundary
/// used as node granularity in the dependency graph.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Byte-offset range within one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Location in source code: file plus byte offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourcePosition {
    pub file: PathBuf,
    pub offset: usize,
}

impl SourcePosition {
    pub fn new(file: impl Into<PathBuf>, offset: usize) -> Self {
        Self {
            file: file.into(),
            offset,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.offset)
    }
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(anyhow::anyhow!("unknown severity: {s}")),
        }
    }
}

/// Category of a diagnostic, one per analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Naming,
    EntryPoint,
    ImportCycle,
    Duplication,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Naming => write!(f, "naming"),
            Category::EntryPoint => write!(f, "entry_point"),
            Category::ImportCycle => write!(f, "import_cycle"),
            Category::Duplication => write!(f, "duplication"),
        }
    }
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub position: SourcePosition,
    pub related: Vec<SourcePosition>,
}

impl Diagnostic {
    pub fn new(
        category: Category,
        severity: Severity,
        message: impl Into<String>,
        position: SourcePosition,
    ) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
            position,
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: Vec<SourcePosition>) -> Self {
        self.related = related;
        self
    }
}
