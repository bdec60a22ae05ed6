pub mod blocks;
pub mod config;
pub mod cycles;
pub mod duplicates;
pub mod engine;
pub mod entrypoint;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod naming;
pub mod source;
pub mod types;

pub use blocks::CodeBlock;
pub use config::AnalysisConfig;
pub use cycles::Cycle;
pub use engine::AnalysisEngine;
pub use error::EngineError;
pub use fingerprint::StructuralFingerprint;
pub use graph::DependencyGraph;
pub use source::{Import, SourceUnit, SyntaxNode, UnitId};
pub use types::*;
