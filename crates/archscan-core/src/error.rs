use thiserror::Error;

/// Fatal engine errors. Recoverable input problems (malformed imports,
/// corrupt units) never surface here; they degrade to Warning
/// diagnostics and analysis continues.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected before any analysis starts; no partial results.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A condition that cannot legitimately occur given correct inputs,
    /// e.g. a multi-node strongly-connected component with no
    /// reconstructible cycle. Indicates a bug in the engine itself.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}
