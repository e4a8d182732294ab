/// Domain-specific error types for the hedging engine.
/// The taxonomy is deliberately narrow: the engine rejects exactly one
/// condition (statistics over an empty sample). Out-of-range scenario
/// inputs are the caller's responsibility and propagate as well-defined
/// arithmetic, never as errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("statistics require a non-empty sample")]
    EmptySample,

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    Validation(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
