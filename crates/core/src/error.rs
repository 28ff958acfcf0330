use thiserror::Error;

/// Errors that can occur in the decision engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
