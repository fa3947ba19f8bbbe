use thiserror::Error;

pub type TickResult<T> = Result<T, TickError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TickError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid aspect ratio: {0} (must be finite and > 0)")]
    InvalidAspect(f64),

    #[error("no feasible tick placement found after {iterations} iterations")]
    NoFeasibleSolution { iterations: u32 },
}
