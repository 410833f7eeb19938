use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    /// Temperature must be strictly positive; `p^(1/t)` is undefined at zero.
    #[error("temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),
    #[error("tuning core has exited")]
    Closed,
}

pub type Result<T, E = TuningError> = std::result::Result<T, E>;
