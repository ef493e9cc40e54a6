//! Error types for the resource pool

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool is not open - no resources can be acquired")]
    NotOpen,

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Resource is not tracked by the pool")]
    NotTracked,

    #[error("Failed to export metrics: {0}")]
    MetricsExport(String),
}

pub type PoolResult<T> = Result<T, PoolError>;
