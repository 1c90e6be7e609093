//! Error types for the heat equation solver.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HeatError>;

/// Every failure the solver can report. All of them are fatal to the run.
#[derive(Error, Debug)]
pub enum HeatError {
    /// Grid buffers could not be allocated.
    #[error("Allocation failed for {cells} cells: {reason}")]
    Allocation { cells: usize, reason: String },

    /// Tile count does not fit the iteration space.
    #[error("Invalid partition: cannot split {total} cells into {tiles} tiles")]
    InvalidPartition { total: usize, tiles: usize },

    /// Malformed or out-of-range user input.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The worker pool could not be started.
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// A unit of work panicked; the step cannot be completed.
    #[error("Tile fault during {phase}: {message}")]
    TileFault { phase: &'static str, message: String },
}

impl HeatError {
    pub fn argument(msg: &str) -> Self {
        HeatError::Argument(msg.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for HeatError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        HeatError::WorkerPool(e.to_string())
    }
}
