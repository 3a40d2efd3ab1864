use thiserror::Error;

/// Failures surfaced by the simulation core.
///
/// Every variant describes a caller mistake; the core has no transient
/// failure modes and never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A (row, col) index fell outside the grid.
    #[error("cell ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    /// An argument was rejected: unknown pattern name, rate outside [0, 1],
    /// zero grid dimension.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
