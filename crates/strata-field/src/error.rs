use thiserror::Error;

/// Failures surfaced by field synthesis, table construction and extraction.
///
/// `InvalidDimensions` and `InvalidParameter` are returned to the caller.
/// `InvalidCaseTable` and `OutOfBoundsSample` describe broken invariants and
/// are raised as panics on the hot paths; the variants exist so checked entry
/// points (`CaseTable::validate`, `FieldGrid::try_get`) can report them.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenError {
    #[error("invalid grid dimensions {width}x{height}x{depth}: {reason}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        depth: usize,
        reason: &'static str,
    },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("invalid case table entry {case}: {reason}")]
    InvalidCaseTable { case: usize, reason: String },
    #[error("sample ({x}, {y}, {z}) out of bounds for {width}x{height}x{depth} grid")]
    OutOfBoundsSample {
        x: usize,
        y: usize,
        z: usize,
        width: usize,
        height: usize,
        depth: usize,
    },
    #[error("worker pool: {0}")]
    WorkerPool(String),
}

pub type GenResult<T> = Result<T, GenError>;

impl GenError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        GenError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
