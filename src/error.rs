//! Error types for snake cube solving.

use thiserror::Error;

use crate::geometry::Point;

/// Result type for snake cube operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a search.
///
/// A segment that does not fit is not an error: placement reports it as
/// `Ok(false)` and the search simply backtracks.
#[derive(Debug, Error)]
pub enum Error {
    /// The chain is empty or contains a segment shorter than one cell.
    #[error("invalid chain: {0}")]
    InvalidChainSpec(String),

    /// The cube side is zero or too large to index.
    #[error("cube side must be between 1 and {max}, got {side}")]
    InvalidSide { side: usize, max: usize },

    /// A starting seed lies outside the cube.
    #[error("seed point {point} lies outside a cube of side {side}")]
    SeedOutOfBounds { point: Point, side: usize },

    /// Internal bookkeeping went out of sync with the grid.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A textual value could not be parsed.
    #[error("cannot parse {what} from {input:?}")]
    Parse { what: &'static str, input: String },

    /// The saved solution file does not follow the expected layout.
    #[error("corrupt solution file: {0}")]
    CorruptSolutionFile(String),

    /// Reading or writing solution files failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub(crate) fn parse(what: &'static str, input: &str) -> Self {
        Self::Parse {
            what,
            input: input.to_string(),
        }
    }
}
