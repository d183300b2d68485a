//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Convenience alias for results carrying an [`AcoError`].
pub type Result<T> = std::result::Result<T, AcoError>;

/// Errors raised while building inputs or running the colony.
///
/// Validation happens before any optimization starts. A route that gets
/// stranded during construction is not an error; only a run that never
/// produces a complete tour surfaces as [`AcoError::NoFeasibleTour`], and
/// only through the [`plan`](crate::plan) layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// No nodes were supplied.
    #[error("input must contain at least one node")]
    EmptyInput,

    /// A row of an explicit matrix has the wrong length.
    #[error("distance matrix must be square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// `d(i, j)` and `d(j, i)` disagree.
    #[error("distance matrix must be symmetric: d({i}, {j}) = {forward}, d({j}, {i}) = {backward}")]
    Asymmetric {
        i: usize,
        j: usize,
        forward: f64,
        backward: f64,
    },

    /// A diagonal entry is not zero.
    #[error("distance matrix diagonal must be zero: d({index}, {index}) = {value}")]
    NonZeroDiagonal { index: usize, value: f64 },

    /// An off-diagonal entry is negative or NaN.
    #[error("distance d({i}, {j}) = {value} must be nonnegative or +infinity")]
    InvalidDistance { i: usize, j: usize, value: f64 },

    /// A coordinate contains NaN or an infinity.
    #[error("coordinate {index} must be finite")]
    NonFiniteCoordinate { index: usize },

    /// An edge references a node that does not exist.
    #[error("edge ({from}, {to}) references a node outside 0..{nodes}")]
    EdgeOutOfRange { from: usize, to: usize, nodes: usize },

    /// A configuration parameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured start city is not a node of the graph.
    #[error("start_city {start} is out of range for {nodes} nodes")]
    StartCityOutOfRange { start: usize, nodes: usize },

    /// Evaporation rate outside `[0, 1)`.
    #[error("evaporation rate must be in [0, 1), got {0}")]
    InvalidEvaporationRate(f64),

    /// A requested site id is not in the catalogue.
    #[error("unknown site id {0}")]
    UnknownSite(u32),

    /// No ant completed a tour during the whole run.
    #[error("no feasible tour visits every requested node")]
    NoFeasibleTour,
}
