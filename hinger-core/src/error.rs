//! Error types for grid construction and strategy selection

/// Errors produced by the core.
///
/// Illegal moves and unreachable goals are not errors: legality is a boolean
/// check and search exhaustion is reported as "no path".
#[derive(Debug, thiserror::Error)]
pub enum HingerError {
    /// Grid has no cells, or its rows differ in length
    #[error("invalid grid dimensions: {0}")]
    InvalidDimension(String),

    /// Grid contains a negative counter value
    #[error("invalid value {value} at ({row}, {col}): counters must be non-negative")]
    InvalidValue { row: usize, col: usize, value: i64 },

    /// Start and goal grids passed to a path search have different shapes
    #[error("start grid is {start_rows}x{start_cols} but goal grid is {goal_rows}x{goal_cols}")]
    DimensionMismatch {
        start_rows: usize,
        start_cols: usize,
        goal_rows: usize,
        goal_cols: usize,
    },

    #[error("unknown search algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("unknown agent strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown safety policy: {0}")]
    UnknownPolicy(String),

    #[error("unknown move cost model: {0}")]
    UnknownCostModel(String),

    /// Grid literal is not a JSON matrix of integers
    #[error("failed to parse grid: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HingerError>;
