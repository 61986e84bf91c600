//! Errors raised by the delay pipeline and the aggregators.

use thiserror::Error;

/// Failure of a pipeline stage or summary computation.
///
/// Every operation either returns a complete table or one of these; there
/// is no partial output.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    /// A mode selector received a value outside its enumerated set.
    #[error("invalid argument for '{name}': '{value}' (expected one of: {expected})")]
    InvalidArgument {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A trip without an actual timestamp reached the delay pipeline.
    #[error("trip at row {row} (line '{line_name}') has no actual time")]
    MissingActualTime { row: usize, line_name: String },

    /// The data contains a company missing from the configured set.
    #[error("company '{0}' is not in the configured company set")]
    UnexpectedCompany(String),

    #[error("the configured company set is empty")]
    EmptyCompanySet,

    /// Outlier correction parameters that cannot produce a bounded table.
    #[error("invalid outlier correction: {0}")]
    InvalidCorrection(String),
}

pub type StatsResult<T> = Result<T, StatsError>;
