//! Errors raised by the resampling core.

use crate::stats::Statistic;

/// Error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The series has no rows.
    #[error("series is empty")]
    EmptySeries,

    /// Timestamps and values have a different number of rows.
    #[error("{timestamps} timestamps but {values} value rows")]
    LengthMismatch { timestamps: usize, values: usize },

    /// A value row does not have one entry per variable.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A timestamp is smaller than the one before it.
    #[error("timestamp at row {row} is earlier than the previous one")]
    UnorderedTimestamps { row: usize },

    /// The source sampling interval is zero, negative or not finite.
    #[error("source frequency must be positive, got {0}")]
    InvalidShortFrequency(f64),

    /// The window length is zero, negative or not finite.
    #[error("window length must be positive, got {0}")]
    InvalidLongFrequency(f64),

    /// The source sampling interval is not shorter than the window length.
    #[error("source frequency {short} must be shorter than window length {long}")]
    InvertedFrequencies { short: f64, long: f64 },

    /// Completeness threshold outside `[0, 100]`.
    #[error("minimum data percentage must be within [0, 100], got {0}")]
    MinDataPercentageOutOfRange(f64),

    /// Minimum number of years that is negative or not finite.
    #[error("minimum years must be a non-negative number, got {0}")]
    MinYearsOutOfRange(f64),

    /// Central time outside `[0, 24)`.
    #[error("central time must be within [0, 24) hours, got {0}")]
    CentralTimeOutOfRange(f64),

    /// The first window does not contain the first observation.
    #[error("window origin {origin} does not contain first timestamp {first}")]
    OriginOutOfRange { origin: f64, first: f64 },

    /// Elapsed seconds that do not map to a calendar date.
    #[error("timestamp {0} is outside the supported calendar range")]
    TimestampOutOfRange(f64),

    /// Number of weights differs from the number of data rows.
    #[error("{weights} weights for {rows} data rows")]
    WeightsLengthMismatch { rows: usize, weights: usize },

    /// Weights must be strictly positive.
    #[error("weight at row {row} must be positive, got {value}")]
    NonPositiveWeight { row: usize, value: f64 },

    /// Statistic name that is not one of `MEAN`, `STANDARD_DEVIATION`, `MEDIAN`.
    #[error("unknown statistic `{0}`")]
    UnknownStatistic(String),

    /// The statistic has no weighted form.
    #[error("{0} cannot be computed with weights")]
    UnsupportedWeightedStatistic(Statistic),
}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;
