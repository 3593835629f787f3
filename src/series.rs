//! Timestamp-aligned multi-variable observations.

use crate::{
    config::ResampleConfig,
    error::{Error, Result},
    resample::{self, Resampled},
    window,
};

/// Rows of observations sharing one ordered set of variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    variables: Vec<String>,
    timestamps: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl ObservationSeries {
    /// Builds a series, checking row alignment, row width and timestamp order.
    pub fn new(variables: Vec<String>, timestamps: Vec<f64>, values: Vec<Vec<f64>>) -> Result<Self> {
        check_rows(&timestamps, &values, variables.len())?;
        check_order(&timestamps)?;

        Ok(Self {
            variables,
            timestamps,
            values,
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Values of one variable, in row order.
    pub fn column(&self, variable: &str) -> Option<Vec<f64>> {
        let index = self.variables.iter().position(|v| v == variable)?;
        Some(self.values.iter().map(|row| row[index]).collect())
    }

    /// Resamples onto windows anchored at `config.central_time`.
    pub fn resample(&self, config: &ResampleConfig) -> Result<Resampled> {
        let first = *self.timestamps.first().ok_or(Error::EmptySeries)?;
        let origin = window::resolve_origin(first, config)?;

        resample::resample(&self.timestamps, &self.values, origin, config)
    }
}

/// Row-count and row-width checks shared with the engine.
pub(crate) fn check_rows(timestamps: &[f64], values: &[Vec<f64>], width: usize) -> Result<()> {
    if timestamps.len() != values.len() {
        return Err(Error::LengthMismatch {
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }

    if let Some((row, found)) = values
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != width)
    {
        return Err(Error::RaggedRow {
            row,
            expected: width,
            found,
        });
    }

    Ok(())
}

pub(crate) fn check_order(timestamps: &[f64]) -> Result<()> {
    match timestamps.windows(2).position(|pair| pair[1] < pair[0]) {
        Some(index) => Err(Error::UnorderedTimestamps { row: index + 1 }),
        None => Ok(()),
    }
}

// -- Tests -------------------------------------------------------------------
