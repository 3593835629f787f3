//! Descriptive statistics over the columns of a batch of observations.
//!
//! Each statistic yields one value per column. Means and standard deviations
//! accept per-row weights, which is how resampled series are summarised: an
//! aggregate built from one source sample counts for less than one built from six.

use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// A statistic that can be computed per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Mean,
    /// Population standard deviation (divides by N).
    StandardDeviation,
    /// Unweighted only.
    Median,
}

impl Statistic {
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "MEAN",
            Statistic::StandardDeviation => "STANDARD_DEVIATION",
            Statistic::Median => "MEDIAN",
        }
    }

    pub fn supports_weights(&self) -> bool {
        !matches!(self, Statistic::Median)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "MEAN" => Ok(Statistic::Mean),
            "STANDARD_DEVIATION" => Ok(Statistic::StandardDeviation),
            "MEDIAN" => Ok(Statistic::Median),
            _ => Err(Error::UnknownStatistic(s.to_string())),
        }
    }
}

/// Parses statistic names such as `MEAN`, failing on the first unknown one.
pub fn parse_statistics<S: AsRef<str>>(names: &[S]) -> Result<Vec<Statistic>> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Statistic values keyed by statistic, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsRecord {
    entries: Vec<(Statistic, Vec<f64>)>,
}

impl StatsRecord {
    /// Per-column values of `statistic`, if it was requested.
    pub fn get(&self, statistic: Statistic) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(s, _)| *s == statistic)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Statistic, &[f64])> {
        self.entries.iter().map(|(s, values)| (*s, values.as_slice()))
    }

    /// Positional view: one row per requested statistic, one value per column.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.entries.iter().map(|(_, values)| values.clone()).collect()
    }

    /// `(statistics, columns)`
    pub fn shape(&self) -> (usize, usize) {
        let columns = self.entries.first().map_or(0, |(_, values)| values.len());
        (self.entries.len(), columns)
    }
}

/// Computes `statistics` for each column of `data`.
///
/// With `weights`, means and standard deviations are weighted and `MEDIAN`
/// is rejected with [`Error::UnsupportedWeightedStatistic`].
pub fn calculate_stats(
    statistics: &[Statistic],
    data: &[Vec<f64>],
    weights: Option<&[f64]>,
) -> Result<StatsRecord> {
    let columns = data.first().ok_or(Error::EmptySeries)?.len();

    if let Some((row, found)) = data
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != columns)
    {
        return Err(Error::RaggedRow {
            row,
            expected: columns,
            found,
        });
    }

    if let Some(weights) = weights {
        check_weights(weights, data.len())?;

        if let Some(unsupported) = statistics.iter().find(|s| !s.supports_weights()) {
            return Err(Error::UnsupportedWeightedStatistic(*unsupported));
        }
    }

    let mut mean: Option<Vec<f64>> = None;
    let mut entries = Vec::with_capacity(statistics.len());

    for &statistic in statistics {
        let values = match statistic {
            Statistic::Mean => mean.get_or_insert_with(|| column_mean(data, weights)).clone(),
            Statistic::StandardDeviation => {
                let mean = mean.get_or_insert_with(|| column_mean(data, weights));
                column_std(data, weights, mean)
            }
            Statistic::Median => column_median(data, columns),
        };
        entries.push((statistic, values));
    }

    Ok(StatsRecord { entries })
}

/// Converts window weights into the form [`calculate_stats`] takes.
pub fn weights_from_counts(counts: &[usize]) -> Vec<f64> {
    counts.iter().map(|&count| count as f64).collect()
}

fn check_weights(weights: &[f64], rows: usize) -> Result<()> {
    if weights.len() != rows {
        return Err(Error::WeightsLengthMismatch {
            rows,
            weights: weights.len(),
        });
    }

    match weights
        .iter()
        .enumerate()
        .find(|&(_, &w)| !(w.is_finite() && w > 0.0))
    {
        Some((row, &value)) => Err(Error::NonPositiveWeight { row, value }),
        None => Ok(()),
    }
}

fn weight_at(weights: Option<&[f64]>, row: usize) -> f64 {
    weights.map_or(1.0, |w| w[row])
}

fn column_mean(data: &[Vec<f64>], weights: Option<&[f64]>) -> Vec<f64> {
    let columns = data[0].len();
    let mut sums = vec![0.0; columns];
    let mut total = 0.0;

    for (row, values) in data.iter().enumerate() {
        let w = weight_at(weights, row);
        total += w;
        for (sum, x) in sums.iter_mut().zip(values) {
            *sum += w * x;
        }
    }

    sums.into_iter().map(|sum| sum / total).collect()
}

fn column_std(data: &[Vec<f64>], weights: Option<&[f64]>, mean: &[f64]) -> Vec<f64> {
    let mut sums = vec![0.0; mean.len()];
    let mut total = 0.0;

    for (row, values) in data.iter().enumerate() {
        let w = weight_at(weights, row);
        total += w;
        for ((sum, x), mu) in sums.iter_mut().zip(values).zip(mean) {
            *sum += w * (x - mu).powi(2);
        }
    }

    sums.into_iter().map(|sum| (sum / total).sqrt()).collect()
}

fn column_median(data: &[Vec<f64>], columns: usize) -> Vec<f64> {
    (0..columns)
        .map(|column| {
            let mut values: Vec<f64> = data.iter().map(|row| row[column]).collect();
            values.sort_by(f64::total_cmp);

            let middle = values.len() / 2;
            if values.len() % 2 == 0 {
                (values[middle - 1] + values[middle]) / 2.0
            } else {
                values[middle]
            }
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------
