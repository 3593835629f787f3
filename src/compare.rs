//! Before/after comparisons between a raw series and its resampled form.

use crate::{
    config::ResampleConfig,
    error::{Error, Result},
    resample::Resampled,
    series::ObservationSeries,
    stats::{calculate_stats, weights_from_counts, Statistic, StatsRecord},
};

const HOURS_PER_YEAR: f64 = 365.0 * 24.0;

/// Years of data represented by `entries` samples taken every `t_freq` seconds.
pub fn years_of_data(entries: usize, t_freq: f64) -> f64 {
    entries as f64 * (t_freq / 3600.0) / HOURS_PER_YEAR
}

/// `(after - before) / before`; NaN when `before` is zero.
pub fn relative_difference(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        f64::NAN
    } else {
        (after - before) / before
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub variables: Vec<String>,

    /// Unweighted statistics of the raw series.
    pub before: StatsRecord,

    /// Statistics of the resampled series weighted by window weight, or `None`
    /// if no window passed the completeness check.
    pub after: Option<StatsRecord>,

    pub raw_entries: usize,
    pub resampled_entries: usize,
    pub raw_years: f64,
    pub resampled_years: f64,
}

impl Comparison {
    /// Per-variable relative change of `statistic`.
    pub fn relative_difference(&self, statistic: Statistic) -> Option<Vec<f64>> {
        let before = self.before.get(statistic)?;
        let after = self.after.as_ref()?.get(statistic)?;

        Some(
            before
                .iter()
                .zip(after)
                .map(|(&b, &a)| relative_difference(b, a))
                .collect(),
        )
    }

    /// Relative change in years of available data; negative means data was lost.
    pub fn years_relative_difference(&self) -> f64 {
        relative_difference(self.raw_years, self.resampled_years)
    }
}

/// Compares `raw` with `resampled`, the output of resampling it under `config`.
///
/// Statistics without a weighted form, such as `MEDIAN`, are only computed on
/// the raw series.
pub fn compare(
    raw: &ObservationSeries,
    resampled: &Resampled,
    statistics: &[Statistic],
    config: &ResampleConfig,
) -> Result<Comparison> {
    let before = calculate_stats(statistics, raw.values(), None)?;

    let weighted: Vec<Statistic> = statistics
        .iter()
        .copied()
        .filter(|s| s.supports_weights())
        .collect();
    let after = if resampled.is_empty() {
        None
    } else {
        Some(resampled.weighted_stats(&weighted)?)
    };

    Ok(Comparison {
        variables: raw.variables().to_vec(),
        before,
        after,
        raw_entries: raw.len(),
        resampled_entries: resampled.len(),
        raw_years: years_of_data(raw.len(), config.t_freq_short),
        resampled_years: years_of_data(resampled.len(), config.t_freq_long),
    })
}

/// Data retained under one minimum data percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub min_data_percentage: f64,

    /// Windows emitted.
    pub entries: usize,

    /// Windows evaluated.
    pub windows: usize,

    pub years: f64,

    /// Per-variable mean of the emitted windows weighted by window weight, or
    /// `None` if no window was emitted.
    pub means: Option<Vec<f64>>,

    /// Each minimum number of years with whether `years` reaches it.
    pub min_years: Vec<(f64, bool)>,
}

impl SweepRow {
    /// Share of evaluated windows that were emitted.
    pub fn retained(&self) -> f64 {
        if self.windows == 0 {
            0.0
        } else {
            self.entries as f64 / self.windows as f64
        }
    }

    pub fn meets_min_years(&self, min_years: f64) -> bool {
        self.years >= min_years
    }
}

/// Resamples `series` under each percentage in `percentages`, keeping every
/// other setting of `config`, and checks the years retained against each of
/// `min_years`.
///
/// The windows a scan evaluates do not depend on the threshold, so one scan
/// with no threshold serves every percentage.
pub fn sweep(
    series: &ObservationSeries,
    config: &ResampleConfig,
    percentages: &[f64],
    min_years: &[f64],
) -> Result<Vec<SweepRow>> {
    config.validate()?;
    if let Some(&bad) = percentages.iter().find(|p| !(0.0..=100.0).contains(*p)) {
        return Err(Error::MinDataPercentageOutOfRange(bad));
    }
    if let Some(&bad) = min_years.iter().find(|y| !(y.is_finite() && **y >= 0.0)) {
        return Err(Error::MinYearsOutOfRange(bad));
    }

    let unrestricted = config.clone().min_data_percentage(0.0);
    let resampled = series.resample(&unrestricted)?;
    let windows = resampled.windows();

    // emitted windows line up with the resampled rows
    let emitted: Vec<(f64, &Vec<f64>, usize)> = windows
        .iter()
        .filter(|w| w.emitted)
        .zip(resampled.values().iter().zip(resampled.weights()))
        .map(|(w, (values, &weight))| (w.completeness, values, weight))
        .collect();

    percentages
        .iter()
        .map(|&min_data_percentage| -> Result<SweepRow> {
            let (values, weights): (Vec<Vec<f64>>, Vec<usize>) = emitted
                .iter()
                .filter(|(completeness, _, _)| *completeness >= min_data_percentage)
                .map(|&(_, values, weight)| (values.clone(), weight))
                .unzip();

            let entries = values.len();
            let years = years_of_data(entries, config.t_freq_long);
            let means = if values.is_empty() {
                None
            } else {
                let weights = weights_from_counts(&weights);
                let record = calculate_stats(&[Statistic::Mean], &values, Some(&weights))?;
                record.get(Statistic::Mean).map(<[f64]>::to_vec)
            };

            Ok(SweepRow {
                min_data_percentage,
                entries,
                windows: windows.len(),
                years,
                means,
                min_years: min_years.iter().map(|&y| (y, years >= y)).collect(),
            })
        })
        .collect()
}

// -- Tests -------------------------------------------------------------------
