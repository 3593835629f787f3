//! Windowed aggregation of a fixed-frequency series onto a coarser frequency.
//!
//! The scan walks the rows once. A window closes when a row lands at least one
//! window length after the window start, or when the last row is reached. A
//! closed window is emitted only if it holds enough of the samples it could
//! hold; otherwise it is dropped. Gaps longer than a window are skipped in a
//! single step, so no empty windows are ever evaluated.

use crate::{
    config::ResampleConfig,
    error::{Error, Result},
    series::{check_order, check_rows},
    stats::{calculate_stats, weights_from_counts, Statistic, StatsRecord},
};

/// A window that reached the completeness check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowOutcome {
    /// Start of the window, in elapsed seconds.
    pub start: f64,

    /// Number of source rows in the window.
    pub weight: usize,

    /// `weight` as a percentage of the samples a full window holds.
    pub completeness: f64,

    pub emitted: bool,
}

/// Output of [`resample`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resampled {
    timestamps: Vec<f64>,
    values: Vec<Vec<f64>>,
    weights: Vec<usize>,
    windows: Vec<WindowOutcome>,
}

impl Resampled {
    /// Window midpoints of the emitted windows.
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Column means of the emitted windows, in source variable order.
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Source rows behind each emitted window.
    pub fn weights(&self) -> &[usize] {
        &self.weights
    }

    /// Every evaluated window, emitted or not, in time order.
    pub fn windows(&self) -> &[WindowOutcome] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Windows that failed the completeness check.
    pub fn dropped(&self) -> usize {
        self.windows.len() - self.timestamps.len()
    }

    /// Statistics of the resampled values, weighted by window weight.
    pub fn weighted_stats(&self, statistics: &[Statistic]) -> Result<StatsRecord> {
        let weights = weights_from_counts(&self.weights);
        calculate_stats(statistics, &self.values, Some(&weights))
    }

    fn evaluate(
        &mut self,
        start: f64,
        rows: &[Vec<f64>],
        window_length: f64,
        config: &ResampleConfig,
    ) {
        let weight = rows.len();
        let completeness = weight as f64 / config.samples_per_window() * 100.0;
        let emitted = weight > 0 && completeness >= config.min_data_percentage;

        log::trace!("window at {start}: weight {weight}, completeness {completeness:.1}%");

        if emitted {
            self.timestamps.push(start + window_length / 2.0);
            self.values.push(row_mean(rows));
            self.weights.push(weight);
        }

        self.windows.push(WindowOutcome {
            start,
            weight,
            completeness,
            emitted,
        });
    }
}

/// Aggregates `values` onto windows of `config.t_freq_long` seconds, the first
/// of which starts at `origin`.
///
/// All preconditions are checked before the scan; on error nothing is produced.
pub fn resample(
    timestamps: &[f64],
    values: &[Vec<f64>],
    origin: f64,
    config: &ResampleConfig,
) -> Result<Resampled> {
    config.validate()?;

    let width = values.first().map_or(0, Vec::len);
    check_rows(timestamps, values, width)?;
    check_order(timestamps)?;

    let (&first, &last_timestamp) = timestamps
        .first()
        .zip(timestamps.last())
        .ok_or(Error::EmptySeries)?;

    let window_length = config.t_freq_long;
    if !(origin.is_finite() && (0.0..window_length).contains(&(first - origin))) {
        return Err(Error::OriginOutOfRange { origin, first });
    }

    let last = timestamps.len() - 1;
    let mut resampled = Resampled::default();
    let mut initial_time = origin;
    let mut initial_row = 0;
    let mut tail_pending = false;

    for (row, &ts) in timestamps.iter().enumerate() {
        let time_difference = ts - initial_time;
        let window_full = time_difference >= window_length;

        if !window_full && row != last {
            continue;
        }

        // the last row belongs to the window it closes unless it lies past it
        let end = if window_full { row } else { row + 1 };
        resampled.evaluate(initial_time, &values[initial_row..end], window_length, config);

        initial_time += (time_difference / window_length).floor() * window_length;
        initial_row = row;
        tail_pending = row == last && window_full;
    }

    if tail_pending {
        resampled.evaluate(initial_time, &values[last..], window_length, config);
    }

    log::debug!(
        "resampled {} rows ending at {last_timestamp} into {} of {} windows",
        timestamps.len(),
        resampled.len(),
        resampled.windows.len()
    );

    Ok(resampled)
}

fn row_mean(rows: &[Vec<f64>]) -> Vec<f64> {
    let mut sums = vec![0.0; rows[0].len()];
    for row in rows {
        for (sum, x) in sums.iter_mut().zip(row) {
            *sum += x;
        }
    }

    let count = rows.len() as f64;
    sums.into_iter().map(|sum| sum / count).collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    const HOUR: f64 = 3600.0;
    const THREE_HOURS: f64 = 3.0 * HOUR;

    fn hourly(min_data_percentage: f64) -> ResampleConfig {
        ResampleConfig::new(HOUR)
            .window_length(THREE_HOURS)
            .min_data_percentage(min_data_percentage)
    }

    fn fixture() -> (Vec<f64>, Vec<Vec<f64>>) {
        let timestamps = vec![0.0, 3600.0, 7200.0, 10800.0, 14400.0, 18000.0];
        let values = (0..6)
            .map(|i| vec![2.0 * i as f64, 2.0 * i as f64 + 1.0])
            .collect();
        (timestamps, values)
    }

    fn remove_row(row: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
        let (mut timestamps, mut values) = fixture();
        timestamps.remove(row);
        values.remove(row);
        (timestamps, values)
    }

    #[test]
    fn should_tile_full_windows() {
        let (timestamps, values) = fixture();
        let resampled = resample(&timestamps, &values, 0.0, &hourly(100.0)).unwrap();

        assert_eq!(resampled.timestamps(), &[5400.0, 16200.0]);
        assert_eq!(resampled.values(), &[vec![2.0, 3.0], vec![8.0, 9.0]]);
        assert_eq!(resampled.weights(), &[3, 3]);
        assert_eq!(resampled.windows().len(), 2);
        assert_eq!(resampled.dropped(), 0);
    }

    #[test]
    fn should_drop_incomplete_window() {
        let (timestamps, values) = remove_row(1);
        let resampled = resample(&timestamps, &values, 0.0, &hourly(100.0)).unwrap();

        assert_eq!(resampled.timestamps(), &[16200.0]);
        assert_eq!(resampled.values(), &[vec![8.0, 9.0]]);
        assert_eq!(resampled.weights(), &[3]);

        let dropped = resampled.windows()[0];
        assert!(!dropped.emitted);
        assert_eq!(dropped.weight, 2);
        assert!((dropped.completeness - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn should_keep_incomplete_window_under_lower_threshold() {
        let (timestamps, values) = remove_row(1);
        let resampled = resample(&timestamps, &values, 0.0, &hourly(50.0)).unwrap();

        assert_eq!(resampled.timestamps(), &[5400.0, 16200.0]);
        assert_eq!(resampled.values()[0], vec![2.0, 3.0]);
        assert_eq!(resampled.weights(), &[2, 3]);
    }

    #[test]
    fn should_skip_gaps_in_one_step() {
        // rows at 0..2 h, then nothing until 10 h
        let timestamps = vec![0.0, HOUR, 2.0 * HOUR, 10.0 * HOUR, 11.0 * HOUR];
        let values = (0..5).map(|i| vec![i as f64]).collect::<Vec<_>>();

        let resampled = resample(&timestamps, &values, 0.0, &hourly(0.0)).unwrap();

        let starts: Vec<f64> = resampled.windows().iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![0.0, 9.0 * HOUR]);
        assert!(resampled.windows().iter().all(|w| w.weight > 0));
        assert_eq!(resampled.timestamps(), &[1.5 * HOUR, 10.5 * HOUR]);
        assert_eq!(resampled.values(), &[vec![1.0], vec![3.5]]);
        assert_eq!(resampled.weights(), &[3, 2]);
    }

    #[test]
    fn should_evaluate_last_row_on_boundary() {
        let timestamps = vec![0.0, HOUR, 2.0 * HOUR, 3.0 * HOUR];
        let values = (0..4).map(|i| vec![i as f64]).collect::<Vec<_>>();

        let resampled = resample(&timestamps, &values, 0.0, &hourly(30.0)).unwrap();
        assert_eq!(resampled.timestamps(), &[5400.0, 16200.0]);
        assert_eq!(resampled.values(), &[vec![1.0], vec![3.0]]);
        assert_eq!(resampled.weights(), &[3, 1]);

        // same tail, evaluated but rejected
        let resampled = resample(&timestamps, &values, 0.0, &hourly(50.0)).unwrap();
        assert_eq!(resampled.weights(), &[3]);
        assert_eq!(resampled.windows().len(), 2);
        assert_eq!(resampled.windows()[1].weight, 1);
        assert!(!resampled.windows()[1].emitted);
    }

    #[test]
    fn should_include_last_row_short_of_boundary() {
        let timestamps = vec![0.0, HOUR, 2.0 * HOUR, 3.0 * HOUR, 4.0 * HOUR];
        let values = (0..5).map(|i| vec![i as f64]).collect::<Vec<_>>();

        let resampled = resample(&timestamps, &values, 0.0, &hourly(50.0)).unwrap();

        assert_eq!(resampled.timestamps(), &[5400.0, 16200.0]);
        assert_eq!(resampled.values(), &[vec![1.0], vec![3.5]]);
        assert_eq!(resampled.weights(), &[3, 2]);
    }

    #[test]
    fn should_resample_single_row() {
        let resampled = resample(&[1800.0], &[vec![4.0]], 0.0, &hourly(0.0)).unwrap();

        assert_eq!(resampled.timestamps(), &[5400.0]);
        assert_eq!(resampled.weights(), &[1]);
    }

    #[test]
    fn should_hold_gate_and_bounds_for_every_window() {
        let config = ResampleConfig::new(1800.0).min_data_percentage(50.0);
        let expected = config.samples_per_window();

        // half-hourly rows with a missing-row pattern and two long gaps
        let timestamps: Vec<f64> = (0..400)
            .filter(|i| i % 7 != 3 && i % 11 != 5 && !(120..150).contains(i) && !(300..305).contains(i))
            .map(|i| 1800.0 * i as f64)
            .collect();
        let values: Vec<Vec<f64>> = timestamps.iter().map(|ts| vec![ts / 1800.0, 1.0]).collect();

        let resampled = resample(&timestamps, &values, 0.0, &config).unwrap();

        assert_eq!(resampled.timestamps().len(), resampled.values().len());
        assert_eq!(resampled.values().len(), resampled.weights().len());

        for &weight in resampled.weights() {
            assert!(weight >= 1 && weight as f64 <= expected);
        }
        for window in resampled.windows() {
            let ratio = window.weight as f64 / expected * 100.0;
            assert_eq!(window.emitted, ratio >= 50.0);
            assert_eq!(window.start % config.t_freq_long, 0.0);
        }

        let counted: usize = resampled.windows().iter().map(|w| w.weight).sum();
        assert_eq!(counted, timestamps.len());
    }

    #[test]
    fn should_reject_invalid_input_without_output() {
        let (timestamps, values) = fixture();

        assert_eq!(
            resample(&timestamps[..5], &values, 0.0, &hourly(50.0)),
            Err(Error::LengthMismatch {
                timestamps: 5,
                values: 6
            })
        );
        assert_eq!(
            resample(&[], &[], 0.0, &hourly(50.0)),
            Err(Error::EmptySeries)
        );
        assert_eq!(
            resample(&timestamps, &values, 0.0, &hourly(101.0)),
            Err(Error::MinDataPercentageOutOfRange(101.0))
        );
        assert_eq!(
            resample(&timestamps, &values, 0.0, &ResampleConfig::new(THREE_HOURS)),
            Err(Error::InvertedFrequencies {
                short: THREE_HOURS,
                long: THREE_HOURS
            })
        );
        assert_eq!(
            resample(&timestamps, &values, 0.0, &ResampleConfig::new(-HOUR)),
            Err(Error::InvalidShortFrequency(-HOUR))
        );
        assert_eq!(
            resample(&timestamps, &values, -THREE_HOURS, &hourly(50.0)),
            Err(Error::OriginOutOfRange {
                origin: -THREE_HOURS,
                first: 0.0
            })
        );
        assert_eq!(
            resample(&timestamps, &values, 60.0, &hourly(50.0)),
            Err(Error::OriginOutOfRange {
                origin: 60.0,
                first: 0.0
            })
        );
    }

    #[test]
    fn should_reject_unordered_timestamps() {
        let timestamps = vec![0.0, 7200.0, 3600.0];
        let values = vec![vec![1.0], vec![2.0], vec![3.0]];

        assert_eq!(
            resample(&timestamps, &values, 0.0, &hourly(0.0)),
            Err(Error::UnorderedTimestamps { row: 2 })
        );
    }

    #[test]
    fn should_weight_post_statistics() {
        let (timestamps, values) = remove_row(1);
        let resampled = resample(&timestamps, &values, 0.0, &hourly(50.0)).unwrap();

        let record = resampled.weighted_stats(&[Statistic::Mean]).unwrap();
        // (2 * 2 + 3 * 8) / 5
        assert_eq!(record.get(Statistic::Mean).unwrap()[0], 5.6);
    }
}
