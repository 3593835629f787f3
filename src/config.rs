//! Parameters for resampling and station ingestion.

use crate::{
    error::{Error, Result},
    time::Epoch,
};

/// Three hours, in seconds.
pub const DEFAULT_WINDOW_LENGTH: f64 = 3.0 * 60.0 * 60.0;

/// Window centred at 01:30, so boundaries fall on 00:00, 03:00, 06:00, ...
pub const DEFAULT_CENTRAL_TIME: f64 = 1.5;

pub const DEFAULT_MIN_DATA_PERCENTAGE: f64 = 50.0;

/// Sentinel AmeriFlux uses for missing values.
pub const MISSING_VALUE: f64 = -9999.0;

/// Controls how a series is resampled.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleConfig {
    /// Sampling interval of the source series, in seconds.
    pub t_freq_short: f64,

    /// Window length of the resampled series, in seconds.
    pub t_freq_long: f64,

    /// Hour of the day at which windows are centred, in `[0, 24)`.
    pub central_time: f64,

    /// Minimum share of expected samples a window needs, from 0 to 100.
    pub min_data_percentage: f64,

    /// Reference instant of the series timestamps.
    pub epoch: Epoch,
}

impl ResampleConfig {
    pub fn new(t_freq_short: f64) -> Self {
        Self {
            t_freq_short,
            t_freq_long: DEFAULT_WINDOW_LENGTH,
            central_time: DEFAULT_CENTRAL_TIME,
            min_data_percentage: DEFAULT_MIN_DATA_PERCENTAGE,
            epoch: Epoch::default(),
        }
    }

    pub fn window_length(mut self, seconds: f64) -> Self {
        self.t_freq_long = seconds;
        self
    }

    pub fn central_time(mut self, hours: f64) -> Self {
        self.central_time = hours;
        self
    }

    pub fn min_data_percentage(mut self, percentage: f64) -> Self {
        self.min_data_percentage = percentage;
        self
    }

    pub fn epoch(mut self, epoch: Epoch) -> Self {
        self.epoch = epoch;
        self
    }

    /// Number of source samples in a complete window.
    pub fn samples_per_window(&self) -> f64 {
        self.t_freq_long / self.t_freq_short
    }

    /// Checks the numeric preconditions shared by the resolver and the engine.
    pub fn validate(&self) -> Result<()> {
        if !(self.t_freq_short.is_finite() && self.t_freq_short > 0.0) {
            return Err(Error::InvalidShortFrequency(self.t_freq_short));
        }
        if !(self.t_freq_long.is_finite() && self.t_freq_long > 0.0) {
            return Err(Error::InvalidLongFrequency(self.t_freq_long));
        }
        if self.t_freq_short >= self.t_freq_long {
            return Err(Error::InvertedFrequencies {
                short: self.t_freq_short,
                long: self.t_freq_long,
            });
        }
        if !(0.0..=100.0).contains(&self.min_data_percentage) {
            return Err(Error::MinDataPercentageOutOfRange(self.min_data_percentage));
        }
        if !(0.0..24.0).contains(&self.central_time) {
            return Err(Error::CentralTimeOutOfRange(self.central_time));
        }

        Ok(())
    }
}

/// Controls which station files and rows are kept during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Variables to extract, in output column order.
    pub variables: Vec<String>,

    /// Two-letter country codes of the stations to keep.
    pub countries: Vec<String>,

    /// Lines before the first data row; the last of them holds the column names.
    pub header_rows: usize,

    pub missing_value: f64,

    /// Minimum span of complete data a station needs, in years of 365 days.
    pub min_years: f64,

    /// Source sampling intervals accepted, in seconds.
    pub accepted_frequencies: Vec<f64>,

    /// Compute `NETRAD` and `ALB` from their inputs where a station does not
    /// report them.
    pub derive_variables: bool,

    pub epoch: Epoch,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            variables: ["TA", "SW_IN", "SW_OUT", "LW_IN", "LW_OUT", "H", "LE", "G"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            countries: vec!["CA".to_string(), "US".to_string()],
            header_rows: 3,
            missing_value: MISSING_VALUE,
            min_years: 1.0,
            accepted_frequencies: vec![30.0 * 60.0, 60.0 * 60.0],
            derive_variables: true,
            epoch: Epoch::default(),
        }
    }
}

impl IngestConfig {
    pub fn accepts_frequency(&self, seconds: f64) -> bool {
        self.accepted_frequencies.iter().any(|&f| f == seconds)
    }

    pub fn targets_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c.eq_ignore_ascii_case(country))
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_accept_defaults() {
        let config = ResampleConfig::new(1800.0);

        assert!(config.validate().is_ok());
        assert_eq!(config.samples_per_window(), 6.0);
    }

    #[test]
    fn should_reject_bad_frequencies() {
        assert_eq!(
            ResampleConfig::new(0.0).validate(),
            Err(Error::InvalidShortFrequency(0.0))
        );
        assert_eq!(
            ResampleConfig::new(1800.0).window_length(-1.0).validate(),
            Err(Error::InvalidLongFrequency(-1.0))
        );
        assert_eq!(
            ResampleConfig::new(3600.0).window_length(1800.0).validate(),
            Err(Error::InvertedFrequencies {
                short: 3600.0,
                long: 1800.0
            })
        );
        assert!(ResampleConfig::new(3600.0)
            .window_length(3600.0)
            .validate()
            .is_err());
    }

    #[test]
    fn should_reject_out_of_range_thresholds() {
        assert_eq!(
            ResampleConfig::new(1800.0).min_data_percentage(100.5).validate(),
            Err(Error::MinDataPercentageOutOfRange(100.5))
        );
        assert_eq!(
            ResampleConfig::new(1800.0).central_time(24.0).validate(),
            Err(Error::CentralTimeOutOfRange(24.0))
        );
        assert!(ResampleConfig::new(1800.0)
            .min_data_percentage(0.0)
            .central_time(0.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn should_match_countries_and_frequencies() {
        let config = IngestConfig::default();

        assert!(config.targets_country("ca"));
        assert!(!config.targets_country("MX"));
        assert!(config.accepts_frequency(1800.0));
        assert!(!config.accepts_frequency(900.0));
    }
}
