//! Resampling of AmeriFlux flux tower series onto coarser, phase-aligned
//! windows, with descriptive statistics to compare the series before and
//! after.
//!
//! A typical pipeline ingests station files with [`deserialise`], resamples
//! each [`ObservationSeries`] with a [`ResampleConfig`], then saves the results
//! with [`parquet`] and [`report`].

pub mod compare;
pub mod config;
pub mod deserialise;
pub mod error;
pub mod parquet;
pub mod reading;
pub mod report;
pub mod resample;
pub mod series;
pub mod stats;
pub mod time;
pub mod window;

pub use config::{IngestConfig, ResampleConfig};
pub use error::{Error, Result};
pub use resample::{resample, Resampled, WindowOutcome};
pub use series::ObservationSeries;
pub use stats::{calculate_stats, Statistic, StatsRecord};
pub use time::Epoch;
pub use window::resolve_origin;
