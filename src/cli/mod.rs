//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::{command, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use fluxres::{
    config::{
        IngestConfig, ResampleConfig, DEFAULT_CENTRAL_TIME, DEFAULT_MIN_DATA_PERCENTAGE,
        DEFAULT_WINDOW_LENGTH,
    },
    reading::utc_offsets::OffsetLayout,
    Epoch,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resample station files and save the raw and resampled series
    Resample {
        #[command(flatten)]
        args: ResampleArgs,
    },
    /// Compare raw and resampled statistics over several minimum data percentages
    Compare {
        #[command(flatten)]
        args: ResampleArgs,

        /// Minimum data percentages to compare
        #[arg(long, value_delimiter = ',', default_values_t = vec![10.0, 25.0, 50.0, 75.0, 90.0])]
        percentages: Vec<f64>,

        /// Minimum years of resampled data checked for each percentage
        #[arg(long, value_delimiter = ',', default_values_t = vec![1.0, 2.0, 5.0])]
        min_years_list: Vec<f64>,

        /// Statistics to compare: MEAN, STANDARD_DEVIATION, MEDIAN
        #[arg(long, value_delimiter = ',', default_value = "MEAN,STANDARD_DEVIATION")]
        statistics: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ResampleArgs {
    /// Folder of AmeriFlux BASE station files
    #[arg(long)]
    pub input: PathBuf,

    /// Output folder, defaults to a dated folder in the home directory
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Variables a station must have
    #[arg(long, value_delimiter = ',')]
    pub variables: Option<Vec<String>>,

    /// Window length in seconds
    #[arg(long, default_value_t = DEFAULT_WINDOW_LENGTH)]
    pub t_freq_long: f64,

    /// Hour of the day windows are centred on
    #[arg(long, default_value_t = DEFAULT_CENTRAL_TIME)]
    pub central_time: f64,

    /// Minimum share of expected samples a window needs, in percent
    #[arg(long, default_value_t = DEFAULT_MIN_DATA_PERCENTAGE)]
    pub min_data_percentage: f64,

    /// Minimum years of complete rows a station needs
    #[arg(long, default_value_t = 1.0)]
    pub min_years: f64,

    /// Country codes of the stations to keep
    #[arg(long, value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Lines before the first data row of a station file
    #[arg(long, default_value_t = 3)]
    pub header_rows: usize,

    /// Date whose midnight timestamps count from
    #[arg(long, default_value = "1970-01-01")]
    pub epoch: NaiveDate,

    /// Do not compute NETRAD and ALB for stations that lack them
    #[arg(long)]
    pub no_derive: bool,

    /// Table of station UTC offsets in hours
    #[arg(long)]
    pub utc_offsets: Option<PathBuf>,

    /// Header rows of the UTC offset table
    #[arg(long, default_value_t = 1)]
    pub offset_header_rows: usize,

    /// Field delimiter of the UTC offset table
    #[arg(long, default_value_t = ',')]
    pub offset_delimiter: char,

    /// Column of the station id in the UTC offset table, from 0
    #[arg(long, default_value_t = 0)]
    pub offset_station_column: usize,

    /// Column of the offset in the UTC offset table, from 0
    #[arg(long, default_value_t = 1)]
    pub offset_column: usize,
}

impl ResampleArgs {
    pub fn ingest_config(&self) -> IngestConfig {
        let defaults = IngestConfig::default();

        IngestConfig {
            variables: self.variables.clone().unwrap_or(defaults.variables),
            countries: self.countries.clone().unwrap_or(defaults.countries),
            header_rows: self.header_rows,
            min_years: self.min_years,
            derive_variables: !self.no_derive,
            epoch: Epoch::from_date(self.epoch),
            ..defaults
        }
    }

    /// Resampling settings for a station sampled every `t_freq_short` seconds.
    pub fn resample_config(&self, t_freq_short: f64) -> ResampleConfig {
        ResampleConfig::new(t_freq_short)
            .window_length(self.t_freq_long)
            .central_time(self.central_time)
            .min_data_percentage(self.min_data_percentage)
            .epoch(Epoch::from_date(self.epoch))
    }

    pub fn offset_layout(&self) -> OffsetLayout {
        OffsetLayout {
            header_rows: self.offset_header_rows,
            delimiter: self.offset_delimiter,
            station_index: self.offset_station_column,
            offset_index: self.offset_column,
        }
    }
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_parse_resample_defaults() {
        let cli = Cli::try_parse_from(["fluxres", "resample", "--input", "data"]).unwrap();

        let Commands::Resample { args } = cli.command else {
            panic!("expected resample");
        };
        assert_eq!(args.input, PathBuf::from("data"));
        assert_eq!(args.output, None);

        let config = args.resample_config(1800.0);
        assert_eq!(config, ResampleConfig::new(1800.0));
        assert_eq!(args.ingest_config(), IngestConfig::default());
        assert_eq!(args.offset_layout().delimiter, ',');
        assert_eq!(args.offset_layout().offset_index, 1);
    }

    #[test]
    fn should_parse_ingestion_flags() {
        let cli = Cli::try_parse_from([
            "fluxres",
            "resample",
            "--input",
            "data",
            "--countries",
            "US,MX",
            "--header-rows",
            "2",
            "--epoch",
            "2000-01-01",
            "--no-derive",
            "--offset-header-rows",
            "0",
            "--offset-delimiter",
            ";",
            "--offset-station-column",
            "1",
            "--offset-column",
            "3",
        ])
        .unwrap();

        let Commands::Resample { args } = cli.command else {
            panic!("expected resample");
        };

        let epoch = Epoch::from_date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        let ingest = args.ingest_config();
        assert_eq!(ingest.countries, vec!["US".to_string(), "MX".to_string()]);
        assert_eq!(ingest.header_rows, 2);
        assert_eq!(ingest.epoch, epoch);
        assert!(!ingest.derive_variables);
        assert_eq!(args.resample_config(1800.0).epoch, epoch);

        let layout = args.offset_layout();
        assert_eq!(layout.header_rows, 0);
        assert_eq!(layout.delimiter, ';');
        assert_eq!(layout.station_index, 1);
        assert_eq!(layout.offset_index, 3);
    }

    #[test]
    fn should_parse_compare_flags() {
        let cli = Cli::try_parse_from([
            "fluxres",
            "compare",
            "--input",
            "data",
            "--variables",
            "TA,H",
            "--percentages",
            "20,80",
            "--central-time",
            "0",
        ])
        .unwrap();

        let Commands::Compare {
            args, percentages, ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert_eq!(percentages, vec![20.0, 80.0]);
        assert_eq!(args.ingest_config().variables, vec!["TA".to_string(), "H".to_string()]);
        assert_eq!(args.resample_config(3600.0).central_time, 0.0);
    }

    #[test]
    fn should_default_compare_percentages() {
        let cli = Cli::try_parse_from(["fluxres", "compare", "--input", "data"]).unwrap();

        let Commands::Compare {
            percentages,
            min_years_list,
            statistics,
            ..
        } = cli.command
        else {
            panic!("expected compare");
        };
        assert_eq!(percentages, vec![10.0, 25.0, 50.0, 75.0, 90.0]);
        assert_eq!(min_years_list, vec![1.0, 2.0, 5.0]);
        assert_eq!(statistics, vec!["MEAN".to_string(), "STANDARD_DEVIATION".to_string()]);
    }
}
