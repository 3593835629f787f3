//! Handles serialising and saving data to disk in the _parquet_ file format.

pub mod series;

use std::path::{Path, PathBuf};

pub use series::{load_series, save_series};

use crate::reading::SiteId;

/// `AMF_<nnn>_<CC-NAME>_<first>-<last>_<VAR-VAR>_<minutes>.parquet` in `dir`.
pub fn make_series_file_name(
    dir: &Path,
    number: usize,
    site: &SiteId,
    years: (i32, i32),
    variables: &[String],
    t_freq: f64,
) -> PathBuf {
    let file_name = format!(
        "AMF_{:03}_{}_{}-{}_{}_{}.parquet",
        number,
        site,
        years.0,
        years.1,
        variables.join("-"),
        (t_freq / 60.0).round() as u64
    );

    dir.join(file_name)
}

// -- Tests -------------------------------------------------------------------
