use std::{fs, path::Path};

use anyhow::Result;

use fluxres::{
    parquet::{make_series_file_name, save_series},
    report::{save_summary, SummaryRow},
    reading::StationSeries,
    resample::Resampled,
    series::ObservationSeries,
};

use super::{ingest, make_output_dir};
use crate::cli::{create_progress_bar, ResampleArgs};

pub const RAW_DIR: &str = "raw";
pub const RESAMPLED_DIR: &str = "resampled";
pub const RAW_SUMMARY: &str = "summary_raw.txt";
pub const RESAMPLED_SUMMARY: &str = "summary_resampled.txt";

/// Resamples every kept station and saves the raw and resampled series with
/// their summaries. Returns the output folder.
pub async fn resample(args: &ResampleArgs) -> Result<String> {
    let output_dir = make_output_dir(args.output.as_deref())?;
    let raw_dir = output_dir.join(RAW_DIR);
    let resampled_dir = output_dir.join(RESAMPLED_DIR);
    fs::create_dir_all(&raw_dir)?;
    fs::create_dir_all(&resampled_dir)?;

    let stations = ingest(args).await?;
    let variables = args.ingest_config().variables;

    let pb = create_progress_bar(stations.len() as u64, "Resampling stations".to_string());
    let mut raw_rows = vec![];
    let mut resampled_rows = vec![];

    for station in &stations {
        let config = args.resample_config(station.t_freq);

        let resampled = match station.series.resample(&config) {
            Ok(resampled) => resampled,
            Err(e) => {
                log::warn!("Could not resample {}: {}", station.site, e);
                pb.inc(1);
                continue;
            }
        };
        log::info!(
            "{}: {} of {} windows kept",
            station.site,
            resampled.len(),
            resampled.windows().len()
        );

        save_station(station, &resampled, config.t_freq_long, &raw_dir, &resampled_dir)?;

        let station_id = station.site.to_string();
        raw_rows.push(SummaryRow::new(
            station.number,
            &station_id,
            station.series.len(),
            station.t_freq,
        ));
        resampled_rows.push(SummaryRow::new(
            station.number,
            &station_id,
            resampled.len(),
            config.t_freq_long,
        ));
        pb.inc(1);
    }
    pb.finish_with_message("Stations resampled");

    save_summary(&output_dir.join(RAW_SUMMARY), &variables, &raw_rows)?;
    save_summary(&output_dir.join(RESAMPLED_SUMMARY), &variables, &resampled_rows)?;

    Ok(output_dir.to_string_lossy().to_string())
}

fn save_station(
    station: &StationSeries,
    resampled: &Resampled,
    t_freq_long: f64,
    raw_dir: &Path,
    resampled_dir: &Path,
) -> Result<()> {
    let years = (station.first_year, station.last_year);
    let variables = station.series.variables();

    let raw_path = make_series_file_name(raw_dir, station.number, &station.site, years, variables, station.t_freq);
    save_series(&station.series, None, &raw_path)?;

    if resampled.is_empty() {
        log::info!("{}: no resampled series to save", station.site);
        return Ok(());
    }

    let series = ObservationSeries::new(
        variables.to_vec(),
        resampled.timestamps().to_vec(),
        resampled.values().to_vec(),
    )?;
    let resampled_path = make_series_file_name(
        resampled_dir,
        station.number,
        &station.site,
        years,
        variables,
        t_freq_long,
    );
    save_series(&series, Some(resampled.weights()), &resampled_path)?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
