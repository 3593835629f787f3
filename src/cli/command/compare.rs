use anyhow::Result;

use fluxres::{
    compare::{compare as compare_series, sweep},
    reading::StationSeries,
    report::{save_report, ReportSettings, StationReport},
    stats::{parse_statistics, Statistic},
};

use super::{ingest, make_output_dir};
use crate::cli::{create_progress_bar, ResampleArgs};

pub const REPORT_FILE: &str = "comparison_report.txt";

/// Compares raw and resampled statistics of every kept station and writes a
/// report. Returns the report path.
pub async fn compare(
    args: &ResampleArgs,
    percentages: &[f64],
    min_years: &[f64],
    statistics: &[String],
) -> Result<String> {
    let statistics = parse_statistics(statistics)?;
    let output_dir = make_output_dir(args.output.as_deref())?;
    let stations = ingest(args).await?;

    let pb = create_progress_bar(stations.len() as u64, "Comparing stations".to_string());
    let mut reports = vec![];

    for station in &stations {
        match station_report(args, station, &statistics, percentages, min_years) {
            Ok(report) => reports.push(report),
            Err(e) => log::warn!("Could not compare {}: {}", station.site, e),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Stations compared");

    let settings = ReportSettings {
        window_length: args.t_freq_long,
        central_time: args.central_time,
        min_data_percentage: args.min_data_percentage,
    };
    let report_path = output_dir.join(REPORT_FILE);
    save_report(&report_path, &settings, &reports)?;

    Ok(report_path.to_string_lossy().to_string())
}

fn station_report(
    args: &ResampleArgs,
    station: &StationSeries,
    statistics: &[Statistic],
    percentages: &[f64],
    min_years: &[f64],
) -> fluxres::Result<StationReport> {
    let config = args.resample_config(station.t_freq);

    let resampled = station.series.resample(&config)?;
    let comparison = compare_series(&station.series, &resampled, statistics, &config)?;
    let sweep = sweep(&station.series, &config, percentages, min_years)?;

    Ok(StationReport {
        number: station.number,
        station_id: station.site.to_string(),
        t_freq: station.t_freq,
        comparison,
        sweep,
    })
}

// -- Tests -------------------------------------------------------------------
