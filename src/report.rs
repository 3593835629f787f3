//! Plain text summary files and the comparison report.

use std::{
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};

use crate::{
    compare::{years_of_data, Comparison, SweepRow},
    config::ResampleConfig,
};

const SUMMARY_HEADER_ROWS: usize = 3;
const SUMMARY_COLUMNS: &str = "number station_id entries t_freq_hours years";
const TOTAL_LABEL: &str = "total";

/// One station line of a summary file.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub number: usize,
    pub station_id: String,
    pub entries: usize,
    pub t_freq_hours: f64,
    pub years: f64,
}

impl SummaryRow {
    /// `t_freq` in seconds.
    pub fn new(number: usize, station_id: &str, entries: usize, t_freq: f64) -> Self {
        SummaryRow {
            number,
            station_id: station_id.to_string(),
            entries,
            t_freq_hours: t_freq / 3600.0,
            years: years_of_data(entries, t_freq),
        }
    }
}

/// Writes three header rows, one line per station and a closing total line.
pub fn write_summary<W: Write>(writer: &mut W, variables: &[String], rows: &[SummaryRow]) -> Result<()> {
    writeln!(writer, "# fluxres summary")?;
    writeln!(writer, "# variables: {}", variables.join("-"))?;
    writeln!(writer, "{}", SUMMARY_COLUMNS)?;

    for row in rows {
        writeln!(
            writer,
            "{} {} {} {} {:.6}",
            row.number, row.station_id, row.entries, row.t_freq_hours, row.years
        )?;
    }

    let entries: usize = rows.iter().map(|r| r.entries).sum();
    let years: f64 = rows.iter().map(|r| r.years).sum();
    writeln!(writer, "{} - {} - {:.6}", TOTAL_LABEL, entries, years)?;

    Ok(())
}

pub fn save_summary(file_path: &Path, variables: &[String], rows: &[SummaryRow]) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("Could not create `{}`", file_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_summary(&mut writer, variables, rows)?;
    writer.flush()?;

    Ok(())
}

/// Reads the station lines of a summary file, skipping the header and total.
pub fn read_summary<R: BufRead>(reader: R) -> Result<Vec<SummaryRow>> {
    let mut rows = vec![];

    for (line_number, line) in reader.lines().enumerate().skip(SUMMARY_HEADER_ROWS) {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            [] => continue,
            [label, ..] if *label == TOTAL_LABEL => continue,
            [number, station_id, entries, t_freq_hours, years] => {
                let context = || format!("Invalid summary line {}: `{}`", line_number + 1, line);
                rows.push(SummaryRow {
                    number: number.parse().with_context(context)?,
                    station_id: station_id.to_string(),
                    entries: entries.parse().with_context(context)?,
                    t_freq_hours: t_freq_hours.parse().with_context(context)?,
                    years: years.parse().with_context(context)?,
                });
            }
            _ => {
                return Err(anyhow!(
                    "Summary line {} has {} fields: `{}`",
                    line_number + 1,
                    fields.len(),
                    line
                ))
            }
        }
    }

    Ok(rows)
}

pub fn load_summary(file_path: &Path) -> Result<Vec<SummaryRow>> {
    let file = File::open(file_path)
        .with_context(|| format!("Could not open `{}`", file_path.display()))?;

    read_summary(io::BufReader::new(file))
}

/// Resampling settings shared by every station of a report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub window_length: f64,
    pub central_time: f64,
    pub min_data_percentage: f64,
}

impl From<&ResampleConfig> for ReportSettings {
    fn from(config: &ResampleConfig) -> Self {
        ReportSettings {
            window_length: config.t_freq_long,
            central_time: config.central_time,
            min_data_percentage: config.min_data_percentage,
        }
    }
}

/// Results for one station in the comparison report.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReport {
    pub number: usize,
    pub station_id: String,
    /// Source sampling interval, in seconds.
    pub t_freq: f64,
    pub comparison: Comparison,
    pub sweep: Vec<SweepRow>,
}

pub fn write_report<W: Write>(
    writer: &mut W,
    settings: &ReportSettings,
    stations: &[StationReport],
) -> Result<()> {
    writeln!(writer, "# fluxres comparison report")?;
    writeln!(
        writer,
        "# window {} s, central time {} h, minimum data {} %",
        settings.window_length, settings.central_time, settings.min_data_percentage
    )?;

    for station in stations {
        let comparison = &station.comparison;

        writeln!(writer)?;
        writeln!(writer, "[{:03} {}]", station.number, station.station_id)?;
        writeln!(writer, "sampling {} s", station.t_freq)?;
        writeln!(
            writer,
            "entries raw {} resampled {}",
            comparison.raw_entries, comparison.resampled_entries
        )?;
        writeln!(
            writer,
            "years raw {:.4} resampled {:.4} change {}",
            comparison.raw_years,
            comparison.resampled_years,
            percent(comparison.years_relative_difference())
        )?;

        writeln!(writer, "variable statistic raw resampled change")?;
        for (statistic, before) in comparison.before.iter() {
            let after = comparison.after.as_ref().and_then(|a| a.get(statistic));
            let change = comparison.relative_difference(statistic);

            for (i, variable) in comparison.variables.iter().enumerate() {
                writeln!(
                    writer,
                    "{} {} {:.4} {} {}",
                    variable,
                    statistic,
                    before[i],
                    after.map_or("-".to_string(), |a| format!("{:.4}", a[i])),
                    change.as_ref().map_or("-".to_string(), |c| percent(c[i]))
                )?;
            }
        }

        write_sweep(writer, &comparison.variables, &station.sweep)?;
    }

    write_policy_grid(writer, stations)?;

    Ok(())
}

fn write_sweep<W: Write>(writer: &mut W, variables: &[String], sweep: &[SweepRow]) -> Result<()> {
    let min_years: Vec<f64> = sweep
        .first()
        .map(|row| row.min_years.iter().map(|&(y, _)| y).collect())
        .unwrap_or_default();

    write!(writer, "min_data_percentage entries windows retained years")?;
    for variable in variables {
        write!(writer, " mean_{}", variable)?;
    }
    for y in &min_years {
        write!(writer, " min_years_{}", y)?;
    }
    writeln!(writer)?;

    for row in sweep {
        write!(
            writer,
            "{} {} {} {} {:.4}",
            row.min_data_percentage,
            row.entries,
            row.windows,
            percent(row.retained()),
            row.years
        )?;
        for i in 0..variables.len() {
            match &row.means {
                Some(means) => write!(writer, " {:.4}", means[i])?,
                None => write!(writer, " -")?,
            }
        }
        for &(_, meets) in &row.min_years {
            write!(writer, " {}", if meets { "yes" } else { "no" })?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Stations meeting each minimum data percentage and minimum years pair.
fn write_policy_grid<W: Write>(writer: &mut W, stations: &[StationReport]) -> Result<()> {
    let mut cells: Vec<(f64, f64, Vec<&str>)> = vec![];

    for station in stations {
        for row in &station.sweep {
            for &(min_years, meets) in &row.min_years {
                let position = cells
                    .iter()
                    .position(|(p, y, _)| *p == row.min_data_percentage && *y == min_years);
                let index = match position {
                    Some(index) => index,
                    None => {
                        cells.push((row.min_data_percentage, min_years, vec![]));
                        cells.len() - 1
                    }
                };
                if meets {
                    cells[index].2.push(&station.station_id);
                }
            }
        }
    }

    if cells.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "[policies]")?;
    writeln!(writer, "min_data_percentage min_years stations station_ids")?;
    for (min_data_percentage, min_years, ids) in &cells {
        let listed = if ids.is_empty() {
            "-".to_string()
        } else {
            ids.join(",")
        };
        writeln!(
            writer,
            "{} {} {} {}",
            min_data_percentage,
            min_years,
            ids.len(),
            listed
        )?;
    }

    Ok(())
}

pub fn save_report(file_path: &Path, settings: &ReportSettings, stations: &[StationReport]) -> Result<()> {
    let file = File::create(file_path)
        .with_context(|| format!("Could not create `{}`", file_path.display()))?;
    let mut writer = BufWriter::new(file);

    write_report(&mut writer, settings, stations)?;
    writer.flush()?;

    Ok(())
}

fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

// -- Tests -------------------------------------------------------------------
