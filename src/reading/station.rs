//! Loading and filtering one station file into an observation series.

use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use chrono::Datelike;

use crate::{config::IngestConfig, series::ObservationSeries};

use super::{FileProperties, FluxRecord, Header, Reading, SiteId, UtcOffsets};

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

/// Complete rows of a kept station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    /// Position among kept stations, from 1; 0 until assigned.
    pub number: usize,
    pub site: SiteId,
    /// Source sampling interval, in seconds.
    pub t_freq: f64,
    pub first_year: i32,
    pub last_year: i32,
    pub series: ObservationSeries,
}

/// Why a station was left out.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    CountryNotTargeted(String),
    UnsupportedFrequency,
    MissingVariables(Vec<String>),
    /// Years spanned by the complete rows.
    InsufficientData(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ingested {
    Kept(StationSeries),
    Skipped { site: SiteId, reason: SkipReason },
}

pub fn load_station(path: &Path, config: &IngestConfig, offsets: &UtcOffsets) -> Result<Ingested> {
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| anyhow!("Invalid file name `{}`", path.display()))?;
    let properties = FileProperties::from_file(file_name)?;

    let file = File::open(path).with_context(|| format!("Could not open `{}`", path.display()))?;
    read_station(io::BufReader::new(file), properties, config, offsets)
}

pub fn read_station<R: BufRead>(
    reader: R,
    properties: FileProperties,
    config: &IngestConfig,
    offsets: &UtcOffsets,
) -> Result<Ingested> {
    let mut lines = reader.lines();

    let metadata = lines.next().ok_or_else(|| anyhow!("Empty station file"))??;
    let site = SiteId::from_metadata(&metadata).unwrap_or(properties.site);

    let skip = |reason| Ok(Ingested::Skipped { site: site.clone(), reason });

    if !config.targets_country(&site.country) {
        return skip(SkipReason::CountryNotTargeted(site.country.clone()));
    }

    let t_freq = match properties.resolution.seconds() {
        Some(seconds) if config.accepts_frequency(seconds) => seconds,
        _ => return skip(SkipReason::UnsupportedFrequency),
    };

    // the last header row names the columns
    let mut header_line = metadata;
    for _ in 1..config.header_rows {
        header_line = lines
            .next()
            .ok_or_else(|| anyhow!("Station file ends inside its header"))??;
    }

    let header = match Header::from_line(
        &header_line,
        &config.variables,
        config.missing_value,
        config.derive_variables,
    ) {
        Ok(header) => header,
        Err(missing) => return skip(SkipReason::MissingVariables(missing)),
    };

    let mut records = vec![];
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = FluxRecord::from_line(&line, &header)?;
        if record.is_valid() {
            records.push(record);
        }
    }

    let years = span_years(&records);
    if records.len() < 2 || years < config.min_years {
        return skip(SkipReason::InsufficientData(years));
    }

    let offset = offsets.get(&site.to_string()).unwrap_or(0.0) * 3600.0;
    let timestamps = records
        .iter()
        .map(|r| config.epoch.to_seconds(r.start) + offset)
        .collect();
    let first_year = records[0].start.year();
    let last_year = records[records.len() - 1].start.year();
    let values = records
        .into_iter()
        .map(|r| r.values.into_iter().flatten().collect())
        .collect();

    let series = ObservationSeries::new(config.variables.clone(), timestamps, values)
        .with_context(|| format!("Station {} is not a valid series", site))?;

    Ok(Ingested::Kept(StationSeries {
        number: 0,
        site,
        t_freq,
        first_year,
        last_year,
        series,
    }))
}

/// Years of 365 days between the first start and the last end.
fn span_years(records: &[FluxRecord]) -> f64 {
    match (records.first(), records.last()) {
        (Some(first), Some(last)) if records.len() >= 2 => {
            (last.end - first.start).num_seconds() as f64 / SECONDS_PER_DAY / 365.0
        }
        _ => 0.0,
    }
}

// -- Tests -------------------------------------------------------------------
