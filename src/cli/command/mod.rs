pub mod compare;
pub mod resample;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
pub use compare::compare;
pub use resample::resample;

use fluxres::{
    deserialise::deserialise,
    reading::{Ingested, StationSeries, UtcOffsets},
};

use super::{create_spinner, ResampleArgs};

/// `output`, or a dated folder in the home directory. Created if missing.
pub fn make_output_dir(output: Option<&Path>) -> Result<PathBuf> {
    let dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => {
            let today = Local::now();
            let dir_name = format!(
                "fluxres-{}-{:02}-{:02}",
                today.year(),
                today.month(),
                today.day()
            );

            dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not find a home directory"))?
                .join(dir_name)
        }
    };
    fs::create_dir_all(&dir)?;

    Ok(dir)
}

/// Loads the stations in `args.input` that pass ingestion.
async fn ingest(args: &ResampleArgs) -> Result<Vec<StationSeries>> {
    let offsets = match &args.utc_offsets {
        Some(path) => {
            let bar = create_spinner("Reading UTC offsets...".to_string());
            let offsets = UtcOffsets::from_file(path, &args.offset_layout())?;
            bar.finish_with_message(format!("{} UTC offsets read", offsets.len()));
            offsets
        }
        None => UtcOffsets::default(),
    };

    let ingested = deserialise(
        &args.input,
        Arc::new(args.ingest_config()),
        Arc::new(offsets),
    )
    .await?;

    let stations: Vec<StationSeries> = ingested
        .into_iter()
        .filter_map(|i| match i {
            Ingested::Kept(station) => Some(station),
            Ingested::Skipped { .. } => None,
        })
        .collect();

    if stations.is_empty() {
        return Err(anyhow!(
            "No station in `{}` passed ingestion",
            args.input.display()
        ));
    }
    log::info!("{} stations kept", stations.len());

    Ok(stations)
}

// -- Tests -------------------------------------------------------------------
