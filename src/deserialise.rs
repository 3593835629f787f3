//! Loads a folder of AmeriFlux station files concurrently.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Result;

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::IngestConfig,
    reading::{load_station, Ingested, UtcOffsets},
};

const STATION_EXTENSION: &str = "csv";

/// Loads every station file in `input_dir`, one task per file.
///
/// Kept stations are numbered from 1 in file-name order. Files that fail to
/// load are logged and left out.
pub async fn deserialise(
    input_dir: &Path,
    config: Arc<IngestConfig>,
    offsets: Arc<UtcOffsets>,
) -> Result<Vec<Ingested>> {
    let files = station_files(input_dir)?;

    let progress_bar = Arc::new(Mutex::new(
        ProgressBar::new(files.len() as u64).with_message("Processing station files"),
    ));
    progress_bar.lock().unwrap().set_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let tasks: Vec<_> = files
        .iter()
        .map(|file| {
            let file = file.clone();
            let config = Arc::clone(&config);
            let offsets = Arc::clone(&offsets);
            let pb = Arc::clone(&progress_bar);
            tokio::spawn(async move { process_file(&file, &config, &offsets, pb) })
        })
        .collect();

    let mut stations = Vec::new();
    for (file, result) in files.iter().zip(join_all(tasks).await) {
        match result {
            Ok(Ok(ingested)) => stations.push(ingested),
            Ok(Err(e)) => log::warn!("Error processing {}: {:?}", file.display(), e),
            Err(e) => log::error!("Task join error: {:?}", e),
        }
    }
    progress_bar
        .lock()
        .unwrap()
        .finish_with_message("Processing complete");

    number_stations(&mut stations);

    Ok(stations)
}

/// Station files in `input_dir`, sorted by name.
pub fn station_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = input_dir
        .read_dir()?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, std::io::Error>>()?
        .into_iter()
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == STATION_EXTENSION)
        })
        .collect();
    files.sort();

    Ok(files)
}

fn process_file(
    file_path: &Path,
    config: &IngestConfig,
    offsets: &UtcOffsets,
    progress_bar: Arc<Mutex<ProgressBar>>,
) -> Result<Ingested> {
    let ingested = load_station(file_path, config, offsets);

    match &ingested {
        Ok(Ingested::Kept(station)) => log::info!(
            "Keeping {} with {} complete rows",
            station.site,
            station.series.len()
        ),
        Ok(Ingested::Skipped { site, reason }) => log::info!("Skipping {}: {:?}", site, reason),
        Err(_) => {}
    }

    {
        let pb = progress_bar.lock().unwrap();
        pb.inc(1);
    }

    ingested
}

fn number_stations(stations: &mut [Ingested]) {
    let kept = stations.iter_mut().filter_map(|ingested| match ingested {
        Ingested::Kept(station) => Some(station),
        Ingested::Skipped { .. } => None,
    });

    for (index, station) in kept.enumerate() {
        station.number = index + 1;
    }
}

// -- Tests -------------------------------------------------------------------
