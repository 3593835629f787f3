//! Station id and sampling resolution from AmeriFlux file names and headers.

use std::fmt;

use anyhow::{anyhow, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// AmeriFlux site id, e.g. `CA-DBB`: a country code and a station name.
pub struct SiteId {
    pub country: String,
    pub station: String,
}

impl SiteId {
    /// Parses `CA-DBB`.
    pub fn from_id(id: &str) -> Result<Self> {
        match id.trim().split_once('-') {
            Some((country, station)) if !country.is_empty() && !station.is_empty() => Ok(SiteId {
                country: country.to_string(),
                station: station.to_string(),
            }),
            _ => Err(anyhow!("Invalid site id `{}`", id)),
        }
    }

    /// Parses the first line of a station file, `# Site: CA-DBB`.
    pub fn from_metadata(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split([' ', '-']).filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            [_, _, country, station, ..] => Ok(SiteId {
                country: country.to_string(),
                station: station.trim().to_string(),
            }),
            _ => Err(anyhow!("No site id in metadata line `{}`", line)),
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.country, self.station)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Sampling resolution of a station file.
pub enum Resolution {
    HalfHourly,
    Hourly,
    Unknown,
}

impl Resolution {
    pub fn from_code(code: &str) -> Self {
        match code.to_uppercase().as_str() {
            "HH" => Resolution::HalfHourly,
            "HR" => Resolution::Hourly,
            _ => Resolution::Unknown,
        }
    }

    /// Sampling interval in seconds.
    pub fn seconds(&self) -> Option<f64> {
        match self {
            Resolution::HalfHourly => Some(1800.0),
            Resolution::Hourly => Some(3600.0),
            Resolution::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// What a station file name says about its content.
pub struct FileProperties {
    pub site: SiteId,
    pub resolution: Resolution,
}

impl FileProperties {
    /// Parses names like `AMF_CA-DBB_BASE_HH_5-5.csv`.
    pub fn from_file(file_name: &str) -> Result<Self> {
        let parts: Vec<&str> = file_name.split('_').collect();

        match parts.as_slice() {
            ["AMF", site, _, resolution, ..] => Ok(FileProperties {
                site: SiteId::from_id(site)?,
                resolution: Resolution::from_code(resolution),
            }),
            ["AMF", site, ..] => Ok(FileProperties {
                site: SiteId::from_id(site.trim_end_matches(".csv"))?,
                resolution: Resolution::Unknown,
            }),
            _ => Err(anyhow!("Not an AmeriFlux file name: `{}`", file_name)),
        }
    }
}
