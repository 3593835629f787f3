//! Station id to UTC offset table.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, Default, PartialEq)]
/// UTC offsets in hours, keyed by site id (`CA-DBB`).
pub struct UtcOffsets(HashMap<String, f64>);

/// Where the fields of the offset file are.
#[derive(Debug, Clone)]
pub struct OffsetLayout {
    pub header_rows: usize,
    pub delimiter: char,
    pub station_index: usize,
    pub offset_index: usize,
}

impl Default for OffsetLayout {
    fn default() -> Self {
        Self {
            header_rows: 1,
            delimiter: ',',
            station_index: 0,
            offset_index: 1,
        }
    }
}

impl UtcOffsets {
    pub fn from_file(path: &Path, layout: &OffsetLayout) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open UTC offsets `{}`", path.display()))?;

        Self::from_reader(io::BufReader::new(file), layout)
    }

    pub fn from_reader<R: BufRead>(reader: R, layout: &OffsetLayout) -> Result<Self> {
        let mut offsets = HashMap::new();

        for (line_number, line) in reader.lines().enumerate().skip(layout.header_rows) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(layout.delimiter).map(str::trim).collect();
            let (Some(station), Some(offset)) =
                (fields.get(layout.station_index), fields.get(layout.offset_index))
            else {
                return Err(anyhow!("Line {} is missing fields: `{}`", line_number + 1, line));
            };

            let offset: f64 = offset
                .parse()
                .with_context(|| format!("Invalid UTC offset on line {}", line_number + 1))?;

            // every station is in the Americas, so offsets are negative
            offsets.insert(station.to_string(), -offset.abs());
        }

        Ok(UtcOffsets(offsets))
    }

    /// Offset of `site_id` in hours.
    pub fn get(&self, site_id: &str) -> Option<f64> {
        self.0.get(site_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn should_read_offsets() {
        let text = "station;name;utc\nCA-DBB;Delta Burns Bog;8\nUS-Wrc;Wind River;-8\n\n";
        let layout = OffsetLayout {
            header_rows: 1,
            delimiter: ';',
            station_index: 0,
            offset_index: 2,
        };

        let offsets = UtcOffsets::from_reader(Cursor::new(text), &layout).unwrap();

        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets.get("CA-DBB"), Some(-8.0));
        assert_eq!(offsets.get("US-Wrc"), Some(-8.0));
        assert_eq!(offsets.get("US-Ha1"), None);
    }

    #[test]
    fn should_fail_on_bad_lines() {
        let layout = OffsetLayout::default();

        assert!(UtcOffsets::from_reader(Cursor::new("id,utc\nCA-DBB\n"), &layout).is_err());
        assert!(UtcOffsets::from_reader(Cursor::new("id,utc\nCA-DBB,x\n"), &layout).is_err());
    }

    #[test]
    fn should_read_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "id,utc\nUS-Ha1,-5\n").unwrap();

        let offsets = UtcOffsets::from_file(file.path(), &OffsetLayout::default()).unwrap();
        assert_eq!(offsets.get("US-Ha1"), Some(-5.0));
    }
}
