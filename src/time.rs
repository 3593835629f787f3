//! Conversions between elapsed seconds and calendar time.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Reference instant from which series timestamps are counted, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch(NaiveDateTime);

impl Default for Epoch {
    fn default() -> Self {
        Self::from_date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
    }
}

impl Epoch {
    pub fn new(reference: NaiveDateTime) -> Self {
        Self(reference)
    }

    /// Epoch at midnight of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()))
    }

    pub fn reference(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar time of an elapsed-seconds timestamp. Fractional seconds are truncated.
    pub fn to_datetime(&self, seconds: f64) -> Result<NaiveDateTime> {
        if !seconds.is_finite() {
            return Err(Error::TimestampOutOfRange(seconds));
        }

        Duration::try_seconds(seconds.trunc() as i64)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .ok_or(Error::TimestampOutOfRange(seconds))
    }

    /// Elapsed seconds between the epoch and `datetime`.
    pub fn to_seconds(&self, datetime: NaiveDateTime) -> f64 {
        (datetime - self.0).num_seconds() as f64
    }
}

/// Index of the timestamp closest to `target`. Ties resolve to the earliest index.
pub fn nearest_index(timestamps: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, &ts) in timestamps.iter().enumerate() {
        let difference = (ts - target).abs();
        match best {
            Some((_, min)) if difference >= min => {}
            _ => best = Some((index, difference)),
        }
    }

    best.map(|(index, _)| index)
}

// -- Tests -------------------------------------------------------------------
