//! Placement of the first aggregation window.
//!
//! Windows tile the day with boundaries at `central_time ± window_length / 2`
//! past local midnight. The origin is the boundary at or before the first
//! observation, such that `0 <= first - origin < window_length`.

use crate::{
    config::ResampleConfig,
    error::{Error, Result},
    time::Epoch,
};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Origin of the first window for a series starting at `first_timestamp`.
pub fn resolve_origin(first_timestamp: f64, config: &ResampleConfig) -> Result<f64> {
    origin(
        first_timestamp,
        config.t_freq_long,
        config.central_time,
        &config.epoch,
    )
}

/// Origin of the first `window_length`-second window centred on `central_time`
/// hours, containing `first_timestamp`.
pub fn origin(first_timestamp: f64, window_length: f64, central_time: f64, epoch: &Epoch) -> Result<f64> {
    if !(window_length.is_finite() && window_length > 0.0) {
        return Err(Error::InvalidLongFrequency(window_length));
    }
    if !(0.0..24.0).contains(&central_time) {
        return Err(Error::CentralTimeOutOfRange(central_time));
    }

    let midnight = epoch
        .to_datetime(first_timestamp)?
        .date()
        .and_hms_opt(0, 0, 0)
        .map(|dt| epoch.to_seconds(dt))
        .ok_or(Error::TimestampOutOfRange(first_timestamp))?;

    let half_window_hours = window_length / SECONDS_PER_HOUR / 2.0;
    let mut cutoff = central_time - half_window_hours;
    if cutoff < 0.0 {
        cutoff = central_time + half_window_hours;
    }

    let mut candidate = midnight + cutoff * SECONDS_PER_HOUR;

    // too late
    if candidate > first_timestamp {
        let steps = ((candidate - first_timestamp) / window_length).ceil();
        candidate -= steps * window_length;
    }

    // too early
    if first_timestamp - candidate >= window_length {
        let steps = ((first_timestamp - candidate) / window_length).floor();
        candidate += steps * window_length;
    }

    // rounding guards, at most one step each
    while candidate > first_timestamp {
        candidate -= window_length;
    }
    while first_timestamp - candidate >= window_length {
        candidate += window_length;
    }

    log::trace!("window origin for first timestamp {first_timestamp} is {candidate}");

    Ok(candidate)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    const THREE_HOURS: f64 = 10_800.0;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn should_start_at_midnight_for_default_anchor() {
        let epoch = Epoch::default();
        assert_eq!(origin(1800.0, THREE_HOURS, 1.5, &epoch).unwrap(), 0.0);
    }

    #[test]
    fn should_move_forward_within_the_day() {
        let epoch = Epoch::default();
        let first = epoch.to_seconds(at(2001, 6, 15, 13, 30));

        let start = origin(first, THREE_HOURS, 1.5, &epoch).unwrap();
        assert_eq!(epoch.to_datetime(start).unwrap(), at(2001, 6, 15, 12, 0));
    }

    #[test]
    fn should_wrap_negative_cutoff() {
        let epoch = Epoch::default();
        let first = epoch.to_seconds(at(2001, 6, 15, 1, 0));

        // cutoff 01:00 - 01:30 is negative, so boundaries sit at 02:30 and the
        // window holding 01:00 opened the evening before
        let start = origin(first, THREE_HOURS, 1.0, &epoch).unwrap();
        assert_eq!(epoch.to_datetime(start).unwrap(), at(2001, 6, 14, 23, 30));
    }

    #[test]
    fn should_centre_windows_on_midnight() {
        let epoch = Epoch::default();
        let first = epoch.to_seconds(at(2010, 1, 1, 0, 0));

        let start = origin(first, THREE_HOURS, 0.0, &epoch).unwrap();
        assert_eq!(epoch.to_datetime(start).unwrap(), at(2009, 12, 31, 22, 30));
        assert_eq!(
            epoch.to_datetime(start + THREE_HOURS / 2.0).unwrap(),
            at(2010, 1, 1, 0, 0)
        );
    }

    #[test]
    fn should_contain_first_timestamp() {
        let epoch = Epoch::default();
        let base = epoch.to_seconds(at(2015, 3, 1, 0, 0));

        for step in 0..96 {
            let first = base + 1800.0 * step as f64;
            for central in [0.0, 1.5, 7.25, 12.0, 23.5] {
                let start = origin(first, THREE_HOURS, central, &epoch).unwrap();
                let elapsed = first - start;
                assert!((0.0..THREE_HOURS).contains(&elapsed), "{first} {central}");
            }
        }
    }

    #[test]
    fn should_use_config_window_and_anchor() {
        let config = ResampleConfig::new(1800.0)
            .window_length(6.0 * 3600.0)
            .central_time(3.0);

        assert_eq!(resolve_origin(7200.0, &config).unwrap(), 0.0);
    }

    #[test]
    fn should_reject_invalid_parameters() {
        let epoch = Epoch::default();

        assert_eq!(
            origin(0.0, THREE_HOURS, 24.0, &epoch),
            Err(Error::CentralTimeOutOfRange(24.0))
        );
        assert_eq!(
            origin(0.0, THREE_HOURS, -0.5, &epoch),
            Err(Error::CentralTimeOutOfRange(-0.5))
        );
        assert_eq!(
            origin(0.0, 0.0, 1.5, &epoch),
            Err(Error::InvalidLongFrequency(0.0))
        );
    }
}
