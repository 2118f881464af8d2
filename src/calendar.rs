//! Leap-year aware daily calendar.
//!
//! Every grid row stands for one calendar day, stamped at its midpoint
//! on the fractional year axis. This module converts between those
//! fractional-year timestamps and zero-based day offsets from a start year.
use hifitime::{Epoch, Unit};
use itertools::{Itertools, MinMaxResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::component::Sample;
use crate::error::Error;

/// Returns true if `year` is a Gregorian leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in given `year`: 365 or 366
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// First year a timestamp may fall in
pub const MIN_YEAR: i32 = 1;

/// Last year a timestamp may fall in
pub const MAX_YEAR: i32 = 9999;

/// Number of days from January 1st of year 0 (proleptic Gregorian)
/// to January 1st of `year`. Negative for years preceding year 0.
fn days_from_epoch(year: i64) -> i64 {
    365 * year + (year + 3).div_euclid(4) - (year + 99).div_euclid(100)
        + (year + 399).div_euclid(400)
}

/// Total number of days from `start_year` (included) up to
/// `start_year + year_offset` (excluded).
/// A negative offset counts backwards and returns a negative number of days,
/// so that dates preceding `start_year` map to negative offsets.
pub fn cumulative_days(start_year: i32, year_offset: i32) -> i64 {
    let start_year = start_year as i64;
    days_from_epoch(start_year + year_offset as i64) - days_from_epoch(start_year)
}

/// Calendar year of given fractional year `timestamp`.
/// None if `timestamp` is not finite or lies outside [MIN_YEAR, MAX_YEAR].
pub fn timestamp_year(timestamp: f64) -> Option<i32> {
    if !timestamp.is_finite() {
        return None;
    }
    let year = timestamp.floor();
    if year < MIN_YEAR as f64 || year > MAX_YEAR as f64 {
        None
    } else {
        Some(year as i32)
    }
}

/// Converts a fractional year `timestamp` to its zero-based row
/// in a daily grid starting January 1st of `start_year`.
/// The integer part of `timestamp` is the calendar year, its fractional part
/// the position within that year, expressed at the day midpoint.
/// Halves round to even: a day boundary goes to the even day of the two it separates.
/// The returned row is negative when `timestamp` precedes `start_year`.
/// None when `timestamp` does not fall in a supported year, see [timestamp_year].
pub fn day_row(start_year: i32, timestamp: f64) -> Option<i64> {
    let year = timestamp_year(timestamp)?;
    let ndays = days_in_year(year) as f64;
    let frac = timestamp - year as f64;
    let doy = (frac * ndays - 0.5).round_ties_even() as i64;
    Some(doy + days_from_epoch(year as i64) - days_from_epoch(start_year as i64))
}

/// Returns the (year, day of year) pair of given `row`, day of year being zero based.
pub(crate) fn year_and_day(start_year: i32, row: usize) -> (i32, u32) {
    let mut year = start_year;
    let mut day = row as u64;
    loop {
        let ndays = days_in_year(year) as u64;
        if day < ndays {
            return (year, day as u32);
        }
        day -= ndays;
        year += 1;
    }
}

/// Fractional year label of given `row`, stamped at the day midpoint.
/// This is the inverse of [day_row].
pub fn fractional_year(start_year: i32, row: usize) -> f64 {
    let (year, day) = year_and_day(start_year, row);
    year as f64 + (day as f64 + 0.5) / days_in_year(year) as f64
}

/// Returns January 1st 00:00:00 UTC of `year`
pub(crate) fn new_year(year: i32) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(year, 1, 1)
}

/// Midpoint instant of given `row`
pub fn row_epoch(start_year: i32, row: usize) -> Epoch {
    new_year(start_year) + (row as f64 + 0.5) * Unit::Day
}

/// [EpochWindow] is the multi-year span covered by a daily grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EpochWindow {
    /// First year of the window
    pub start_year: i32,
    /// Number of years covered
    pub years: u32,
}

impl EpochWindow {
    /// Builds a window spanning `years` years, starting on January 1st of `start_year`
    pub fn new(start_year: i32, years: u32) -> Self {
        Self { start_year, years }
    }
    /// Number of days (grid rows) in this window
    pub fn len(&self) -> usize {
        let start_year = self.start_year as i64;
        (days_from_epoch(start_year + self.years as i64) - days_from_epoch(start_year)) as usize
    }
    /// True if this window does not cover a single day
    pub fn is_empty(&self) -> bool {
        self.years == 0
    }
    /// First instant of this window
    pub fn start_epoch(&self) -> Epoch {
        new_year(self.start_year)
    }
    /// First instant following this window
    pub fn end_epoch(&self) -> Epoch {
        new_year(self.start_year.saturating_add_unsigned(self.years))
    }
}

impl std::fmt::Display for EpochWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({} days)",
            self.start_epoch(),
            self.end_epoch(),
            self.len()
        )
    }
}

/// Describes how a station grid is dimensioned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowSizing {
    /// Grid covers exactly this window
    Calendar(EpochWindow),
    /// Grid has a fixed number of rows, starting January 1st
    /// of the earliest sampled year
    Fixed(usize),
    /// Grid covers every year between the earliest and latest sampled years
    Spanning,
}

impl Default for WindowSizing {
    fn default() -> Self {
        Self::Fixed(366)
    }
}

impl WindowSizing {
    /// Resolves the (start year, number of rows) of a station grid.
    /// `Fixed` and `Spanning` sizing need at least one sample, and every
    /// sample to fall within [MIN_YEAR, MAX_YEAR].
    pub fn resolve<'a, I>(&self, station: &str, samples: I) -> Result<(i32, usize), Error>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        if let Self::Calendar(window) = self {
            return Ok((window.start_year, window.len()));
        }
        let years = samples
            .into_iter()
            .map(|s| {
                timestamp_year(s.timestamp)
                    .ok_or_else(|| Error::InvalidTimestamp(station.to_string(), s.timestamp))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let years = years.into_iter().minmax();
        let (first, last) = match years {
            MinMaxResult::NoElements => return Err(Error::NoSamples(station.to_string())),
            MinMaxResult::OneElement(y) => (y, y),
            MinMaxResult::MinMax(first, last) => (first, last),
        };
        match self {
            Self::Fixed(rows) => Ok((first, *rows)),
            _ => {
                let window = EpochWindow::new(first, (last - first + 1) as u32);
                Ok((window.start_year, window.len()))
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::Rng;

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(1996));
        assert!(is_leap_year(2020));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2100), 365);
    }

    #[test]
    fn cumulated_days() {
        assert_eq!(cumulative_days(2000, 0), 0);
        assert_eq!(cumulative_days(2000, 1), 366);
        assert_eq!(cumulative_days(2001, 1), 365);
        assert_eq!(cumulative_days(2000, 4), 1461);
        assert_eq!(cumulative_days(2000, -1), -365);
        assert_eq!(cumulative_days(2001, -1), -366);
        assert_eq!(cumulative_days(1900, 1), 365);
        assert_eq!(cumulative_days(1600, 400), 146097);
        assert_eq!(cumulative_days(2000, -400), -146097);
        for year in 1890..2110 {
            assert_eq!(cumulative_days(year, 1), days_in_year(year) as i64);
        }
    }

    #[test]
    fn day_rows() {
        assert_eq!(day_row(2020, 2020.0027), Some(0));
        assert_eq!(day_row(2020, 2020.0 + 365.5 / 366.0), Some(365));
        assert_eq!(day_row(2020, 2021.0 + 0.5 / 365.0), Some(366));
        assert_eq!(day_row(2021, 2020.0 + 365.5 / 366.0), Some(-1));
        assert_eq!(
            day_row(2019, 2022.0 + 10.5 / 365.0),
            Some(365 + 366 + 365 + 10)
        );
    }

    #[test]
    fn day_boundaries() {
        // boundaries go to the even day
        assert_eq!(day_row(2020, 2020.0), Some(0));
        assert_eq!(day_row(2020, 2020.5), Some(182));
        assert_eq!(day_row(2021, 2021.0), Some(0));
        assert_eq!(day_row(2020, 2021.0), Some(366));
        // every day boundary of a common and a leap year
        for year in [2020, 2021] {
            let ndays = days_in_year(year);
            for day in 0..ndays {
                let timestamp = year as f64 + day as f64 / ndays as f64;
                let row = day_row(year, timestamp).unwrap();
                assert!(
                    row == day as i64 || row == day as i64 - 1,
                    "{} mapped to row {}",
                    timestamp,
                    row
                );
            }
        }
    }

    #[test]
    fn unsupported_timestamps() {
        assert_eq!(timestamp_year(2020.5), Some(2020));
        assert_eq!(timestamp_year(MAX_YEAR as f64 + 0.5), Some(MAX_YEAR));
        let unsupported = [
            -1.0E10,
            1.0E10,
            0.5,
            10000.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for timestamp in unsupported {
            assert_eq!(timestamp_year(timestamp), None, "{}", timestamp);
            assert_eq!(day_row(2020, timestamp), None, "{}", timestamp);
        }
        // any start year
        assert!(day_row(i32::MIN, 2020.5).is_some_and(|row| row > 0));
        assert!(day_row(i32::MAX, 2020.5).is_some_and(|row| row < 0));
    }

    #[test]
    fn midpoint_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let start_year: i32 = rng.gen_range(1980..2040);
            let year = start_year + rng.gen_range(0..10);
            let doy = rng.gen_range(0..days_in_year(year));
            let timestamp = year as f64 + (doy as f64 + 0.5) / days_in_year(year) as f64;
            let row = day_row(start_year, timestamp).unwrap();
            assert_eq!(
                row,
                doy as i64 + cumulative_days(start_year, year - start_year),
                "{} (start {})",
                timestamp,
                start_year
            );
            let label = fractional_year(start_year, row as usize);
            assert!((label - timestamp).abs() < 1E-9);
        }
    }

    #[test]
    fn row_labels() {
        assert!((fractional_year(2020, 0) - (2020.0 + 0.5 / 366.0)).abs() < 1E-12);
        assert!((fractional_year(2020, 366) - (2021.0 + 0.5 / 365.0)).abs() < 1E-12);
        // 366th row of a common year spills over next year
        assert!((fractional_year(2021, 365) - (2022.0 + 0.5 / 365.0)).abs() < 1E-12);
        assert_eq!(year_and_day(2019, 365 + 366), (2021, 0));
    }

    #[test]
    fn window() {
        let window = EpochWindow::new(2020, 3);
        assert_eq!(window.len(), 366 + 365 + 365);
        let span = window.end_epoch() - window.start_epoch();
        assert_eq!(span.to_unit(Unit::Day).round() as usize, window.len());
        assert!(!window.is_empty());
        assert!(EpochWindow::new(2020, 0).is_empty());

        let midpoint = row_epoch(2020, 0) - window.start_epoch();
        assert!((midpoint.to_unit(Unit::Hour) - 12.0).abs() < 1E-6);
    }

    #[test]
    fn sizing() {
        let samples = vec![
            Sample::new(2021.5, 1.0),
            Sample::new(2019.1, 1.0),
            Sample::new(2020.9, 1.0),
        ];
        let calendar = WindowSizing::Calendar(EpochWindow::new(2000, 1));
        assert_eq!(calendar.resolve("TEST", &samples).unwrap(), (2000, 366));
        assert_eq!(
            WindowSizing::Fixed(366).resolve("TEST", &samples).unwrap(),
            (2019, 366)
        );
        assert_eq!(
            WindowSizing::Spanning.resolve("TEST", &samples).unwrap(),
            (2019, 365 + 366 + 365)
        );
        let none: Vec<Sample> = Vec::new();
        assert!(matches!(
            WindowSizing::Spanning.resolve("TEST", &none),
            Err(Error::NoSamples(_))
        ));
        assert!(calendar.resolve("TEST", &none).is_ok());
    }

    #[test]
    fn sizing_rejects_unsupported_timestamps() {
        for timestamp in [-1.0E10, 1.0E10, f64::NAN, f64::INFINITY] {
            let samples = vec![Sample::new(2020.5, 1.0), Sample::new(timestamp, 1.0)];
            for sizing in [WindowSizing::Fixed(366), WindowSizing::Spanning] {
                match sizing.resolve("TEST", &samples) {
                    Err(Error::InvalidTimestamp(station, _)) => assert_eq!(station, "TEST"),
                    other => panic!("{}: unexpected {:?}", timestamp, other),
                }
            }
        }
    }
}
