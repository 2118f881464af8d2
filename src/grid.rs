//! Daily grid: one row per calendar day, three value slots per row.
use hifitime::Epoch;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calendar::{day_row, days_in_year, row_epoch, MIN_YEAR};
use crate::component::Sample;
use crate::enu::{EnuProjection, ReferencePoint};
use crate::error::Error;

/// Number of value slots per row
pub const SLOTS: usize = 3;

/// [GridRow] is one day of a station time series.
/// Missing values are NaN.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridRow {
    /// Fractional year, at day midpoint
    pub fractional_year: f64,
    /// Value slots
    pub values: [f64; SLOTS],
}

impl GridRow {
    fn new(fractional_year: f64) -> Self {
        Self {
            fractional_year,
            values: [f64::NAN; SLOTS],
        }
    }
    /// True if no slot of this row is defined
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }
}

/// [DailyGrid] aligns up to three time series on a daily calendar
/// starting January 1st of `start_year`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyGrid {
    start_year: i32,
    rows: Vec<GridRow>,
}

impl DailyGrid {
    /// Builds a [DailyGrid] of `len` days starting January 1st of `start_year`.
    /// All slots are initially missing.
    pub fn new(start_year: i32, len: usize) -> Self {
        let mut rows = Vec::with_capacity(len);
        let mut year = start_year;
        while rows.len() < len {
            let ndays = days_in_year(year);
            for day in 0..ndays {
                if rows.len() == len {
                    break;
                }
                rows.push(GridRow::new(
                    year as f64 + (day as f64 + 0.5) / ndays as f64,
                ));
            }
            year += 1;
        }
        Self { start_year, rows }
    }
    /// First year of this grid
    pub fn start_year(&self) -> i32 {
        self.start_year
    }
    /// Number of rows (days)
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    /// True if this grid has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    /// Returns all rows, in chronological order
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }
    /// Returns a specific row
    pub fn row(&self, row: usize) -> Option<&GridRow> {
        self.rows.get(row)
    }
    /// Midpoint instant of given row
    pub fn epoch(&self, row: usize) -> Epoch {
        row_epoch(self.start_year, row)
    }
    /// Locates the row `timestamp` belongs to.
    /// Timestamps outside the supported years fall before or after the grid,
    /// NaN is rejected. `station` only serves diagnostics.
    pub fn locate(&self, station: &str, timestamp: f64) -> Result<usize, Error> {
        let row = match day_row(self.start_year, timestamp) {
            Some(row) => row,
            None if timestamp.is_nan() => {
                return Err(Error::InvalidTimestamp(station.to_string(), timestamp));
            },
            None if timestamp < MIN_YEAR as f64 => -1,
            None => i64::MAX,
        };
        if row < 0 {
            Err(Error::BeforeWindow(station.to_string(), timestamp))
        } else if row as u64 >= self.rows.len() as u64 {
            Err(Error::AfterWindow(station.to_string(), timestamp))
        } else {
            Ok(row as usize)
        }
    }
    /// Writes all `samples` into given `slot`. A sample overwrites any
    /// value previously written to the same row. Stops on the first sample
    /// that does not fit in this grid.
    pub fn place(&mut self, station: &str, slot: usize, samples: &[Sample]) -> Result<(), Error> {
        for sample in samples {
            let row = self.locate(station, sample.timestamp)?;
            let value = &mut self.rows[row].values[slot];
            if !value.is_nan() {
                debug!(
                    "{}: {} overwrites slot #{} on {}",
                    station,
                    sample.timestamp,
                    slot + 1,
                    row_epoch(self.start_year, row)
                );
            }
            *value = sample.value;
        }
        Ok(())
    }
    /// Number of defined values in given slot
    pub fn count(&self, slot: usize) -> usize {
        self.rows
            .iter()
            .filter(|r| !r.values[slot].is_nan())
            .count()
    }
    /// Mean of given slot, missing values excluded.
    /// NaN when the slot is entirely missing.
    pub fn mean(&self, slot: usize) -> f64 {
        let (sum, count) = self
            .rows
            .iter()
            .map(|r| r.values[slot])
            .filter(|v| !v.is_nan())
            .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
        if count > 0 {
            sum / count as f64
        } else {
            f64::NAN
        }
    }
    /// Column wise mean position, considering the three slots
    /// are (X, Y, Z) ECEF coordinates
    pub fn mean_position(&self) -> ReferencePoint {
        ReferencePoint::from_ecef(self.mean(0), self.mean(1), self.mean(2))
    }
    /// Converts every (X, Y, Z) row to (E, N, U) displacements
    /// relative to `reference`. Incomplete rows become entirely missing.
    pub fn to_enu(&mut self, reference: &ReferencePoint) {
        let projection: EnuProjection = reference.projection();
        for row in self.rows.iter_mut() {
            let [x, y, z] = row.values;
            let (e, n, u) = projection.project(x, y, z);
            row.values = [e, n, u];
        }
    }
}
