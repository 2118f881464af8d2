//! GTA tables formatting.
//!
//! Each station produces two tables sharing the same preamble and values,
//! one indexed by a day counter (`<name>.gta`), the other by
//! fractional year (`<name>_year.gta`).
use std::io::Write;

use crate::grid::DailyGrid;
use crate::opts::{DayIndex, MergeOpts};
use crate::station::Station;

/// Extension of all generated tables
pub const TABLE_EXTENSION: &str = "gta";

/// Time column of a table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimeColumn {
    /// Day counter, see [DayIndex]
    Day,
    /// Fractional year
    Year,
}

impl TimeColumn {
    /// Table file name, for given station
    pub fn filename(&self, station: &str) -> String {
        match self {
            Self::Day => format!("{}.{}", station, TABLE_EXTENSION),
            Self::Year => format!("{}_year.{}", station, TABLE_EXTENSION),
        }
    }
}

/// [Table] formats one station grid
pub struct Table<'a> {
    station: &'a Station,
    grid: &'a DailyGrid,
    opts: &'a MergeOpts,
}

impl<'a> Table<'a> {
    pub fn new(station: &'a Station, grid: &'a DailyGrid, opts: &'a MergeOpts) -> Self {
        Self {
            station,
            grid,
            opts,
        }
    }
    fn format_preamble<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        let (x, y, z) = self.station.ecef;
        writeln!(w, "#Site:{}", self.station.name)?;
        writeln!(w, "#X:{:>14.4}", x)?;
        writeln!(w, "#Y:{:>14.4}", y)?;
        writeln!(w, "#Z:{:>14.4}", z)?;
        let [c1, c2, c3] = self.opts.mode.columns();
        writeln!(w, "#   T         {}        {}        {}", c1, c2, c3)
    }
    /// Time tag of given row
    fn time(&self, column: TimeColumn, row: usize, fractional_year: f64) -> f64 {
        match (column, self.opts.day_index) {
            (TimeColumn::Year, _) => fractional_year,
            (TimeColumn::Day, DayIndex::YearTimes365) => fractional_year * 365.0,
            (TimeColumn::Day, DayIndex::EpochCounter) => {
                ((self.grid.start_year() + 1) * 365) as f64 + row as f64 + 0.5
            },
        }
    }
    /// Formats the complete table into `w`
    pub fn format<W: Write>(&self, w: &mut W, column: TimeColumn) -> std::io::Result<()> {
        self.format_preamble(w)?;
        let scaling = self.opts.units.scaling();
        for (nth, row) in self.grid.rows().iter().enumerate() {
            let [v1, v2, v3] = row.values;
            writeln!(
                w,
                "{:9.4} {:7.4} {:7.4} {:7.4}",
                self.time(column, nth, row.fractional_year),
                v1 * scaling,
                v2 * scaling,
                v3 * scaling,
            )?;
        }
        Ok(())
    }
    /// Renders the complete table
    pub fn render(&self, column: TimeColumn) -> String {
        let mut buf = Vec::<u8>::with_capacity(64 * (self.grid.len() + 5));
        // writing to memory does not fail
        let _ = self.format(&mut buf, column);
        String::from_utf8_lossy(&buf).to_string()
    }
}
