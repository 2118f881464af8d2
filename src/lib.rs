#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * GTA aligns daily geodetic station time series on a leap year aware
 * calendar grid, and expresses ECEF coordinates as local ENU displacements.
 */

pub mod aligner;
pub mod calendar;
pub mod component;
pub mod enu;
pub mod grid;
pub mod merger;
pub mod opts;
pub mod roster;
pub mod station;
pub mod table;

mod error;

pub use error::{Error, Scope};

/// Package to include all basic structures
pub mod prelude {
    pub use crate::aligner::{Components, SeriesAligner};
    pub use crate::calendar::{
        cumulative_days, day_row, days_in_year, fractional_year, is_leap_year, timestamp_year,
        EpochWindow, WindowSizing, MAX_YEAR, MIN_YEAR,
    };
    pub use crate::component::{read_component, Sample};
    pub use crate::enu::{xyz_to_enu, EnuProjection, ReferencePoint};
    pub use crate::error::{Error, Scope};
    pub use crate::grid::{DailyGrid, GridRow};
    pub use crate::merger::{MergedStation, Merger, Summary};
    pub use crate::opts::{DayIndex, MergeOpts, Mode, Units};
    pub use crate::roster::Roster;
    pub use crate::station::Station;
    pub use crate::table::{Table, TimeColumn};
    // pub re-export
    pub use hifitime::Epoch;
}
