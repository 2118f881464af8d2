use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calendar::{EpochWindow, WindowSizing};
use crate::enu::ReferencePoint;

/// Nature of the component values, and how they are turned into displacements
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    /// Components already are (N, E, U) displacements
    #[default]
    Displacement,
    /// Components are (X, Y, Z) ECEF coordinates,
    /// expressed against their own mean position
    MeanReferenced,
    /// Components are (X, Y, Z) ECEF coordinates,
    /// expressed against a known position
    Referenced(ReferencePoint),
}

impl Mode {
    /// Tag used in component file names
    pub fn file_tag(&self) -> &'static str {
        match self {
            Self::Displacement => "NEU",
            _ => "XYZ",
        }
    }
    /// Column labels of the generated tables
    pub fn columns(&self) -> [&'static str; 3] {
        match self {
            Self::Displacement => ["N", "E", "U"],
            _ => ["E", "N", "U"],
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Displacement => write!(f, "NEU displacements"),
            Self::MeanReferenced => write!(f, "XYZ to ENU (mean position)"),
            Self::Referenced(reference) => write!(f, "XYZ to ENU ({})", reference),
        }
    }
}

/// Output unit of the value columns
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Units {
    /// Values are written as is (meters)
    #[default]
    Meters,
    /// Values are converted to millimeters
    Millimeters,
}

impl Units {
    /// Scaling applied to values expressed in meters
    pub fn scaling(&self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Millimeters => 1.0E3,
        }
    }
}

/// Time column of the day indexed table
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DayIndex {
    /// (start year + 1) x 365 + day offset, at day midpoint
    #[default]
    EpochCounter,
    /// Fractional year x 365
    YearTimes365,
}

/// Merging options, shared by all stations of a run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOpts {
    /// Grid dimensioning
    pub sizing: WindowSizing,
    /// Values interpretation
    pub mode: Mode,
    /// Output units
    pub units: Units,
    /// Day indexed table time column
    pub day_index: DayIndex,
    /// Directory where component files are looked up
    pub input_dir: PathBuf,
    /// Directory where tables are generated
    pub output_dir: PathBuf,
}

impl Default for MergeOpts {
    fn default() -> Self {
        Self {
            sizing: WindowSizing::default(),
            mode: Mode::default(),
            units: Units::default(),
            day_index: DayIndex::default(),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
        }
    }
}

impl MergeOpts {
    /// Options to merge (N, E, U) displacements over given window
    pub fn displacements(window: EpochWindow) -> Self {
        Self {
            sizing: WindowSizing::Calendar(window),
            mode: Mode::Displacement,
            ..Default::default()
        }
    }
    /// Options to convert (X, Y, Z) coordinates to displacements
    /// relative to their mean position, over a single year
    pub fn mean_referenced() -> Self {
        Self {
            sizing: WindowSizing::Fixed(366),
            mode: Mode::MeanReferenced,
            ..Default::default()
        }
    }
    /// Options to convert (X, Y, Z) coordinates to millimetric displacements
    /// relative to `reference`, over all sampled years
    pub fn referenced(reference: ReferencePoint) -> Self {
        Self {
            sizing: WindowSizing::Spanning,
            mode: Mode::Referenced(reference),
            units: Units::Millimeters,
            day_index: DayIndex::YearTimes365,
            ..Default::default()
        }
    }
    pub fn with_units(&self, units: Units) -> Self {
        let mut s = self.clone();
        s.units = units;
        s
    }
    pub fn with_input_dir(&self, dir: &Path) -> Self {
        let mut s = self.clone();
        s.input_dir = dir.to_path_buf();
        s
    }
    pub fn with_output_dir(&self, dir: &Path) -> Self {
        let mut s = self.clone();
        s.output_dir = dir.to_path_buf();
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn presets() {
        let opts = MergeOpts::displacements(EpochWindow::new(2020, 2));
        assert_eq!(opts.mode.file_tag(), "NEU");
        assert_eq!(opts.mode.columns(), ["N", "E", "U"]);
        assert_eq!(opts.units.scaling(), 1.0);
        assert_eq!(opts.day_index, DayIndex::EpochCounter);

        let opts = MergeOpts::mean_referenced().with_units(Units::Millimeters);
        assert_eq!(opts.sizing, WindowSizing::Fixed(366));
        assert_eq!(opts.mode.file_tag(), "XYZ");
        assert_eq!(opts.units.scaling(), 1000.0);

        let opts = MergeOpts::referenced(ReferencePoint::from_ecef(1.0, 2.0, 3.0))
            .with_output_dir(Path::new("/tmp"));
        assert_eq!(opts.mode.columns(), ["E", "N", "U"]);
        assert_eq!(opts.day_index, DayIndex::YearTimes365);
        assert_eq!(opts.output_dir, PathBuf::from("/tmp"));
        assert_eq!(opts.input_dir, PathBuf::from("."));
    }
}
