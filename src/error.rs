use std::path::PathBuf;
use thiserror::Error;

/// Extent of a failure: what gets abandoned when an [Error] rises.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Scope {
    /// Single roster record is skipped
    Record,
    /// Single component is considered missing
    Component,
    /// Current station is abandoned
    Station,
    /// Whole run is aborted
    Run,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Record => write!(f, "record"),
            Self::Component => write!(f, "component"),
            Self::Station => write!(f, "station"),
            Self::Run => write!(f, "run"),
        }
    }
}

/// Errors that may rise while merging station time series
#[derive(Error, Debug)]
pub enum Error {
    /// Roster file could not be read
    #[error("failed to read roster: {0}")]
    Roster(#[from] csv::Error),
    /// Roster record does not have the expected number of fields
    #[error("invalid roster line {0}: expecting 4 fields, got {1}")]
    RosterRecord(u64, usize),
    /// Roster record coordinate is not a number
    #[error("invalid roster line {0}: bad coordinate \"{1}\"")]
    RosterCoordinate(u64, String),
    /// Component file is missing or unreadable
    #[error("failed to read \"{}\": {}", .0.display(), .1)]
    ComponentUnavailable(PathBuf, #[source] std::io::Error),
    /// Component data line contains a field that is not a finite number
    #[error("\"{}\" line {}: invalid number \"{}\"", .0.display(), .1, .2)]
    InvalidNumber(PathBuf, usize, String),
    /// Component data line does not contain enough fields
    #[error("\"{}\" line {}: not enough numbers provided", .0.display(), .1)]
    MalformedLine(PathBuf, usize),
    /// Sample precedes the station window
    #[error("{0}: {1} is earlier than the starting year")]
    BeforeWindow(String, f64),
    /// Sample exceeds the station window
    #[error("{0}: {1} is later than the ending year")]
    AfterWindow(String, f64),
    /// Timestamp does not fall in a supported year
    #[error("{0}: {1} is not a valid timestamp")]
    InvalidTimestamp(String, f64),
    /// Grid could not be dimensioned, no sample at all
    #[error("{0}: no samples to define a window")]
    NoSamples(String),
    /// Failed to generate an output table
    #[error("failed to write \"{}\": {}", .0.display(), .1)]
    Output(PathBuf, #[source] std::io::Error),
    /// Failed to create the output directory
    #[error("failed to create workspace \"{}\": {}", .0.display(), .1)]
    Workspace(PathBuf, #[source] std::io::Error),
}

impl Error {
    /// Returns the [Scope] this error aborts
    pub fn scope(&self) -> Scope {
        match self {
            Self::RosterRecord(..) => Scope::Record,
            Self::ComponentUnavailable(..) | Self::InvalidNumber(..) => Scope::Component,
            Self::BeforeWindow(..)
            | Self::AfterWindow(..)
            | Self::InvalidTimestamp(..)
            | Self::NoSamples(_)
            | Self::Output(..) => Scope::Station,
            Self::Roster(_)
            | Self::RosterCoordinate(..)
            | Self::MalformedLine(..)
            | Self::Workspace(..) => Scope::Run,
        }
    }
}
