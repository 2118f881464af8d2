//! Station roster: one `name,X,Y,Z` record per station,
//! preceded by a header line.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::Error;
use crate::station::Station;

/// Number of fields of a roster record
pub const ROSTER_FIELDS: usize = 4;

/// [Roster] streams [Station]s out of a comma separated table.
pub struct Roster<R: Read> {
    reader: csv::Reader<R>,
}

impl Roster<File> {
    /// Opens roster file
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = Self::builder().from_path(path)?;
        Ok(Self { reader })
    }
}

impl<R: Read> Roster<R> {
    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(true).flexible(true).trim(Trim::All);
        builder
    }
    /// Builds a [Roster] from any readable content
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: Self::builder().from_reader(reader),
        }
    }
    /// Iterates over all station records, header excluded.
    /// Invalid records are returned as errors, iteration may carry on.
    pub fn stations(&mut self) -> impl Iterator<Item = Result<Station, Error>> + '_ {
        self.reader.records().map(|record| {
            let record = record?;
            parse_record(&record)
        })
    }
}

fn parse_record(record: &StringRecord) -> Result<Station, Error> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();
    if record.len() != ROSTER_FIELDS {
        return Err(Error::RosterRecord(line, record.len()));
    }
    let coordinate = |field: &str| -> Result<f64, Error> {
        field
            .parse::<f64>()
            .map_err(|_| Error::RosterCoordinate(line, field.to_string()))
    };
    Ok(Station::new(
        &record[0],
        (
            coordinate(&record[1])?,
            coordinate(&record[2])?,
            coordinate(&record[3])?,
        ),
    ))
}
