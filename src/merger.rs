//! Station record merger: roster driven orchestration.
use std::fs::{create_dir_all, remove_file, write};
use std::io::Read;
use std::path::PathBuf;

use log::{debug, error, info, warn};

use crate::aligner::{Components, SeriesAligner};
use crate::component::read_component;
use crate::error::{Error, Scope};
use crate::grid::{DailyGrid, SLOTS};
use crate::opts::MergeOpts;
use crate::roster::Roster;
use crate::station::Station;
use crate::table::{Table, TimeColumn};

/// Result of one station merging
#[derive(Debug, Clone)]
pub struct MergedStation {
    /// Station that was merged
    pub station: Station,
    /// Aligned (and possibly converted) grid
    pub grid: DailyGrid,
    /// Generated tables: day indexed first, year indexed second
    pub tables: [PathBuf; 2],
}

/// Run report
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Summary {
    /// Stations that were merged, in roster order
    pub merged: Vec<String>,
    /// Number of roster records that were skipped
    pub skipped: usize,
    /// Stations that were abandoned
    pub failed: Vec<String>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} station(s) merged, {} failed, {} roster record(s) skipped",
            self.merged.len(),
            self.failed.len(),
            self.skipped
        )
    }
}

/// [Merger] merges the component files of each station into GTA tables.
/// Stations are processed one after the other, failures are contained
/// to their [Scope].
pub struct Merger {
    opts: MergeOpts,
}

impl Merger {
    pub fn new(opts: MergeOpts) -> Self {
        Self { opts }
    }
    pub fn opts(&self) -> &MergeOpts {
        &self.opts
    }
    /// Component files of `station`, following the naming convention
    pub fn component_paths(&self, station: &Station) -> [PathBuf; SLOTS] {
        let tag = self.opts.mode.file_tag();
        [1, 2, 3].map(|nth| self.opts.input_dir.join(station.component_filename(tag, nth)))
    }
    /// Reads all components. Unreadable components are reported and left out,
    /// samples preceding an invalid line are retained.
    fn read_components(&self, paths: &[PathBuf; SLOTS]) -> Result<Components, Error> {
        let mut components: Components = [None, None, None];
        for (slot, path) in paths.iter().enumerate() {
            let mut samples = Vec::new();
            match read_component(path, &mut samples) {
                Ok(()) => {
                    debug!("\"{}\": {} samples", path.display(), samples.len());
                    components[slot] = Some(samples);
                },
                Err(e) if e.scope() == Scope::Component => {
                    warn!("{}", e);
                    if !samples.is_empty() {
                        warn!(
                            "\"{}\": only {} preceding samples retained",
                            path.display(),
                            samples.len()
                        );
                        components[slot] = Some(samples);
                    }
                },
                Err(e) => return Err(e),
            }
        }
        Ok(components)
    }
    /// Creates the output directory, if need be
    pub fn prepare_workspace(&self) -> Result<(), Error> {
        let dir = &self.opts.output_dir;
        create_dir_all(dir).map_err(|e| Error::Workspace(dir.to_path_buf(), e))
    }
    /// Generates both tables. Nothing is left behind on failure.
    fn write_tables(&self, station: &Station, grid: &DailyGrid) -> Result<[PathBuf; 2], Error> {
        self.prepare_workspace()?;
        let table = Table::new(station, grid, &self.opts);
        let day_path = self
            .opts
            .output_dir
            .join(TimeColumn::Day.filename(&station.name));
        let year_path = self
            .opts
            .output_dir
            .join(TimeColumn::Year.filename(&station.name));

        let day_content = table.render(TimeColumn::Day);
        let year_content = table.render(TimeColumn::Year);

        write(&day_path, day_content).map_err(|e| Error::Output(day_path.clone(), e))?;
        if let Err(e) = write(&year_path, year_content) {
            let _ = remove_file(&day_path);
            return Err(Error::Output(year_path, e));
        }
        Ok([day_path, year_path])
    }
    /// Merges given component files of `station`
    pub fn merge_files(
        &self,
        station: &Station,
        paths: &[PathBuf; SLOTS],
    ) -> Result<MergedStation, Error> {
        let components = self.read_components(paths)?;
        let grid = SeriesAligner::new(&self.opts).align(&station.name, &components)?;
        let tables = self.write_tables(station, &grid)?;
        for path in tables.iter() {
            debug!("\"{}\" has been generated", path.display());
        }
        Ok(MergedStation {
            station: station.clone(),
            grid,
            tables,
        })
    }
    /// Merges the component files of `station`, discovered in the input directory
    pub fn merge_station(&self, station: &Station) -> Result<MergedStation, Error> {
        let paths = self.component_paths(station);
        self.merge_files(station, &paths)
    }
    /// Merges every station of the roster.
    /// Returns an error only when the whole run had to be aborted.
    pub fn run<R: Read>(&self, roster: &mut Roster<R>) -> Result<Summary, Error> {
        self.prepare_workspace()?;
        let mut summary = Summary::default();
        for station in roster.stations() {
            let station = match station {
                Ok(station) => station,
                Err(e) if e.scope() == Scope::Record => {
                    warn!("{}", e);
                    summary.skipped += 1;
                    continue;
                },
                Err(e) => {
                    error!("{}", e);
                    return Err(e);
                },
            };
            match self.merge_station(&station) {
                Ok(merged) => {
                    info!("{}: successfully merged", merged.station.name);
                    summary.merged.push(merged.station.name);
                },
                Err(e) if e.scope() == Scope::Run => {
                    error!("{}", e);
                    return Err(e);
                },
                Err(e) => {
                    error!("{}: abandoned, {}", station.name, e);
                    summary.failed.push(station.name);
                },
            }
        }
        Ok(summary)
    }
}
