//! Series alignment: from per-component samples to one station grid.
use log::{debug, info};

use crate::component::Sample;
use crate::error::Error;
use crate::grid::{DailyGrid, SLOTS};
use crate::opts::{MergeOpts, Mode};

/// Per-slot samples. `None` stands for a component that could not be read.
pub type Components = [Option<Vec<Sample>>; SLOTS];

/// [SeriesAligner] builds station grids according to [MergeOpts]
pub struct SeriesAligner<'a> {
    opts: &'a MergeOpts,
}

impl<'a> SeriesAligner<'a> {
    pub fn new(opts: &'a MergeOpts) -> Self {
        Self { opts }
    }
    /// Dimensions a grid, places all samples and converts coordinates
    /// to displacements when needed.
    pub fn align(&self, station: &str, components: &Components) -> Result<DailyGrid, Error> {
        let samples = components.iter().flatten().flatten();
        let (start_year, len) = self.opts.sizing.resolve(station, samples)?;
        debug!("{}: {} days grid starting {}", station, len, start_year);

        let mut grid = DailyGrid::new(start_year, len);
        for (slot, samples) in components.iter().enumerate() {
            if let Some(samples) = samples {
                grid.place(station, slot, samples)?;
            }
        }

        match self.opts.mode {
            Mode::Displacement => {},
            Mode::MeanReferenced => {
                let reference = grid.mean_position();
                let (lat, lon, alt) = reference.to_geodetic();
                info!(
                    "{}: mean position {} (lat={:.6}° lon={:.6}° alt={:.3}m)",
                    station, reference, lat, lon, alt
                );
                grid.to_enu(&reference);
            },
            Mode::Referenced(reference) => {
                grid.to_enu(&reference);
            },
        }
        Ok(grid)
    }
}
