//! Command line tool to merge daily station time series into GTA tables
mod cli;

use cli::{Cli, Task};

use env_logger::{Builder, Env, Target};
use log::{error, info};

use gta::prelude::{Merger, Roster, WindowSizing};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    GtaError(#[from] gta::Error),
}

fn main() -> Result<(), Error> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let opts = cli.merge_opts();

    info!("{}", opts.mode);
    match opts.sizing {
        WindowSizing::Calendar(window) => info!("window: {}", window),
        WindowSizing::Fixed(rows) => info!("window: {} days", rows),
        WindowSizing::Spanning => info!("window: all sampled years"),
    }
    info!("output directory: \"{}\"", opts.output_dir.display());

    let merger = Merger::new(opts);

    match cli.task() {
        Task::Roster(path) => {
            let mut roster = Roster::from_path(&path)?;
            let summary = merger.run(&mut roster)?;
            info!("{}", summary);
        },
        Task::Files(station, paths) => match merger.merge_files(&station, &paths) {
            Ok(merged) => {
                for table in merged.tables.iter() {
                    info!("\"{}\" has been generated", table.display());
                }
            },
            Err(e) => {
                error!("{}: {}", station.name, e);
                return Err(e.into());
            },
        },
    }
    Ok(())
}
