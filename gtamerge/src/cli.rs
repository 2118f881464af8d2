use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};

use gta::prelude::{EpochWindow, MergeOpts, ReferencePoint, Station, Units};

/// Environment variable that defines the output directory
pub const WORKSPACE_VAR: &str = "GTA_WORKSPACE";

/// What the user asked for
pub enum Task {
    /// Merge every station of this roster
    Roster(PathBuf),
    /// Merge these three component files of a single station
    Files(Station, [PathBuf; 3]),
}

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

fn roster_arg() -> Arg {
    Arg::new("roster")
        .value_name("ROSTER")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Station roster: comma separated \"name,X,Y,Z\" records, after a header line.")
}

/// Component file arguments of the "enu" command
const COMPONENT_ARGS: [(&str, &str, &str); 3] = [
    ("dat1", "FILE1", "X"),
    ("dat2", "FILE2", "Y"),
    ("dat3", "FILE3", "Z"),
];

fn component_arg((id, value_name, coordinate): (&'static str, &'static str, &str)) -> Arg {
    Arg::new(id)
        .value_name(value_name)
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help(format!("{} coordinates file.", coordinate))
}

fn coordinate_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .value_name(name)
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .required(true)
        .help(format!("Reference {} ECEF coordinate [m].", name))
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }
    /// Describes the command line interface
    pub fn command() -> Command {
        Command::new("gtamerge")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Daily station time series merging")
            .long_about("gtamerge aligns daily station time series on a calendar grid
and generates two GTA tables per station: <STATION>.gta (day indexed)
and <STATION>_year.gta (fractional year indexed).
Days without samples are reported as NaN.")
            .arg_required_else_help(true)
            .subcommand_required(true)
            .color(ColorChoice::Always)
            .next_help_heading("Input/Output")
            .arg(
                Arg::new("input")
                    .short('i')
                    .long("input")
                    .value_name("DIRECTORY")
                    .value_parser(value_parser!(PathBuf))
                    .global(true)
                    .help("Directory where mb_<STATION>_<TAG>.datN component files are looked up. Defaults to current directory."),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("DIRECTORY")
                    .value_parser(value_parser!(PathBuf))
                    .global(true)
                    .help("Define custom output directory. See --help for more information.")
                    .long_help("Output directory where GTA tables are generated.
The $GTA_WORKSPACE variable is automatically picked up by this application and always prefered.
Use --output,-o to define it at runtime if you prefer.
When no output directory is defined, we simply use the current directory."),
            )
            .arg(
                Arg::new("mm")
                    .long("mm")
                    .action(ArgAction::SetTrue)
                    .global(true)
                    .help("Express values in millimeters. Always active for \"enu\"."),
            )
            .subcommand(
                Command::new("neu")
                    .about("Merges precomputed N/E/U displacements (mb_<STATION>_NEU.datN), over given years.")
                    .arg(roster_arg())
                    .arg(
                        Arg::new("start")
                            .value_name("START_YEAR")
                            .value_parser(value_parser!(i32))
                            .required(true)
                            .help("First year of the window."),
                    )
                    .arg(
                        Arg::new("years")
                            .value_name("YEARS")
                            .value_parser(value_parser!(u32))
                            .required(true)
                            .help("Number of years in the window."),
                    ),
            )
            .subcommand(
                Command::new("xyz")
                    .about("Converts X/Y/Z coordinates (mb_<STATION>_XYZ.datN) to E/N/U displacements,
relative to their mean position, over a single year.")
                    .arg(roster_arg()),
            )
            .subcommand(
                Command::new("enu")
                    .about("Converts X/Y/Z coordinates of a single station to millimetric E/N/U displacements,
relative to given reference position.")
                    .args(COMPONENT_ARGS.map(component_arg))
                    .arg(coordinate_arg("X"))
                    .arg(coordinate_arg("Y"))
                    .arg(coordinate_arg("Z")),
            )
    }
    fn submatches(&self) -> (&str, &ArgMatches) {
        self.matches
            .subcommand()
            .unwrap_or(("", &self.matches))
    }
    /// Input directory
    pub fn input_dir(&self) -> PathBuf {
        let (_, matches) = self.submatches();
        matches
            .get_one::<PathBuf>("input")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("."))
    }
    /// Output directory, either
    ///  1. from $GTA_WORKSPACE environment variable
    ///  2. from --output CLI argument
    ///  3. or defaults to current directory
    pub fn output_dir(&self) -> PathBuf {
        match std::env::var(WORKSPACE_VAR) {
            Ok(path) => Path::new(&path).to_path_buf(),
            _ => {
                let (_, matches) = self.submatches();
                matches
                    .get_one::<PathBuf>("output")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from("."))
            },
        }
    }
    fn millimeters(&self) -> bool {
        let (_, matches) = self.submatches();
        matches.get_flag("mm")
    }
    fn reference(&self, matches: &ArgMatches) -> ReferencePoint {
        let coordinate = |name: &str| matches.get_one::<f64>(name).copied().unwrap_or_default();
        ReferencePoint::from_ecef(coordinate("X"), coordinate("Y"), coordinate("Z"))
    }
    /// Merging options
    pub fn merge_opts(&self) -> MergeOpts {
        let (name, matches) = self.submatches();
        let opts = match name {
            "neu" => {
                let start = matches.get_one::<i32>("start").copied().unwrap_or_default();
                let years = matches.get_one::<u32>("years").copied().unwrap_or_default();
                MergeOpts::displacements(EpochWindow::new(start, years))
            },
            "enu" => MergeOpts::referenced(self.reference(matches)),
            _ => MergeOpts::mean_referenced(),
        };
        let opts = if self.millimeters() {
            opts.with_units(Units::Millimeters)
        } else {
            opts
        };
        opts.with_input_dir(&self.input_dir())
            .with_output_dir(&self.output_dir())
    }
    /// Task to be performed
    pub fn task(&self) -> Task {
        let (name, matches) = self.submatches();
        match name {
            "enu" => {
                let paths = COMPONENT_ARGS.map(|(id, _, _)| {
                    matches
                        .get_one::<PathBuf>(id)
                        .cloned()
                        .unwrap_or_default()
                });
                let reference = self.reference(matches);
                let station = Station::from_component_path(&paths[0], reference.to_ecef());
                Task::Files(station, paths)
            },
            _ => Task::Roster(
                matches
                    .get_one::<PathBuf>("roster")
                    .cloned()
                    .unwrap_or_default(),
            ),
        }
    }
}
