use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};

use crate::chart::{Corner, LegendPosition, DEFAULT_SIZE};
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Both paths are optional at the parser level: a missing one is reported
/// when the run actually needs it.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "loss-plot",
    version,
    about = "Process metrics CSV and generate a loss plot."
)]
pub struct Cli {
    /// Path to input CSV file (metrics data)
    #[arg(long, value_name = "PATH")]
    pub incsv: Option<PathBuf>,

    /// Path to output PNG file for the plot
    #[arg(long, value_name = "PATH")]
    pub outpng: Option<PathBuf>,

    /// Legend placement
    #[arg(long, value_enum, default_value_t = LegendChoice::Best)]
    pub legend: LegendChoice,
}

/// `--legend` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendChoice {
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl From<LegendChoice> for LegendPosition {
    fn from(choice: LegendChoice) -> Self {
        match choice {
            LegendChoice::Best => LegendPosition::Best,
            LegendChoice::UpperRight => LegendPosition::Fixed(Corner::UpperRight),
            LegendChoice::UpperLeft => LegendPosition::Fixed(Corner::UpperLeft),
            LegendChoice::LowerLeft => LegendPosition::Fixed(Corner::LowerLeft),
            LegendChoice::LowerRight => LegendPosition::Fixed(Corner::LowerRight),
        }
    }
}

impl Cli {
    /// Parse the full argument list, program name included.
    ///
    /// An empty list (program name only) is a [`PlotError::Usage`]; anything
    /// the parser rejects is handled by clap itself (message and exit 2).
    pub fn from_args(args: Vec<OsString>) -> Result<Self, PlotError> {
        if args.len() <= 1 {
            return Err(PlotError::Usage);
        }
        Ok(Cli::parse_from(args))
    }

    /// Help text shown when the program is run without arguments.
    pub fn usage() -> String {
        Cli::command().render_help().to_string()
    }
}

// ---------------------------------------------------------------------------
// PlotConfig – what a run needs, detached from argument parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub legend: LegendPosition,
    /// Figure size in pixels.
    pub size: (u32, u32),
}

impl PlotConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        PlotConfig {
            input: Some(input.into()),
            output: Some(output.into()),
            legend: LegendPosition::Best,
            size: DEFAULT_SIZE,
        }
    }
}

impl From<Cli> for PlotConfig {
    fn from(cli: Cli) -> Self {
        PlotConfig {
            input: cli.incsv,
            output: cli.outpng,
            legend: cli.legend.into(),
            size: DEFAULT_SIZE,
        }
    }
}
