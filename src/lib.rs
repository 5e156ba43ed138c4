//! Render fitting and validation loss curves from a training metrics log.
//!
//! ```text
//!  --incsv ──► data::loader ──► data::filter ──► chart::Figure ──► --outpng
//! ```

pub mod app;
pub mod chart;
pub mod cli;
pub mod color;
pub mod data;
pub mod error;

pub use app::run;
pub use cli::{Cli, PlotConfig};
pub use error::{ErrorKind, PlotError};
