use log::{info, warn};

use crate::chart::{Figure, PlottersFigure};
use crate::cli::PlotConfig;
use crate::data::filter;
use crate::data::loader;
use crate::data::model::{LossColumn, EPOCH_COLUMN};
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Loss plotter pipeline
// ---------------------------------------------------------------------------

const Y_LABEL: &str = "loss";

/// Load the metrics log named in `config` and write the loss chart.
pub fn run(config: &PlotConfig) -> Result<(), PlotError> {
    let mut figure = PlottersFigure::new(config.size);
    plot_losses(config, &mut figure)
}

/// Load → filter → draw → save, through any [`Figure`].
///
/// The input is read before the output path is looked at, so a run without
/// an output path still reports bad input first.
pub fn plot_losses<F: Figure>(config: &PlotConfig, figure: &mut F) -> Result<(), PlotError> {
    let input = config
        .input
        .as_deref()
        .ok_or(PlotError::MissingPath { flag: "--incsv" })?;
    let table = loader::load_file(input)?;
    if table.is_empty() {
        warn!("{} has no data rows; writing an empty chart", input.display());
    }

    for column in LossColumn::ALL {
        let series = filter::series(&table, column);
        info!(
            "{}: {} of {} rows present, {} plotted",
            column,
            table.present_count(column),
            table.len(),
            series.points.len()
        );
        if series.is_empty() && !table.is_empty() {
            warn!("no plottable values for '{column}'");
        }
        figure.add_curve(series.into());
    }

    figure.set_axis_labels(EPOCH_COLUMN, Y_LABEL);
    figure.set_legend(config.legend);

    let output = config
        .output
        .as_deref()
        .ok_or(PlotError::MissingPath { flag: "--outpng" })?;
    figure.save(output)
}
