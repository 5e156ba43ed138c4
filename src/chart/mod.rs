//! Chart layer: a small figure-building interface and its plotters backend.
//!
//! ```text
//!   Series ──► Curve ──► Figure::add_curve
//!                           │
//!                           ▼
//!                      FigureSpec ──► render::save ──► .png / .svg / ...
//! ```
//!
//! Callers only see [`Figure`]; the backend in [`render`] can be replaced
//! without touching the data layer.

pub mod legend;
pub mod render;

use std::ops::Range;
use std::path::Path;

use crate::data::model::Series;
use crate::error::PlotError;

pub use legend::Corner;

/// Figure size in pixels (7 × 5 at 100 px per unit).
pub const DEFAULT_SIZE: (u32, u32) = (700, 500);

// ---------------------------------------------------------------------------
// Curve / LegendPosition
// ---------------------------------------------------------------------------

/// One labelled line on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl From<Series> for Curve {
    fn from(series: Series) -> Self {
        Curve {
            label: series.label,
            points: series
                .points
                .into_iter()
                .map(|(epoch, value)| (epoch as f64, value))
                .collect(),
        }
    }
}

/// Where the legend box goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    /// The corner covering the fewest data points.
    #[default]
    Best,
    Fixed(Corner),
}

// ---------------------------------------------------------------------------
// Figure – the interface the pipeline draws through
// ---------------------------------------------------------------------------

pub trait Figure {
    fn add_curve(&mut self, curve: Curve);
    fn set_axis_labels(&mut self, x: &str, y: &str);
    fn set_legend(&mut self, position: LegendPosition);
    /// Render and write the figure. Nothing is left at `path` on failure.
    fn save(&self, path: &Path) -> Result<(), PlotError>;
}

/// Everything needed to draw a figure, independent of the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSpec {
    pub curves: Vec<Curve>,
    pub x_label: String,
    pub y_label: String,
    pub legend: LegendPosition,
    pub size: (u32, u32),
}

impl Default for FigureSpec {
    fn default() -> Self {
        Self {
            curves: Vec::new(),
            x_label: String::new(),
            y_label: String::new(),
            legend: LegendPosition::default(),
            size: DEFAULT_SIZE,
        }
    }
}

impl FigureSpec {
    /// All finite points across every curve.
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.curves
            .iter()
            .flat_map(|c| c.points.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }

    /// Padded x and y ranges covering every finite point.
    pub fn data_ranges(&self) -> (Range<f64>, Range<f64>) {
        let mut x_ext: Option<(f64, f64)> = None;
        let mut y_ext: Option<(f64, f64)> = None;
        for (x, y) in self.finite_points() {
            x_ext = Some(x_ext.map_or((x, x), |(lo, hi)| (lo.min(x), hi.max(x))));
            y_ext = Some(y_ext.map_or((y, y), |(lo, hi)| (lo.min(y), hi.max(y))));
        }
        (
            padded(x_ext, |_| 0.5),
            padded(y_ext, |v| (v.abs() * 0.05).max(0.5)),
        )
    }

    /// Resolve `Best` against the data currently in the figure.
    pub fn legend_corner(&self) -> Corner {
        match self.legend {
            LegendPosition::Fixed(corner) => corner,
            LegendPosition::Best => {
                let (x, y) = self.data_ranges();
                legend::best_corner(self.finite_points(), &x, &y)
            }
        }
    }
}

/// Largest magnitude an axis end may take, so `end - start` stays finite.
const AXIS_LIMIT: f64 = f64::MAX / 4.0;

/// Widen an extent by 5% per side; a single value is widened by `flat(v)`.
///
/// Ends are clamped to `±AXIS_LIMIT`; points beyond that are clipped.
fn padded(extent: Option<(f64, f64)>, flat: impl Fn(f64) -> f64) -> Range<f64> {
    let Some((lo, hi)) = extent else {
        return 0.0..1.0;
    };
    // Halve before subtracting: `hi - lo` overflows for extents near f64::MAX.
    let pad = if hi == lo {
        flat(lo)
    } else {
        (hi / 2.0 - lo / 2.0) * 0.1
    };
    let start = (lo - pad).clamp(-AXIS_LIMIT, AXIS_LIMIT);
    let end = (hi + pad).clamp(-AXIS_LIMIT, AXIS_LIMIT);
    if start < end {
        start..end
    } else if end > 0.0 {
        AXIS_LIMIT / 2.0..AXIS_LIMIT
    } else {
        -AXIS_LIMIT..-AXIS_LIMIT / 2.0
    }
}

// ---------------------------------------------------------------------------
// PlottersFigure
// ---------------------------------------------------------------------------

/// [`Figure`] drawn with plotters.
#[derive(Debug, Default)]
pub struct PlottersFigure {
    spec: FigureSpec,
}

impl PlottersFigure {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            spec: FigureSpec {
                size,
                ..FigureSpec::default()
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn spec(&self) -> &FigureSpec {
        &self.spec
    }
}

impl Figure for PlottersFigure {
    fn add_curve(&mut self, curve: Curve) {
        self.spec.curves.push(curve);
    }

    fn set_axis_labels(&mut self, x: &str, y: &str) {
        self.spec.x_label = x.to_string();
        self.spec.y_label = y.to_string();
    }

    fn set_legend(&mut self, position: LegendPosition) {
        self.spec.legend = position;
    }

    fn save(&self, path: &Path) -> Result<(), PlotError> {
        render::save(&self.spec, path)
    }
}
