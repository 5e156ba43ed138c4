use std::ops::Range;

use plotters::chart::SeriesLabelPosition;

/// Fraction of the plotted width a legend box is assumed to cover.
const BOX_WIDTH: f64 = 0.35;
/// Fraction of the plotted height a legend box is assumed to cover.
const BOX_HEIGHT: f64 = 0.20;

/// A corner of the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Corner {
    /// Tie-break order for [`best_corner`].
    pub const ALL: [Corner; 4] = [
        Corner::UpperRight,
        Corner::UpperLeft,
        Corner::LowerLeft,
        Corner::LowerRight,
    ];

    /// Whether a point in normalised `[0, 1]` plot coordinates falls under
    /// a legend box placed in this corner.
    fn covers(self, nx: f64, ny: f64) -> bool {
        let right = nx >= 1.0 - BOX_WIDTH;
        let left = nx <= BOX_WIDTH;
        let upper = ny >= 1.0 - BOX_HEIGHT;
        let lower = ny <= BOX_HEIGHT;
        match self {
            Corner::UpperRight => upper && right,
            Corner::UpperLeft => upper && left,
            Corner::LowerLeft => lower && left,
            Corner::LowerRight => lower && right,
        }
    }
}

impl From<Corner> for SeriesLabelPosition {
    fn from(corner: Corner) -> Self {
        match corner {
            Corner::UpperRight => SeriesLabelPosition::UpperRight,
            Corner::UpperLeft => SeriesLabelPosition::UpperLeft,
            Corner::LowerLeft => SeriesLabelPosition::LowerLeft,
            Corner::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// Pick the corner whose legend box would hide the fewest points.
///
/// Ties go to the earliest corner in [`Corner::ALL`].
pub fn best_corner(
    points: impl IntoIterator<Item = (f64, f64)>,
    x: &Range<f64>,
    y: &Range<f64>,
) -> Corner {
    let width = x.end - x.start;
    let height = y.end - y.start;
    let mut hits = [0usize; 4];

    for (px, py) in points {
        let nx = (px - x.start) / width;
        let ny = (py - y.start) / height;
        for (slot, corner) in hits.iter_mut().zip(Corner::ALL) {
            if corner.covers(nx, ny) {
                *slot += 1;
            }
        }
    }

    Corner::ALL
        .into_iter()
        .zip(hits)
        .min_by_key(|&(_, n)| n)
        .map_or(Corner::UpperRight, |(corner, _)| corner)
}
