use super::model::{LossColumn, MetricsTable, Series};

// ---------------------------------------------------------------------------
// Missing-value filtering
// ---------------------------------------------------------------------------

/// `(epoch, value)` pairs of every row where `column` has a value, in row order.
pub fn present_points(table: &MetricsTable, column: LossColumn) -> Vec<(i64, f64)> {
    table
        .rows
        .iter()
        .filter_map(|row| row.loss(column).map(|v| (row.epoch, v)))
        .collect()
}

/// Number of leading present values a curve discards.
///
/// The validation curve skips its first recorded value. Training logs write
/// a validation loss before the first fitting step, so that value is likely a
/// baseline rather than a training result. Plots made from the same logs by
/// other tooling are aligned this way, so the skip must stay even though the
/// fitting curve keeps its first point.
pub fn leading_skip(column: LossColumn) -> usize {
    match column {
        LossColumn::Fitting => 0,
        LossColumn::Validation => 1,
    }
}

/// The plotted curve for one loss column: its present values, minus the
/// [`leading_skip`] first ones.
pub fn series(table: &MetricsTable, column: LossColumn) -> Series {
    let points = present_points(table, column)
        .into_iter()
        .skip(leading_skip(column))
        .collect();
    Series::new(column.label(), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetricsRow;

    fn fitting_series(table: &MetricsTable) -> Series {
        series(table, LossColumn::Fitting)
    }

    fn validation_series(table: &MetricsTable) -> Series {
        series(table, LossColumn::Validation)
    }

    fn table(rows: &[(i64, Option<f64>, Option<f64>)]) -> MetricsTable {
        MetricsTable::from_rows(
            rows.iter()
                .map(|&(epoch, fitting_loss, val_loss)| MetricsRow {
                    epoch,
                    fitting_loss,
                    val_loss,
                })
                .collect(),
        )
    }

    #[test]
    fn reference_log_curves() {
        let t = table(&[
            (0, Some(1.0), None),
            (1, Some(0.5), Some(0.9)),
            (2, Some(0.3), Some(0.6)),
            (3, Some(0.2), Some(0.4)),
        ]);

        let fitting = fitting_series(&t);
        assert_eq!(fitting.label, "fitting loss");
        assert_eq!(fitting.points, vec![(0, 1.0), (1, 0.5), (2, 0.3), (3, 0.2)]);

        let validation = validation_series(&t);
        assert_eq!(validation.label, "validation loss");
        assert_eq!(validation.points, vec![(2, 0.6), (3, 0.4)]);
    }

    #[test]
    fn fitting_keeps_first_present_row() {
        let t = table(&[
            (0, None, None),
            (1, Some(2.0), None),
            (2, None, None),
            (3, Some(1.0), None),
        ]);
        assert_eq!(fitting_series(&t).points, vec![(1, 2.0), (3, 1.0)]);
    }

    #[test]
    fn validation_drops_first_present_row_not_first_row() {
        let t = table(&[
            (0, Some(1.0), None),
            (1, Some(0.9), None),
            (2, Some(0.8), Some(0.7)),
            (3, Some(0.7), None),
            (4, Some(0.6), Some(0.5)),
            (5, Some(0.5), Some(0.45)),
        ]);
        assert_eq!(validation_series(&t).points, vec![(4, 0.5), (5, 0.45)]);
    }

    #[test]
    fn single_validation_value_gives_empty_curve() {
        let t = table(&[(0, Some(1.0), Some(1.2)), (1, Some(0.8), None)]);
        assert!(validation_series(&t).is_empty());
        assert_eq!(fitting_series(&t).points.len(), 2);
    }

    #[test]
    fn empty_table_gives_empty_curves() {
        let t = MetricsTable::default();
        assert!(fitting_series(&t).is_empty());
        assert!(validation_series(&t).is_empty());
    }

    #[test]
    fn series_follow_row_order_not_epoch_order() {
        let t = table(&[
            (5, Some(0.1), Some(0.3)),
            (2, Some(0.2), Some(0.4)),
            (9, Some(0.3), Some(0.5)),
        ]);
        assert_eq!(fitting_series(&t).points, vec![(5, 0.1), (2, 0.2), (9, 0.3)]);
        assert_eq!(validation_series(&t).points, vec![(2, 0.4), (9, 0.5)]);
    }
}
