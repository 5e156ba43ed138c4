use std::fmt;

// ---------------------------------------------------------------------------
// LossColumn – the two plotted metrics
// ---------------------------------------------------------------------------

/// Name of the x-axis column.
pub const EPOCH_COLUMN: &str = "epoch";

/// One of the two loss columns a metrics log must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossColumn {
    Fitting,
    Validation,
}

impl LossColumn {
    pub const ALL: [LossColumn; 2] = [LossColumn::Fitting, LossColumn::Validation];

    /// Header name in the input table.
    pub fn column_name(self) -> &'static str {
        match self {
            LossColumn::Fitting => "fitting_loss",
            LossColumn::Validation => "val_loss",
        }
    }

    /// Legend label of the curve drawn from this column.
    pub fn label(self) -> &'static str {
        match self {
            LossColumn::Fitting => "fitting loss",
            LossColumn::Validation => "validation loss",
        }
    }
}

impl fmt::Display for LossColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// MetricsRow – one line of the metrics log
// ---------------------------------------------------------------------------

/// A single epoch record. Loss values are `None` where the log has no entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsRow {
    pub epoch: i64,
    pub fitting_loss: Option<f64>,
    pub val_loss: Option<f64>,
}

impl MetricsRow {
    pub fn loss(&self, column: LossColumn) -> Option<f64> {
        match column {
            LossColumn::Fitting => self.fitting_loss,
            LossColumn::Validation => self.val_loss,
        }
    }
}

// ---------------------------------------------------------------------------
// MetricsTable – the complete loaded log
// ---------------------------------------------------------------------------

/// All rows of a metrics log, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsTable {
    pub rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn from_rows(rows: Vec<MetricsRow>) -> Self {
        MetricsTable { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of rows where `column` has a value.
    pub fn present_count(&self, column: LossColumn) -> usize {
        self.rows.iter().filter(|r| r.loss(column).is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Series – a filtered (epoch, value) view of one column
// ---------------------------------------------------------------------------

/// Points of one curve, ordered as the rows they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(i64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(i64, f64)>) -> Self {
        Series {
            label: label.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
