use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde_json::Value as JsonValue;

use super::model::{LossColumn, MetricsRow, MetricsTable, EPOCH_COLUMN};
use crate::error::PlotError;

/// Cell contents treated as "no value recorded".
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metrics log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "epoch": 0, "fitting_loss": 1.0, "val_loss": null }, ...]`
/// * `.tsv`  – tab-separated table with a header row
/// * anything else – comma-separated table with a header row
pub fn load_file(path: &Path) -> Result<MetricsTable, PlotError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "json" => load_json(path)?,
        "tsv" => load_delimited(path, b'\t')?,
        _ => load_delimited(path, b',')?,
    };
    info!("loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row required. Extra columns are ignored; rows shorter than the
/// header leave their trailing cells missing.
fn load_delimited(path: &Path, delimiter: u8) -> Result<MetricsTable, PlotError> {
    let file = File::open(path).map_err(|e| PlotError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    debug!("header of {}: {:?}", path.display(), headers);

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PlotError::data_format(path, format!("missing column '{name}'")))
    };
    let epoch_idx = column(EPOCH_COLUMN)?;
    let fitting_idx = column(LossColumn::Fitting.column_name())?;
    let val_idx = column(LossColumn::Validation.column_name())?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(0, |p| p.line());
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let bad_cell = |column: &str, msg: String| {
            PlotError::data_format(path, format!("line {line}, '{column}': {msg}"))
        };

        let epoch = parse_epoch(cell(epoch_idx)).map_err(|msg| bad_cell(EPOCH_COLUMN, msg))?;
        let fitting_loss = parse_loss(cell(fitting_idx))
            .map_err(|msg| bad_cell(LossColumn::Fitting.column_name(), msg))?;
        let val_loss = parse_loss(cell(val_idx))
            .map_err(|msg| bad_cell(LossColumn::Validation.column_name(), msg))?;

        rows.push(MetricsRow {
            epoch,
            fitting_loss,
            val_loss,
        });
    }

    Ok(MetricsTable::from_rows(rows))
}

fn csv_error(path: &Path, err: csv::Error) -> PlotError {
    if !err.is_io_error() {
        return PlotError::data_format(path, err.to_string());
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PlotError::io(path, source),
        other => PlotError::data_format(path, format!("{other:?}")),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "epoch": 0, "fitting_loss": 1.25, "val_loss": 1.40 },
///   { "epoch": 1, "fitting_loss": 0.98, "val_loss": null },
///   ...
/// ]
/// ```
///
/// There is no header, so a column exists when at least one record has the
/// key. An empty array therefore has no columns at all.
fn load_json(path: &Path) -> Result<MetricsTable, PlotError> {
    let text = std::fs::read_to_string(path).map_err(|e| PlotError::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| PlotError::data_format(path, format!("parsing JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| PlotError::data_format(path, "expected a top-level JSON array"))?;

    for name in [
        EPOCH_COLUMN,
        LossColumn::Fitting.column_name(),
        LossColumn::Validation.column_name(),
    ] {
        let present = records
            .iter()
            .any(|rec| rec.as_object().is_some_and(|obj| obj.contains_key(name)));
        if !present {
            return Err(PlotError::data_format(path, format!("missing column '{name}'")));
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            PlotError::data_format(path, format!("record {i} is not a JSON object"))
        })?;
        let bad_cell = |column: &str, msg: String| {
            PlotError::data_format(path, format!("record {i}, '{column}': {msg}"))
        };

        let epoch = json_epoch(obj.get(EPOCH_COLUMN)).map_err(|msg| bad_cell(EPOCH_COLUMN, msg))?;
        let loss = |column: LossColumn| {
            json_loss(obj.get(column.column_name()))
                .map_err(|msg| bad_cell(column.column_name(), msg))
        };
        let fitting_loss = loss(LossColumn::Fitting)?;
        let val_loss = loss(LossColumn::Validation)?;

        rows.push(MetricsRow {
            epoch,
            fitting_loss,
            val_loss,
        });
    }

    Ok(MetricsTable::from_rows(rows))
}

fn json_epoch(val: Option<&JsonValue>) -> Result<i64, String> {
    match val {
        Some(JsonValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else {
                integral(n.as_f64().unwrap_or(f64::NAN))
                    .ok_or_else(|| format!("{n} is not an integer"))
            }
        }
        Some(JsonValue::String(s)) => parse_epoch(s),
        Some(JsonValue::Null) | None => Err("missing epoch".to_string()),
        Some(other) => Err(format!("{other} is not an integer")),
    }
}

fn json_loss(val: Option<&JsonValue>) -> Result<Option<f64>, String> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64().filter(|v| !v.is_nan())),
        Some(JsonValue::String(s)) => parse_loss(s),
        Some(other) => Err(format!("{other} is not a number")),
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_MARKERS.iter().any(|m| *m == cell)
}

/// Parse a loss cell. Missing markers and NaN both become `None`.
fn parse_loss(cell: &str) -> Result<Option<f64>, String> {
    if is_missing(cell) {
        return Ok(None);
    }
    let value: f64 = cell
        .trim()
        .parse()
        .map_err(|_| format!("'{cell}' is not a number"))?;
    Ok(if value.is_nan() { None } else { Some(value) })
}

/// Parse an epoch cell. Integral floats such as `3.0` are accepted.
fn parse_epoch(cell: &str) -> Result<i64, String> {
    if is_missing(cell) {
        return Err("missing epoch".to_string());
    }
    let s = cell.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    s.parse::<f64>()
        .ok()
        .and_then(integral)
        .ok_or_else(|| format!("'{cell}' is not an integer"))
}

fn integral(v: f64) -> Option<i64> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64).then_some(v as i64)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_with_missing_markers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.csv",
            "epoch,fitting_loss,val_loss\n0,1.0,NaN\n1,0.5,0.9\n2,,0.6\n3,0.2,nan\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0].val_loss, None);
        assert_eq!(table.rows[1].val_loss, Some(0.9));
        assert_eq!(table.rows[2].fitting_loss, None);
        assert_eq!(table.rows[3].val_loss, None);
        assert_eq!(table.rows[3].epoch, 3);
    }

    #[test]
    fn extra_columns_and_order_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.csv",
            "lr,val_loss,step,epoch,fitting_loss\n0.1,0.7,10,5,0.4\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(
            table.rows,
            vec![MetricsRow {
                epoch: 5,
                fitting_loss: Some(0.4),
                val_loss: Some(0.7),
            }]
        );
    }

    #[test]
    fn short_rows_leave_trailing_cells_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.csv",
            "epoch,fitting_loss,val_loss\n0,1.5\n1,1.2,1.3\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.rows[0].fitting_loss, Some(1.5));
        assert_eq!(table.rows[0].val_loss, None);
        assert_eq!(table.rows[1].val_loss, Some(1.3));
    }

    #[test]
    fn header_only_is_an_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "metrics.csv", "epoch,fitting_loss,val_loss\n");
        let table = load_file(&path).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_column_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "metrics.csv", "epoch,fitting_loss\n0,1.0\n");
        let err = load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);
        assert!(err.to_string().contains("'val_loss'"), "{err}");
    }

    #[test]
    fn bad_loss_cell_names_line_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.csv",
            "epoch,fitting_loss,val_loss\n0,1.0,0.9\n1,oops,0.8\n",
        );
        let err = load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("'fitting_loss'"), "{msg}");
    }

    #[test]
    fn epoch_must_be_integral() {
        assert_eq!(parse_epoch("4"), Ok(4));
        assert_eq!(parse_epoch(" 7.0 "), Ok(7));
        assert!(parse_epoch("2.5").is_err());
        assert!(parse_epoch("").is_err());
    }

    #[test]
    fn infinity_is_a_present_value() {
        assert_eq!(parse_loss("inf"), Ok(Some(f64::INFINITY)));
        assert_eq!(parse_loss("<NA>"), Ok(None));
        assert_eq!(parse_loss(" 0.25 "), Ok(Some(0.25)));
    }

    #[test]
    fn tsv_uses_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "metrics.tsv", "epoch\tfitting_loss\tval_loss\n0\t1.0\t\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.rows[0].fitting_loss, Some(1.0));
        assert_eq!(table.rows[0].val_loss, None);
    }

    #[test]
    fn json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.json",
            r#"[
                {"epoch": 0, "fitting_loss": 1.0, "val_loss": null},
                {"epoch": 1, "fitting_loss": 0.5, "val_loss": 0.7},
                {"epoch": 2, "val_loss": "NaN"}
            ]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].val_loss, None);
        assert_eq!(table.rows[1].val_loss, Some(0.7));
        assert_eq!(table.rows[2].fitting_loss, None);
        assert_eq!(table.rows[2].val_loss, None);
    }

    #[test]
    fn json_without_val_loss_key_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "metrics.json", r#"[{"epoch":0,"fitting_loss":1.0}]"#);
        let err = load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);
    }

    #[test]
    fn empty_json_array_has_no_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "metrics.json", "[]");
        let err = load_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataFormat);
        assert!(err.to_string().contains("missing column"), "{err}");
    }

    #[test]
    fn byte_order_mark_before_header_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.csv",
            "\u{feff}epoch,fitting_loss,val_loss\n0,1.0,1.1\n1,0.8,0.9\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].epoch, 0);
        assert_eq!(table.rows[1].val_loss, Some(0.9));
    }

    #[test]
    fn duplicated_header_uses_first_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "metrics.csv",
            "epoch,val_loss,fitting_loss,val_loss\n0,0.5,1.0,9.9\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.rows[0].val_loss, Some(0.5));
        assert_eq!(table.rows[0].fitting_loss, Some(1.0));
    }

    #[test]
    fn unreadable_input_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
