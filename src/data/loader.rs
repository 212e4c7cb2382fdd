use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::{
    ArrowTemporalType, DataType, Date64Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType,
};
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{FinancialColumns, MovieDataset, RawMovie};

type Result<T> = std::result::Result<T, DataLoadError>;

/// Columns every source must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "title",
    "release_date",
    "vote_average",
    "runtime",
    "popularity",
    "genre_names",
    "vote_count",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the movie table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one movie per line (the usual export)
/// * `.json`    – `[{ "title": ..., "release_date": ..., ... }, ...]`
/// * `.parquet` – flat table with the same column names
pub fn load_file(path: &Path) -> Result<MovieDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} movies ({}) from {}",
        dataset.len(),
        dataset.kind(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Format-independent row building
// ---------------------------------------------------------------------------

/// One cell as handed over by a format reader.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    fn text(s: &str) -> Cell {
        let s = s.trim();
        if s.is_empty() {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Check the required columns and detect which money columns exist.
fn detect_columns<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<FinancialColumns> {
    let present: HashSet<&str> = names.into_iter().collect();
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !present.contains(*c)) {
        return Err(DataLoadError::MissingColumn(missing.to_string()));
    }
    Ok(FinancialColumns {
        budget: present.contains("budget"),
        revenue: present.contains("revenue"),
        profit: present.contains("profit"),
        loss: present.contains("loss"),
    })
}

/// Build a [`RawMovie`] from a cell accessor. Absent columns yield [`Cell::Null`].
fn build_row(row: usize, mut cell: impl FnMut(&str) -> Cell) -> Result<RawMovie> {
    let mut number = |column: &str| to_f64(row, column, cell(column));
    let vote_average = number("vote_average")?;
    let popularity = number("popularity")?;
    let runtime = number("runtime")?;
    let budget = number("budget")?;
    let revenue = number("revenue")?;
    let profit = number("profit")?;
    let loss = number("loss")?;

    Ok(RawMovie {
        title: to_text(cell("title")),
        release_date: to_date(row, cell("release_date"))?,
        vote_average,
        vote_count: to_count(row, cell("vote_count"))?,
        popularity,
        runtime,
        genre_names: to_text(cell("genre_names")),
        budget,
        revenue,
        profit,
        loss,
    })
}

fn invalid(row: usize, column: &str, value: impl ToString) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn to_text(cell: Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Text(s) => Some(s),
        Cell::Number(n) => Some(n.to_string()),
        Cell::Date(d) => Some(d.to_string()),
    }
}

fn to_f64(row: usize, column: &str, cell: Cell) -> Result<Option<f64>> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Number(n) if n.is_nan() => Ok(None),
        Cell::Number(n) => Ok(Some(n)),
        Cell::Text(s) => match s.parse::<f64>() {
            Ok(n) if n.is_nan() => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(_) => Err(invalid(row, column, s)),
        },
        Cell::Date(d) => Err(invalid(row, column, d)),
    }
}

/// Vote counts are non-negative integers; integral floats ("12.0") are accepted.
fn to_count(row: usize, cell: Cell) -> Result<Option<u64>> {
    if let Cell::Text(s) = &cell {
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Some(n));
        }
    }
    let shown = format!("{cell:?}");
    match to_f64(row, "vote_count", cell)? {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as u64)),
        Some(_) => Err(invalid(row, "vote_count", shown)),
    }
}

fn to_date(row: usize, cell: Cell) -> Result<Option<NaiveDate>> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Date(d) => Ok(Some(d)),
        Cell::Text(s) => parse_date(&s)
            .map(Some)
            .ok_or(DataLoadError::InvalidDate { row, value: s }),
        Cell::Number(n) => Err(DataLoadError::InvalidDate {
            row,
            value: n.to_string(),
        }),
    }
}

/// Accepts `2019-10-31`, `2019-10-31 20:00:00`, `2019-10-31T20:00:00`,
/// RFC 3339 and `2019/10/31`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<MovieDataset> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file)
}

/// Parse CSV text: header row with column names, empty cells are nulls.
fn read_csv(input: impl std::io::Read) -> Result<MovieDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = detect_columns(headers.iter().map(String::as_str))?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let raw = build_row(row_no, |column| {
            headers
                .iter()
                .position(|h| h == column)
                .and_then(|idx| record.get(idx))
                .map(Cell::text)
                .unwrap_or(Cell::Null)
        })?;
        rows.push(raw);
    }

    Ok(MovieDataset::from_raw(rows, columns))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "Halloween", "release_date": "1978-10-25", "vote_average": 7.5, ... },
///   ...
/// ]
/// ```
///
/// A column counts as present when any object carries the key.
fn load_json(path: &Path) -> Result<MovieDataset> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<MovieDataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected top-level JSON array".into()))?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .ok_or_else(|| DataLoadError::Malformed(format!("row {i} is not a JSON object")))
        })
        .collect::<Result<Vec<_>>>()?;

    let keys: HashSet<&str> = objects
        .iter()
        .flat_map(|obj| obj.keys().map(String::as_str))
        .collect();
    let columns = detect_columns(keys)?;

    let rows = objects
        .iter()
        .enumerate()
        .map(|(row_no, obj)| {
            build_row(row_no, |column| match obj.get(column) {
                None | Some(JsonValue::Null) => Cell::Null,
                Some(JsonValue::String(s)) => Cell::text(s),
                Some(JsonValue::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
                Some(other) => Cell::Text(other.to_string()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MovieDataset::from_raw(rows, columns))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Numeric columns may be Int32/Int64/Float32/Float64, `release_date` may be
/// Utf8, Date32, Date64 or a Timestamp of any unit. Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> Result<MovieDataset> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let columns = detect_columns(schema.fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = rows.len();
        for row in 0..batch.num_rows() {
            let raw = build_row(offset + row, |column| match batch.column_by_name(column) {
                Some(col) => extract_cell(col, row),
                None => Cell::Null,
            })?;
            rows.push(raw);
        }
    }

    Ok(MovieDataset::from_raw(rows, columns))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::text(col.as_string::<i64>().value(row)),
        DataType::Int32 => numeric::<Int32Array>(col, |a| a.value(row) as f64),
        DataType::Int64 => numeric::<Int64Array>(col, |a| a.value(row) as f64),
        DataType::Float32 => numeric::<Float32Array>(col, |a| a.value(row) as f64),
        DataType::Float64 => numeric::<Float64Array>(col, |a| a.value(row)),
        DataType::Date32 => col
            .as_any()
            .downcast_ref::<Date32Array>()
            .and_then(|a| a.value_as_date(row))
            .map(Cell::Date)
            .unwrap_or(Cell::Null),
        DataType::Date64 => temporal::<Date64Type>(col, row),
        DataType::Timestamp(TimeUnit::Second, _) => temporal::<TimestampSecondType>(col, row),
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            temporal::<TimestampMillisecondType>(col, row)
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            temporal::<TimestampMicrosecondType>(col, row)
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            temporal::<TimestampNanosecondType>(col, row)
        }
        _ => match array_value_to_string(col, row) {
            Ok(s) => Cell::text(&s),
            Err(_) => Cell::Null,
        },
    }
}

/// Date part of a Date64 or Timestamp cell; the time of day is dropped.
fn temporal<T>(col: &Arc<dyn Array>, row: usize) -> Cell
where
    T: ArrowTemporalType,
    i64: From<T::Native>,
{
    col.as_primitive_opt::<T>()
        .and_then(|a| a.value_as_date(row))
        .map(Cell::Date)
        .unwrap_or(Cell::Null)
}

fn numeric<A: Array + 'static>(col: &Arc<dyn Array>, read: impl Fn(&A) -> f64) -> Cell {
    col.as_any()
        .downcast_ref::<A>()
        .map(|a| Cell::Number(read(a)))
        .unwrap_or(Cell::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DatasetKind;
    use std::io::Write;

    const HEADER: &str = "title,release_date,vote_average,runtime,popularity,genre_names,vote_count";

    #[test]
    fn csv_basic_dataset() {
        let text = format!(
            "{HEADER}\n\
             Halloween,1978-10-25,7.5,91,80.1,\"Horror, Thriller\",5000\n\
             Untitled,,,,,,\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.kind(), DatasetKind::Basic);
        assert_eq!(ds.len(), 2);

        let first = &ds.records()[0];
        assert_eq!(first.title, "Halloween");
        assert_eq!(first.release_year, Some(1978));
        assert_eq!(first.vote_count, Some(5000));
        assert_eq!(first.genres().collect::<Vec<_>>(), ["Horror", "Thriller"]);

        let second = &ds.records()[1];
        assert_eq!(second.release_year, None);
        assert_eq!(second.vote_average, None);
        assert_eq!(second.genre_names, None);
    }

    #[test]
    fn csv_with_financial_columns() {
        let text = format!(
            "{HEADER},budget,revenue,profit,loss\n\
             Saw,2004-10-01,7.4,103,60.0,Horror,7000,1200000,103900000,102700000,\n\
             Flop,2010-01-01,4.0,90,3.0,Horror,10,5000000,1000000,-4000000,4000000\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.kind(), DatasetKind::WithFinancials);
        let flop = &ds.records()[1].financials;
        assert_eq!(flop.loss, Some(4_000_000.0));
        assert_eq!(flop.profit_margin, Some(-400.0));
        assert_eq!(ds.records()[0].financials.loss, None);
    }

    #[test]
    fn csv_missing_required_column() {
        let text = "title,release_date\nX,2020-01-01\n";
        match read_csv(text.as_bytes()) {
            Err(DataLoadError::MissingColumn(c)) => assert_eq!(c, "vote_average"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn csv_bad_date_is_fatal() {
        let text = format!("{HEADER}\nX,not-a-date,5,90,1,Horror,1\n");
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(DataLoadError::InvalidDate { row: 0, .. })
        ));
    }

    #[test]
    fn csv_bad_number_is_fatal() {
        let text = format!("{HEADER}\nX,2020-01-01,great,90,1,Horror,1\n");
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(DataLoadError::InvalidValue { ref column, .. }) if column == "vote_average"
        ));
    }

    #[test]
    fn vote_count_accepts_integral_floats() {
        assert_eq!(to_count(0, Cell::Text("12.0".into())).unwrap(), Some(12));
        assert_eq!(to_count(0, Cell::Number(3.0)).unwrap(), Some(3));
        assert!(to_count(0, Cell::Text("-1".into())).is_err());
        assert!(to_count(0, Cell::Number(1.5)).is_err());
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 10, 31);
        assert_eq!(parse_date("2019-10-31"), expected);
        assert_eq!(parse_date("2019-10-31 20:00:00"), expected);
        assert_eq!(parse_date("2019-10-31T20:00:00"), expected);
        assert_eq!(parse_date("2019-10-31T20:00:00Z"), expected);
        assert_eq!(parse_date("2019/10/31"), expected);
        assert_eq!(parse_date("31st October"), None);
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"title": "Us", "release_date": "2019-03-14", "vote_average": 6.7,
             "runtime": 116, "popularity": 30.5, "genre_names": "Horror, Mystery",
             "vote_count": 9000, "budget": 20000000, "revenue": 255000000},
            {"title": "Pearl", "release_date": null, "vote_average": null,
             "runtime": null, "popularity": 12, "genre_names": null, "vote_count": 0}
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.kind(), DatasetKind::WithFinancials);
        assert_eq!(ds.records()[0].financials.profit, Some(235_000_000.0));
        assert_eq!(ds.records()[1].release_year, None);
        assert_eq!(ds.records()[1].vote_count, Some(0));
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(matches!(
            read_json(r#"{"title": "X"}"#),
            Err(DataLoadError::Malformed(_))
        ));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "Nope,2022-07-22,6.8,130,40,\"Horror, Mystery\",3000").unwrap();
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        assert!(matches!(
            load_file(other.path()),
            Err(DataLoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(load_file(&path), Err(DataLoadError::Io { .. })));
    }

    #[test]
    fn parquet_round_trip_through_arrow_writer() {
        use arrow::array::StringArray;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("release_date", DataType::Date32, true),
            Field::new("vote_average", DataType::Float64, true),
            Field::new("runtime", DataType::Int64, true),
            Field::new("popularity", DataType::Float32, true),
            Field::new("genre_names", DataType::Utf8, true),
            Field::new("vote_count", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Alien", "Thing"])),
                Arc::new(Date32Array::from(vec![Some(3457), None])),
                Arc::new(Float64Array::from(vec![Some(8.1), None])),
                Arc::new(Int64Array::from(vec![Some(117), Some(109)])),
                Arc::new(Float32Array::from(vec![Some(50.0), Some(20.0)])),
                Arc::new(StringArray::from(vec![Some("Horror, Science Fiction"), None])),
                Arc::new(Int64Array::from(vec![Some(14000), Some(6000)])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].release_year, Some(1979));
        assert_eq!(ds.records()[0].runtime, Some(117.0));
        assert_eq!(ds.records()[1].vote_average, None);
        assert_eq!(ds.kind(), DatasetKind::Basic);
    }

    #[test]
    fn parquet_timestamp_and_date64_release_dates() {
        use arrow::array::{Date64Array, StringArray, TimestampNanosecondArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        // 1979-06-20 is day 3457 after the epoch.
        const DAY: i64 = 3457;
        let expected = NaiveDate::from_ymd_opt(1979, 6, 20);

        for (date_type, dates) in [
            (
                DataType::Timestamp(TimeUnit::Nanosecond, None),
                Arc::new(TimestampNanosecondArray::from(vec![Some(DAY * 86_400 * 1_000_000_000), None]))
                    as Arc<dyn Array>,
            ),
            (
                DataType::Date64,
                Arc::new(Date64Array::from(vec![Some(DAY * 86_400_000), None])) as Arc<dyn Array>,
            ),
        ] {
            let schema = Arc::new(Schema::new(vec![
                Field::new("title", DataType::Utf8, false),
                Field::new("release_date", date_type, true),
                Field::new("vote_average", DataType::Float64, true),
                Field::new("runtime", DataType::Int64, true),
                Field::new("popularity", DataType::Float64, true),
                Field::new("genre_names", DataType::Utf8, true),
                Field::new("vote_count", DataType::Int64, true),
            ]));
            let batch = RecordBatch::try_new(
                schema.clone(),
                vec![
                    Arc::new(StringArray::from(vec!["Alien", "Undated"])),
                    dates,
                    Arc::new(Float64Array::from(vec![Some(8.1), Some(5.0)])),
                    Arc::new(Int64Array::from(vec![Some(117), None])),
                    Arc::new(Float64Array::from(vec![Some(50.0), None])),
                    Arc::new(StringArray::from(vec![Some("Horror"), None])),
                    Arc::new(Int64Array::from(vec![Some(14000), None])),
                ],
            )
            .unwrap();

            let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
            let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
            writer.write(&batch).unwrap();
            writer.close().unwrap();

            let ds = load_file(file.path()).unwrap();
            assert_eq!(ds.records()[0].release_date, expected);
            assert_eq!(ds.records()[0].release_year, Some(1979));
            assert_eq!(ds.records()[1].release_date, None);
        }
    }

    #[test]
    fn csv_loss_column_survives_without_profit() {
        let text = format!(
            "{HEADER},loss\n\
             Flop,2001-05-04,4.2,95,3.5,Horror,120,4000000\n"
        );
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.kind(), DatasetKind::Basic);
        assert_eq!(ds.records()[0].financials.loss, Some(4_000_000.0));
        assert_eq!(ds.records()[0].financials.profit, None);
    }
}
