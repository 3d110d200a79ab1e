use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use super::error::{DataLoadError, Result};
use super::model::{FullDataset, RawCity, REQUIRED_COLUMNS};
use super::prepare::prepare;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a city table from a file and compute its derived columns.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "Country": "...", "City": "...", ... }, ...]`
/// * `.parquet` – flat columns named like the CSV header
pub fn load_file(path: &Path) -> Result<FullDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raws = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };
    prepare(raws)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<RawCity>> {
    let file = File::open(path).map_err(|e| DataLoadError::io(path, e))?;
    read_csv(file, &REQUIRED_COLUMNS)
}

/// Deserialize every CSV row into `T` after checking the header carries
/// all of `required`. Unknown columns are skipped.
pub fn read_csv<T: DeserializeOwned, R: Read>(reader: R, required: &[&str]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(missing) = required
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(DataLoadError::MissingColumn(missing.to_string()));
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(row, result)| result.map_err(|e| DataLoadError::malformed(row, e)))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "Portugal", "City": "Lisbon", "WiFi Speed": 40, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawCity>> {
    let text = std::fs::read_to_string(path).map_err(|e| DataLoadError::io(path, e))?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<Vec<RawCity>> {
    let records: Vec<Map<String, JsonValue>> = serde_json::from_str(text)
        .map_err(|e| DataLoadError::malformed(0, format!("expected a JSON array of objects: {e}")))?;

    records
        .into_iter()
        .enumerate()
        .map(|(row, obj)| {
            if let Some(missing) = REQUIRED_COLUMNS.iter().find(|col| !obj.contains_key(**col)) {
                return Err(DataLoadError::MissingColumn(missing.to_string()));
            }
            serde_json::from_value(JsonValue::Object(obj))
                .map_err(|e| DataLoadError::malformed(row, e))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per attribute.
///
/// Numeric columns may be any integer or float type; they are cast to
/// `Float64`. Nulls are rejected. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawCity>> {
    let file = File::open(path).map_err(|e| DataLoadError::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut raws = Vec::new();
    for batch in reader {
        let batch = batch?;
        let offset = raws.len();
        raws.extend(batch_to_raws(&batch, offset)?);
    }
    Ok(raws)
}

fn batch_to_raws(batch: &RecordBatch, offset: usize) -> Result<Vec<RawCity>> {
    let column = |name: &str, to: &DataType| -> Result<ArrayRef> {
        let idx = batch
            .schema()
            .index_of(name)
            .map_err(|_| DataLoadError::MissingColumn(name.to_string()))?;
        let col = cast(batch.column(idx).as_ref(), to)?;
        if col.null_count() > 0 {
            let row = (0..col.len()).find(|&r| col.is_null(r)).unwrap_or_default();
            return Err(DataLoadError::malformed(offset + row, format!("null in '{name}'")));
        }
        Ok(col)
    };

    let country = column("Country", &DataType::Utf8)?;
    let city = column("City", &DataType::Utf8)?;
    let numeric: Vec<ArrayRef> = REQUIRED_COLUMNS[2..]
        .iter()
        .map(|name| column(name, &DataType::Float64))
        .collect::<Result<_>>()?;

    let country = country.as_string::<i32>();
    let city = city.as_string::<i32>();
    let numeric: Vec<_> = numeric
        .iter()
        .map(|col| col.as_primitive::<Float64Type>())
        .collect();

    Ok((0..batch.num_rows())
        .map(|row| {
            let v = |i: usize| numeric[i].value(row);
            RawCity {
                country: country.value(row).to_string(),
                city: city.value(row).to_string(),
                wifi_speed: v(0),
                rent: v(1),
                sunshine_hours: v(2),
                coworking_spaces: v(3),
                instagram_photos: v(4),
                things_to_do: v(5),
                meal_price: v(6),
                coffee_price: v(7),
                beer_price: v(8),
                taxi_price: v(9),
            }
        })
        .collect())
}
