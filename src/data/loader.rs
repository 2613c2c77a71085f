use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader as _, Xlsx};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{PlotDataset, PlotRecord, SQFT_PER_SQMT, SQFT_PER_SQYD};

// ---------------------------------------------------------------------------
// Input schema
// ---------------------------------------------------------------------------

// Column names as they appear in the source sheets. Matched case-sensitively
// after header whitespace is trimmed.
pub const COL_PLOT_NO: &str = "NO";
pub const COL_NET_SQFT: &str = "NET PLOT AREA IN SQ.FEET";
pub const COL_BUILT_SQFT: &str = "BUILT UP AREA IN SQ.FEET";
pub const COL_TOTAL_SQFT: &str = "TOTAL PLOT AREA IN SQ. FEET";
pub const COL_RATE: &str = "RATE (1500)*(900)";
pub const COL_DISCOUNT: &str = "9 % Pricing Discount Rates ( 1350 * 810 )";
pub const COL_STATUS: &str = "Status";
/// Optional precomputed totals; derived from square feet when absent.
pub const COL_TOTAL_SQMT: &str = "TOTAL PLOT AREA IN SQ. MTR";
pub const COL_TOTAL_SQYD: &str = "TOTAL PLOT AREA IN SQ. YDS";

const REQUIRED_COLUMNS: [&str; 7] = [
    COL_PLOT_NO,
    COL_NET_SQFT,
    COL_BUILT_SQFT,
    COL_TOTAL_SQFT,
    COL_RATE,
    COL_DISCOUNT,
    COL_STATUS,
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a catalog could not be loaded. Anything below table level (a single
/// bad cell) is coerced to a missing field instead of an error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("workbook contains no sheets")]
    NoSheet,
    #[error("expected a top-level JSON array of row objects")]
    JsonShape,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Spreadsheet(#[from] calamine::Error),
    #[error("fetching {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a plot catalog from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with the column names above
/// * `.json` – records orientation, `[{ "NO": 1, ... }, ...]`
/// * `.xlsx` / `.xlsm` / `.xls` – first sheet, first row is the header
pub fn load_path(path: &Path) -> Result<PlotDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)?;
            load_csv_reader(file)
        }
        "json" => {
            let bytes = std::fs::read(path)?;
            load_json_slice(&bytes)
        }
        "xlsx" | "xlsm" | "xls" => {
            let mut workbook = calamine::open_workbook_auto(path)?;
            let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheet)??;
            dataset_from_range(&range)
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Load a catalog over HTTP(S). Format chosen by the URL path's extension,
/// defaulting to CSV.
pub fn load_url(url: &str) -> Result<PlotDataset, LoadError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })?;
    let bytes = response.bytes().map_err(|source| LoadError::Http {
        url: url.to_string(),
        source,
    })?;

    match url_extension(url).as_str() {
        "json" => load_json_slice(&bytes),
        "xlsx" | "xlsm" => load_xlsx_bytes(bytes.to_vec()),
        _ => load_csv_reader(bytes.as_ref()),
    }
}

/// Extension of the path portion of a URL, lowercased; query strings and
/// fragments ignored.
fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Shared row assembly
// ---------------------------------------------------------------------------

/// A source cell before typing. Each loader front-end reduces its native
/// cell type to this, so the coercion rules live in exactly one place.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Numeric view: numbers pass through, text is coerced (currency
    /// symbols, thousands separators, and stray whitespace stripped),
    /// anything else is missing.
    fn as_number(&self) -> Option<f64> {
        match self {
            RawCell::Empty => None,
            RawCell::Number(v) => Some(*v),
            RawCell::Text(s) => parse_number(s),
        }
    }

    /// Text view. Whole numbers print without the trailing ".0" so plot
    /// numbers read as "12", not "12.0".
    fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", *v as i64)
            }
            RawCell::Number(v) => v.to_string(),
            RawCell::Text(s) => s.trim().to_string(),
        }
    }
}

/// Coerce a text cell to a number. Invalid entries become `None` rather
/// than a load failure.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '₹') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn cell<'a>(headers: &[String], row: &'a [RawCell], name: &str) -> Option<&'a RawCell> {
    headers.iter().position(|h| h == name).and_then(|i| row.get(i))
}

fn number_at(headers: &[String], row: &[RawCell], name: &str) -> Option<f64> {
    cell(headers, row, name).and_then(|c| c.as_number())
}

fn text_at(headers: &[String], row: &[RawCell], name: &str) -> String {
    cell(headers, row, name)
        .map(|c| c.as_text())
        .unwrap_or_default()
}

/// Assemble the dataset from trimmed headers and raw rows. The single hard
/// failure is a required column that is absent from the header row.
fn build_dataset(headers: &[String], rows: &[Vec<RawCell>]) -> Result<PlotDataset, LoadError> {
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col));
        }
    }

    let plots = rows
        .iter()
        .map(|row| {
            let total_area_sqft = number_at(headers, row, COL_TOTAL_SQFT);
            // Precomputed unit columns win; fall back to the fixed divisors.
            let total_area_sqmt = number_at(headers, row, COL_TOTAL_SQMT)
                .or_else(|| total_area_sqft.map(|v| v / SQFT_PER_SQMT));
            let total_area_sqyd = number_at(headers, row, COL_TOTAL_SQYD)
                .or_else(|| total_area_sqft.map(|v| v / SQFT_PER_SQYD));

            PlotRecord {
                id: text_at(headers, row, COL_PLOT_NO),
                net_area_sqft: number_at(headers, row, COL_NET_SQFT),
                built_area_sqft: number_at(headers, row, COL_BUILT_SQFT),
                total_area_sqft,
                total_area_sqmt,
                total_area_sqyd,
                rate: number_at(headers, row, COL_RATE),
                discounted_rate: number_at(headers, row, COL_DISCOUNT),
                status: text_at(headers, row, COL_STATUS),
            }
        })
        .collect();

    Ok(PlotDataset::from_plots(plots))
}

// ---------------------------------------------------------------------------
// CSV front-end
// ---------------------------------------------------------------------------

/// Parse CSV from any reader (file, URL body, in-memory test fixture).
pub fn load_csv_reader<R: Read>(rdr: R) -> Result<PlotDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    let field = field.trim();
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    build_dataset(&headers, &rows)
}

// ---------------------------------------------------------------------------
// JSON front-end
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the shape `df.to_json(orient='records')` emits:
///
/// ```json
/// [
///   { "NO": 1, "TOTAL PLOT AREA IN SQ. FEET": 1000.0, "Status": "Available", ... },
///   ...
/// ]
/// ```
pub fn load_json_slice(bytes: &[u8]) -> Result<PlotDataset, LoadError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;
    let records = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut objects = Vec::with_capacity(records.len());
    for record in records {
        objects.push(record.as_object().ok_or(LoadError::JsonShape)?);
    }

    // Header set is the union of keys across records, in first-seen order.
    let mut headers: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            let key = key.trim();
            if !headers.iter().any(|h| h == key) {
                headers.push(key.to_string());
            }
        }
    }

    let rows: Vec<Vec<RawCell>> = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|header| {
                    let value = obj
                        .iter()
                        .find(|(key, _)| key.trim() == *header)
                        .map(|(_, v)| v);
                    json_cell(value)
                })
                .collect()
        })
        .collect();

    build_dataset(&headers, &rows)
}

fn json_cell(value: Option<&JsonValue>) -> RawCell {
    match value {
        None | Some(JsonValue::Null) => RawCell::Empty,
        Some(JsonValue::Number(n)) => n.as_f64().map(RawCell::Number).unwrap_or(RawCell::Empty),
        Some(JsonValue::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.to_string())
            }
        }
        Some(JsonValue::Bool(b)) => RawCell::Text(b.to_string()),
        Some(other) => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet front-end
// ---------------------------------------------------------------------------

fn load_xlsx_bytes(bytes: Vec<u8>) -> Result<PlotDataset, LoadError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).map_err(calamine::Error::Xlsx)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoSheet)?
        .map_err(calamine::Error::Xlsx)?;
    dataset_from_range(&range)
}

/// First row is the header, everything below is data.
fn dataset_from_range(range: &calamine::Range<Data>) -> Result<PlotDataset, LoadError> {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row.iter().map(|c| sheet_cell(c).as_text()).collect(),
        // build_dataset reports the missing columns for an empty sheet
        None => Vec::new(),
    };

    let rows: Vec<Vec<RawCell>> = rows_iter
        .map(|row| row.iter().map(sheet_cell).collect())
        .collect();

    build_dataset(&headers, &rows)
}

fn sheet_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Float(v) => RawCell::Number(*v),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let s = s.trim();
            if s.is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.to_string())
            }
        }
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::Error(e) => RawCell::Text(format!("{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_FULL: &str = concat!(
        " NO ,NET PLOT AREA IN SQ.FEET,BUILT UP AREA IN SQ.FEET,",
        "TOTAL PLOT AREA IN SQ. FEET,RATE (1500)*(900),",
        "9 % Pricing Discount Rates ( 1350 * 810 ),Status\n",
        "1,600,400,1000,\"₹1,500,000\",\"₹1,365,000\",Available\n",
        "2,700,500,1200,not priced,,Sold Out\n",
        "3,,,,,,Reserved\n",
    );

    #[test]
    fn csv_load_trims_headers_and_coerces_numbers() {
        let ds = load_csv_reader(CSV_FULL.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let p1 = &ds.plots[0];
        assert_eq!(p1.id, "1");
        assert_eq!(p1.rate, Some(1_500_000.0));
        assert_eq!(p1.discounted_rate, Some(1_365_000.0));
        assert_eq!(p1.total_area_sqft, Some(1_000.0));
        // totals derived when the precomputed columns are absent
        assert!((p1.total_area_sqmt.unwrap() - 92.903).abs() < 1e-3);
        assert!((p1.total_area_sqyd.unwrap() - 111.111).abs() < 1e-3);

        // unparsable or empty rate becomes missing, not an error
        let p2 = &ds.plots[1];
        assert_eq!(p2.rate, None);
        assert_eq!(p2.discounted_rate, None);
        assert_eq!(p2.status, "Sold Out");

        // a fully blank numeric row still loads
        assert_eq!(ds.plots[2].total_area_sqft, None);
        assert_eq!(ds.plot_ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn missing_required_column_is_a_hard_failure() {
        let csv = "NO,Status\n1,Available\n";
        match load_csv_reader(csv.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, COL_NET_SQFT),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn supplied_unit_columns_take_precedence_over_derivation() {
        let csv = concat!(
            "NO,NET PLOT AREA IN SQ.FEET,BUILT UP AREA IN SQ.FEET,",
            "TOTAL PLOT AREA IN SQ. FEET,RATE (1500)*(900),",
            "9 % Pricing Discount Rates ( 1350 * 810 ),Status,",
            "TOTAL PLOT AREA IN SQ. MTR,TOTAL PLOT AREA IN SQ. YDS\n",
            "1,600,400,1000,100,90,Available,93.00,111.20\n",
        );
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.plots[0].total_area_sqmt, Some(93.0));
        assert_eq!(ds.plots[0].total_area_sqyd, Some(111.2));
    }

    #[test]
    fn json_records_load_with_numeric_or_text_cells() {
        let json = r#"[
            {"NO": 1, "NET PLOT AREA IN SQ.FEET": 600, "BUILT UP AREA IN SQ.FEET": 400,
             "TOTAL PLOT AREA IN SQ. FEET": 1000, "RATE (1500)*(900)": "₹1,500,000",
             "9 % Pricing Discount Rates ( 1350 * 810 )": 1365000, "Status": "Available"},
            {"NO": "2A", "NET PLOT AREA IN SQ.FEET": null, "BUILT UP AREA IN SQ.FEET": null,
             "TOTAL PLOT AREA IN SQ. FEET": null, "RATE (1500)*(900)": null,
             "9 % Pricing Discount Rates ( 1350 * 810 )": null, "Status": "Sold Out"}
        ]"#;
        let ds = load_json_slice(json.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.plots[0].id, "1");
        assert_eq!(ds.plots[0].rate, Some(1_500_000.0));
        assert_eq!(ds.plots[1].id, "2A");
        assert_eq!(ds.plots[1].total_area_sqft, None);
        assert!(ds.plots[1].is_sold_out());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        match load_path(Path::new("catalog.parquet")) {
            Err(LoadError::UnsupportedExtension(ext)) => assert_eq!(ext, "parquet"),
            other => panic!("expected UnsupportedExtension, got {other:?}"),
        }
    }

    #[test]
    fn number_parsing_strips_currency_noise() {
        assert_eq!(parse_number("₹ 1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_number(" 92.90 "), Some(92.9));
        assert_eq!(parse_number("TBD"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn url_extension_ignores_query_strings() {
        assert_eq!(url_extension("https://x.test/catalog.xlsx?dl=1"), "xlsx");
        assert_eq!(url_extension("https://x.test/catalog.csv"), "csv");
        assert_eq!(url_extension("https://x.test/catalog"), "");
    }
}
