//! Expense CSV loading.
//!
//! Expected format: a header row containing `Date`, `Category` and `Amount`
//! (exact, case-sensitive; extra columns are ignored), then one record per row.

use crate::error::LoadError;
use crate::models::Transaction;
use crate::table::RecordTable;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const DATE_COLUMN: &str = "Date";
pub const CATEGORY_COLUMN: &str = "Category";
pub const AMOUNT_COLUMN: &str = "Amount";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Column positions of the required fields within a row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    category: usize,
    amount: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MalformedInput {
                    missing: name.to_string(),
                })
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            category: find(CATEGORY_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
        })
    }
}

/// Load a record table from a CSV file on disk.
pub fn load_csv(path: &Path) -> Result<RecordTable, LoadError> {
    info!("Loading expenses from {}", path.display());
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

/// Parse CSV text into a record table, rejecting the whole input on the first bad cell.
pub fn parse_csv<R: Read>(reader: R) -> Result<RecordTable, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        records.push(parse_row(&record, columns, i + 1)?);
    }

    debug!("Parsed {} transactions", records.len());
    Ok(RecordTable::new(records))
}

fn parse_row(record: &StringRecord, columns: ColumnIndex, row: usize) -> Result<Transaction, LoadError> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");

    let raw_date = cell(columns.date);
    let date = parse_date(raw_date).ok_or_else(|| row_error(row, DATE_COLUMN, raw_date))?;

    let raw_amount = cell(columns.amount);
    let amount = parse_amount(raw_amount).ok_or_else(|| row_error(row, AMOUNT_COLUMN, raw_amount))?;

    if record.get(columns.category).is_none() {
        return Err(row_error(row, CATEGORY_COLUMN, ""));
    }

    Ok(Transaction::new(date, cell(columns.category), amount))
}

fn row_error(row: usize, column: &str, value: &str) -> LoadError {
    LoadError::RowParse {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// Parse a calendar date in one of the accepted formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Parse a finite decimal amount.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_csv() {
        let csv = "Date,Category,Amount\n2024-01-01,Food,250\n2024-01-02,Coffee,4.50\n";
        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.category, "Food");
        assert_eq!(first.amount, 250.0);
        assert_eq!(table.records()[1].amount, 4.5);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let csv = "Amount,Note,Category,Date\n12.00,lunch,Food,2024-02-03\n";
        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].category, "Food");
        assert_eq!(table.records()[0].amount, 12.0);
    }

    #[test]
    fn test_missing_amount_column() {
        let csv = "Date,Category\n2024-01-01,Food\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();

        match err {
            LoadError::MalformedInput { missing } => assert_eq!(missing, "Amount"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_match_is_case_sensitive() {
        let csv = "date,Category,Amount\n2024-01-01,Food,1\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(LoadError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_bad_amount_rejects_file() {
        let csv = "Date,Category,Amount\n2024-01-01,Food,10\n2024-01-02,Food,ten\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();

        match err {
            LoadError::RowParse { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Amount");
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_amount_rejected() {
        let csv = "Date,Category,Amount\n2024-01-01,Food,inf\n";
        assert!(matches!(
            parse_csv(csv.as_bytes()),
            Err(LoadError::RowParse { .. })
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        let csv = "Date,Category,Amount\n2024-13-01,Food,1\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::RowParse { ref column, .. } if column == "Date"));
    }

    #[test]
    fn test_short_row_rejected() {
        let csv = "Date,Category,Amount\n2024-01-01,Food\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::RowParse { ref value, .. } if value.is_empty()));
    }

    #[test]
    fn test_empty_category_allowed() {
        let csv = "Date,Category,Amount\n2024-01-01,,3\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.records()[0].category, "");
    }

    #[test]
    fn test_header_only_yields_empty_table() {
        let table = parse_csv("Date,Category,Amount\n".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(parse_date("2024-03-07"), expected);
        assert_eq!(parse_date("2024/03/07"), expected);
        assert_eq!(parse_date("03/07/2024"), expected);
        assert_eq!(parse_date(" 2024-03-07 "), expected);
        assert_eq!(parse_date("March 7"), None);
    }

    #[test]
    fn test_load_csv_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Category,Amount").unwrap();
        writeln!(file, "2024-01-01,Rent,900").unwrap();

        let table = load_csv(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
