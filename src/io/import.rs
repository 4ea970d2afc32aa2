use std::io::Read;

use csv::{ByteRecord, StringRecord};

use crate::application::AppError;
use crate::domain::{Expense, Ledger, parse_amount_or_zero, parse_date};
use crate::io::export::CSV_HEADER;

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
    /// Rows that were skipped, with the reason
    pub errors: Vec<ImportError>,
    /// Rows that were imported with a fallback value
    pub warnings: Vec<ImportError>,
}

/// Problem found on a single CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    pub line: u64,
    pub field: Option<String>,
    pub error: String,
}

/// Importer for appending CSV expenses to the ledger
pub struct Importer<'a> {
    ledger: &'a mut Ledger,
}

impl<'a> Importer<'a> {
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self { ledger }
    }

    /// Import expenses from CSV with columns `Name,Price,Category,Date`.
    ///
    /// Rows are handled independently: a malformed price becomes `0.0` and is
    /// reported as a warning, a malformed date skips the row. Invalid UTF-8 is
    /// replaced rather than rejected. A CSV that cannot be read at all leaves
    /// the ledger untouched.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportResult, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);

        let mut result = ImportResult::default();
        let mut parsed = Vec::new();

        for (index, record) in csv_reader.byte_records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);
            let record = decode_lossy(&record);

            if index == 0 && is_header(&record) {
                continue;
            }

            match parse_row(&record, line, &mut result.warnings) {
                Ok(expense) => parsed.push(expense),
                Err(err) => {
                    tracing::warn!(line, error = %err.error, "skipping CSV row");
                    result.errors.push(err);
                    result.skipped += 1;
                }
            }
        }

        result.imported = parsed.len();
        self.ledger.extend(parsed);

        tracing::debug!(
            imported = result.imported,
            skipped = result.skipped,
            "CSV import finished"
        );
        Ok(result)
    }
}

fn decode_lossy(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

fn is_header(record: &StringRecord) -> bool {
    record.len() >= CSV_HEADER.len()
        && record
            .iter()
            .zip(CSV_HEADER)
            .all(|(field, name)| field.trim().eq_ignore_ascii_case(name))
}

fn parse_row(
    record: &StringRecord,
    line: u64,
    warnings: &mut Vec<ImportError>,
) -> Result<Expense, ImportError> {
    if record.len() < CSV_HEADER.len() {
        return Err(ImportError {
            line,
            field: None,
            error: format!(
                "expected {} columns, found {}",
                CSV_HEADER.len(),
                record.len()
            ),
        });
    }

    let name = record.get(0).unwrap_or("");
    let price_str = record.get(1).unwrap_or("");
    let category = record.get(2).unwrap_or("");
    let date_str = record.get(3).unwrap_or("");

    let date = parse_date(date_str).map_err(|e| ImportError {
        line,
        field: Some("Date".to_string()),
        error: format!("Error parsing date: {}", e),
    })?;

    let price = parse_amount_or_zero(price_str);
    if let Some(err) = price.warning {
        warnings.push(ImportError {
            line,
            field: Some("Price".to_string()),
            error: format!("Error parsing price, using 0.00: {}", err),
        });
    }

    Ok(Expense::new(name, price.value, category, date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(text: &str) -> (Ledger, ImportResult) {
        let mut ledger = Ledger::new(0.0);
        let result = Importer::new(&mut ledger)
            .import_csv(text.as_bytes())
            .unwrap();
        (ledger, result)
    }

    #[test]
    fn test_import_skips_header() {
        let (ledger, result) = import(
            "Name,Price,Category,Date\n\
             Coffee,3.50,Food,2024-01-15 08:30:00\n",
        );
        assert_eq!(result.imported, 1);
        assert_eq!(result.skipped, 0);
        assert_eq!(ledger.list_all()[0].name, "Coffee");
        assert_eq!(ledger.list_all()[0].price, 3.5);
    }

    #[test]
    fn test_import_without_header_keeps_first_row() {
        let (ledger, result) = import("Coffee,3.50,Food,2024-01-15 08:30:00\n");
        assert_eq!(result.imported, 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_import_skips_rows_with_bad_dates() {
        let (ledger, result) = import(
            "Name,Price,Category,Date\n\
             A,1.00,X,2024-01-01 10:00:00\n\
             B,2.00,X,yesterday\n\
             C,3.00,X,2024-01-03 10:00:00\n",
        );
        let names: Vec<&str> = ledger.list_all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(result.imported, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors[0].line, 3);
        assert_eq!(result.errors[0].field.as_deref(), Some("Date"));
    }

    #[test]
    fn test_import_keeps_rows_around_invalid_utf8() {
        let mut ledger = Ledger::new(0.0);
        let bytes: &[u8] = b"Name,Price,Category,Date\n\
            A,1.00,X,2024-01-01 10:00:00\n\
            Caf\xe9,2.00,X,2024-01-02 10:00:00\n\
            C,3.00,X,2024-01-03 10:00:00\n";

        let result = Importer::new(&mut ledger).import_csv(bytes).unwrap();

        let names: Vec<&str> = ledger.list_all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Caf\u{FFFD}", "C"]);
        assert_eq!(result.imported, 3);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_import_bad_price_falls_back_to_zero() {
        let (ledger, result) = import(
            "Name,Price,Category,Date\n\
             Gift,abc,Misc,2024-01-01 10:00:00\n\
             Bike,\"1,234.50\",Sport,2024-01-02 10:00:00\n",
        );
        assert_eq!(ledger.list_all()[0].price, 0.0);
        assert_eq!(ledger.list_all()[1].price, 1234.5);
        assert_eq!(result.imported, 2);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].line, 2);
    }

    #[test]
    fn test_import_short_row_is_skipped() {
        let (ledger, result) = import(
            "Name,Price,Category\n\
             Coffee,3.50,Food\n",
        );
        assert!(ledger.is_empty());
        assert_eq!(result.skipped, 2);
    }

    #[test]
    fn test_import_unreadable_csv_leaves_ledger_unchanged() {
        let mut ledger = Ledger::new(0.0);
        ledger.add_expense(
            "Existing",
            1.0,
            "X",
            parse_date("2024-01-01 00:00:00").unwrap(),
        );

        let text = "Name,Price,Category,Date\n\
                    A,1.00,X,2024-01-01 10:00:00\n\
                    B,2.00\n";
        let result = Importer::new(&mut ledger).import_csv(text.as_bytes());

        assert!(matches!(result, Err(AppError::Csv(_))));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_import_appends_after_existing() {
        let mut ledger = Ledger::new(0.0);
        ledger.add_expense(
            "First",
            1.0,
            "X",
            parse_date("2024-01-01 00:00:00").unwrap(),
        );
        Importer::new(&mut ledger)
            .import_csv("Second,2.00,X,2024-01-02 00:00:00\n".as_bytes())
            .unwrap();

        let names: Vec<&str> = ledger.list_all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
