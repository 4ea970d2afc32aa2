use std::io::Write;

use serde::Serialize;

use crate::application::AppError;
use crate::domain::{Expense, Ledger, format_amount};

/// Column order of the expense CSV file.
pub const CSV_HEADER: [&str; 4] = ["Name", "Price", "Category", "Date"];

/// One CSV row, already formatted for output.
#[derive(Debug, Serialize)]
struct ExpenseRow<'a> {
    name: &'a str,
    price: String,
    category: &'a str,
    date: String,
}

impl<'a> From<&'a Expense> for ExpenseRow<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            name: &expense.name,
            price: format_amount(expense.price),
            category: &expense.category,
            date: expense.formatted_date(),
        }
    }
}

/// Exporter for converting the ledger to CSV and to the plain-text report
pub struct Exporter<'a> {
    ledger: &'a Ledger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Write every expense as CSV, header first. Returns the number of rows.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer
            .write_record(CSV_HEADER)
            .map_err(AppError::CsvWrite)?;

        let mut count = 0;
        for expense in self.ledger.list_all() {
            csv_writer
                .serialize(ExpenseRow::from(expense))
                .map_err(AppError::CsvWrite)?;
            count += 1;
        }

        csv_writer
            .flush()
            .map_err(|e| AppError::CsvWrite(e.into()))?;
        Ok(count)
    }

    /// CSV text for the whole ledger. An empty ledger yields only the header.
    pub fn to_csv(&self) -> Result<String, AppError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Plain-text financial report. Fails with `NoExpenses` when the ledger
    /// is empty.
    pub fn to_report_text(&self) -> Result<String, AppError> {
        if self.ledger.is_empty() {
            return Err(AppError::NoExpenses);
        }

        let mut out = String::new();
        out.push_str("Financial Report\n\n");
        out.push_str(&format!(
            "Budget Limit: ${}\n",
            format_amount(self.ledger.limit())
        ));
        out.push_str(&format!(
            "Total Expenses: ${}\n",
            format_amount(self.ledger.total_spent())
        ));
        out.push_str(&format!(
            "Remaining Budget: ${}\n\n",
            format_amount(self.ledger.remaining())
        ));

        out.push_str("Expenses:\n");
        for expense in self.ledger.list_all() {
            out.push_str(&format!("{}\n", expense));
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(h, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_csv_empty_ledger_has_header_only() {
        let ledger = Ledger::new(100.0);
        let csv = Exporter::new(&ledger).to_csv().unwrap();
        assert_eq!(csv, "Name,Price,Category,Date\n");
    }

    #[test]
    fn test_csv_rows() {
        let mut ledger = Ledger::new(100.0);
        ledger.add_expense("Coffee", 3.5, "Food", at(1, 8));
        ledger.add_expense("Rent", 1200.0, "Housing", at(2, 10));

        let csv = Exporter::new(&ledger).to_csv().unwrap();
        assert_eq!(
            csv,
            "Name,Price,Category,Date\n\
             Coffee,3.50,Food,2024-05-01 08:15:00\n\
             Rent,1200.00,Housing,2024-05-02 10:15:00\n"
        );
    }

    #[test]
    fn test_csv_quotes_fields_with_delimiters() {
        let mut ledger = Ledger::new(0.0);
        ledger.add_expense("Bread, eggs", 4.0, "Food", at(1, 9));

        let csv = Exporter::new(&ledger).to_csv().unwrap();
        assert!(csv.contains("\"Bread, eggs\",4.00,Food,2024-05-01 09:15:00"));
    }

    #[test]
    fn test_report_text() {
        let mut ledger = Ledger::new(50.0);
        ledger.add_expense("Coffee", 3.5, "Food", at(1, 8));
        ledger.add_expense("Shoes", 60.0, "Clothes", at(3, 17));

        let report = Exporter::new(&ledger).to_report_text().unwrap();
        assert_eq!(
            report,
            "Financial Report\n\n\
             Budget Limit: $50.00\n\
             Total Expenses: $63.50\n\
             Remaining Budget: $-13.50\n\n\
             Expenses:\n\
             - Coffee: $3.50 (Food) [2024-05-01 08:15:00]\n\
             - Shoes: $60.00 (Clothes) [2024-05-03 17:15:00]\n"
        );
    }

    #[test]
    fn test_report_requires_expenses() {
        let ledger = Ledger::new(50.0);
        let result = Exporter::new(&ledger).to_report_text();
        assert!(matches!(result, Err(AppError::NoExpenses)));
    }
}
