use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::domain::{Amount, Expense, Ledger};
use crate::io::{Exporter, ImportResult, Importer};

use super::AppError;

/// File name used by CSV export, relative to the output directory.
pub const EXPORT_FILE_NAME: &str = "expenses.csv";

/// File name used by the financial report, relative to the output directory.
pub const REPORT_FILE_NAME: &str = "financial_report.txt";

/// Session service owning the ledger for one interactive session.
/// This is the primary interface for any client (console menu, tests, etc.).
pub struct TrackerService {
    ledger: Ledger,
    output_dir: PathBuf,
}

/// Result of writing the ledger to a file
#[derive(Debug, Clone)]
pub struct WriteResult {
    pub path: PathBuf,
    pub count: usize,
}

impl TrackerService {
    /// Create a new session with the given budget limit, writing files to
    /// the current directory.
    pub fn new(limit: Amount) -> Self {
        Self {
            ledger: Ledger::new(limit),
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn set_limit(&mut self, limit: Amount) {
        self.ledger.set_limit(limit);
    }

    // ========================
    // Ledger operations
    // ========================

    /// Record an expense stamped with the current local time.
    pub fn add_expense(&mut self, name: String, price: Amount, category: String) -> &Expense {
        self.record(Expense::now(name, price, category))
    }

    /// Record an expense with an explicit timestamp.
    pub fn add_expense_at(
        &mut self,
        name: String,
        price: Amount,
        category: String,
        date: NaiveDateTime,
    ) -> &Expense {
        self.record(Expense::new(name, price, category, date))
    }

    fn record(&mut self, expense: Expense) -> &Expense {
        tracing::debug!(name = %expense.name, price = expense.price, "expense added");
        self.ledger.push(expense)
    }

    /// All expenses in insertion order. Fails when nothing has been recorded.
    pub fn list_expenses(&self) -> Result<&[Expense], AppError> {
        if self.ledger.is_empty() {
            return Err(AppError::NoExpenses);
        }
        Ok(self.ledger.list_all())
    }

    /// Expenses in `category`. Fails when the ledger is empty; returns an
    /// empty list when the ledger has expenses but none match.
    pub fn filter_by_category(&self, category: &str) -> Result<Vec<&Expense>, AppError> {
        if self.ledger.is_empty() {
            return Err(AppError::NoExpenses);
        }
        Ok(self.ledger.filter_by_category(category))
    }

    pub fn total_spent(&self) -> Amount {
        self.ledger.total_spent()
    }

    pub fn remaining(&self) -> Amount {
        self.ledger.remaining()
    }

    // ========================
    // File operations
    // ========================

    /// Export all expenses to `expenses.csv` in the output directory.
    pub fn export_csv(&self) -> Result<WriteResult, AppError> {
        self.export_csv_to(self.output_dir.join(EXPORT_FILE_NAME))
    }

    /// Export all expenses to `path`. Nothing is written for an empty ledger.
    pub fn export_csv_to(&self, path: impl AsRef<Path>) -> Result<WriteResult, AppError> {
        let path = path.as_ref();
        if self.ledger.is_empty() {
            return Err(AppError::NoExpenses);
        }

        let file = create_file(path)?;
        let count = Exporter::new(&self.ledger).write_csv(BufWriter::new(file))?;

        tracing::debug!(path = %path.display(), count, "expenses exported");
        Ok(WriteResult {
            path: path.to_path_buf(),
            count,
        })
    }

    /// Write `financial_report.txt` in the output directory.
    pub fn write_report(&self) -> Result<WriteResult, AppError> {
        self.write_report_to(self.output_dir.join(REPORT_FILE_NAME))
    }

    /// Write the financial report to `path`. Nothing is written for an
    /// empty ledger.
    pub fn write_report_to(&self, path: impl AsRef<Path>) -> Result<WriteResult, AppError> {
        let path = path.as_ref();
        let exporter = Exporter::new(&self.ledger);
        let report = exporter.to_report_text()?;

        let write_err = |source| AppError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(create_file(path)?);
        writer.write_all(report.as_bytes()).map_err(write_err)?;
        writer.flush().map_err(write_err)?;

        tracing::debug!(path = %path.display(), "financial report written");
        Ok(WriteResult {
            path: path.to_path_buf(),
            count: self.ledger.len(),
        })
    }

    /// Append the expenses from the CSV file at `path`.
    ///
    /// If the file cannot be opened or read the ledger is left unchanged.
    pub fn import_csv(&mut self, path: impl AsRef<Path>) -> Result<ImportResult, AppError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AppError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let result = Importer::new(&mut self.ledger).import_csv(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            imported = result.imported,
            skipped = result.skipped,
            "expenses imported"
        );
        Ok(result)
    }
}

fn create_file(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}
