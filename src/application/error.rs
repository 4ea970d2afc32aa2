use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No expenses found.")]
    NoExpenses,

    #[error("Error opening file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error writing file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error reading CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error writing CSV file: {0}")]
    CsvWrite(#[source] csv::Error),
}
