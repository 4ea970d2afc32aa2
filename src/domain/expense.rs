use std::fmt;

use chrono::{Local, NaiveDateTime, SubsecRound};

use super::{Amount, format_amount};

/// Timestamp layout used everywhere an expense date is shown or stored.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single recorded spend. Expenses are immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub name: String,
    /// Expected to be non-negative, but not enforced
    pub price: Amount,
    pub category: String,
    /// Local wall-clock time, whole seconds
    pub date: NaiveDateTime,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        price: Amount,
        category: impl Into<String>,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            date: date.trunc_subsecs(0),
        }
    }

    /// Create an expense stamped with the current local time.
    pub fn now(name: impl Into<String>, price: Amount, category: impl Into<String>) -> Self {
        Self::new(name, price, category, Local::now().naive_local())
    }

    pub fn formatted_date(&self) -> String {
        format_date(&self.date)
    }
}

/// Renders the one-line listing used by the console and the report:
/// `- Coffee: $3.50 (Food) [2024-01-15 08:30:00]`
impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}: ${} ({}) [{}]",
            self.name,
            format_amount(self.price),
            self.category,
            self.formatted_date()
        )
    }
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a timestamp in the strict `YYYY-MM-DD HH:MM:SS` layout.
pub fn parse_date(input: &str) -> Result<NaiveDateTime, ParseDateError> {
    NaiveDateTime::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| ParseDateError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDateError {
    InvalidFormat(String),
}

impl fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDateError::InvalidFormat(input) => write!(
                f,
                "invalid date {:?}, expected YYYY-MM-DD HH:MM:SS",
                input
            ),
        }
    }
}

impl std::error::Error for ParseDateError {}
