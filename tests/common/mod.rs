// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use tally::TrackerService;
use tempfile::TempDir;

/// Helper to create a test service writing into a temporary directory
pub fn test_service(limit: f64) -> Result<(TrackerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = TrackerService::new(limit).with_output_dir(temp_dir.path());
    Ok((service, temp_dir))
}

/// Helper to build a timestamp from "YYYY-MM-DD" and an hour
pub fn parse_date(date_str: &str, hour: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Test fixture: a month of typical spending
pub struct StandardExpenses;

impl StandardExpenses {
    /// Groceries, Rent, Dining, Groceries, Transport - in that order
    pub fn record(service: &mut TrackerService) {
        service.add_expense_at(
            "Supermarket".into(),
            84.20,
            "Groceries".into(),
            parse_date("2024-03-02", 10),
        );
        service.add_expense_at(
            "March rent".into(),
            950.00,
            "Rent".into(),
            parse_date("2024-03-01", 9),
        );
        service.add_expense_at(
            "Sushi".into(),
            42.50,
            "Dining".into(),
            parse_date("2024-03-08", 20),
        );
        service.add_expense_at(
            "Farmers market".into(),
            23.75,
            "Groceries".into(),
            parse_date("2024-03-09", 11),
        );
        service.add_expense_at(
            "Bus pass".into(),
            35.00,
            "Transport".into(),
            parse_date("2024-03-10", 8),
        );
    }

    pub fn total() -> f64 {
        84.20 + 950.00 + 42.50 + 23.75 + 35.00
    }
}
