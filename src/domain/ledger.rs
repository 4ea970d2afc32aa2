use chrono::NaiveDateTime;

use super::{Amount, Expense};

/// In-memory expense ledger: a budget limit plus the recorded expenses in
/// insertion order. Expenses are only ever appended.
///
/// The limit is informational. Recording an expense is always allowed and
/// the remaining budget may go negative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    limit: Amount,
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new(limit: Amount) -> Self {
        Self {
            limit,
            expenses: Vec::new(),
        }
    }

    pub fn limit(&self) -> Amount {
        self.limit
    }

    pub fn set_limit(&mut self, limit: Amount) {
        self.limit = limit;
    }

    /// Record a new expense at the end of the ledger and return it.
    pub fn add_expense(
        &mut self,
        name: impl Into<String>,
        price: Amount,
        category: impl Into<String>,
        date: NaiveDateTime,
    ) -> &Expense {
        self.push(Expense::new(name, price, category, date))
    }

    /// Append an already-built expense (used by import).
    pub fn push(&mut self, expense: Expense) -> &Expense {
        self.expenses.push(expense);
        &self.expenses[self.expenses.len() - 1]
    }

    pub fn list_all(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Expenses whose category matches exactly (case-sensitive), in order.
    pub fn filter_by_category(&self, category: &str) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Sum of all prices, accumulated in insertion order.
    pub fn total_spent(&self) -> Amount {
        self.expenses.iter().fold(0.0, |total, e| total + e.price)
    }

    pub fn remaining(&self) -> Amount {
        self.limit - self.total_spent()
    }
}

impl Extend<Expense> for Ledger {
    fn extend<T: IntoIterator<Item = Expense>>(&mut self, iter: T) {
        self.expenses.extend(iter);
    }
}
