use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::filter::FilterOptions;

/// One point-of-sale record as read from the `Sales` sheet.
///
/// Only the columns the dashboard reads are kept. `hour` is derived from
/// `time` when the row is loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub city: String,
    pub customer_type: String,
    pub gender: String,
    pub payment: String,
    pub product_line: String,
    pub total: f64,
    pub rating: f64,
    pub gross_income: f64,
    pub time: NaiveTime,
    pub hour: u32,
}

/// The full set of loaded transactions.
///
/// Immutable once built. The filter domain is computed here, at load time,
/// so the sidebar options never shrink with the current selection.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
    options: FilterOptions,
}

impl TransactionTable {
    pub fn new(rows: Vec<Transaction>) -> Self {
        let options = FilterOptions::from_rows(&rows);
        Self { rows, options }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct values per filter dimension, in first-appearance order.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }
}

impl FromIterator<Transaction> for TransactionTable {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
