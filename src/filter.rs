use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::transaction::{Transaction, TransactionTable};

/// A categorical column the sidebar can filter on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    City,
    CustomerType,
    Gender,
    Payment,
}

impl Dimension {
    /// Sidebar order.
    pub const ALL: [Dimension; 4] = [
        Dimension::City,
        Dimension::CustomerType,
        Dimension::Gender,
        Dimension::Payment,
    ];

    /// Header of the sheet column backing this dimension.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::City => "City",
            Dimension::CustomerType => "Customer_type",
            Dimension::Gender => "Gender",
            Dimension::Payment => "Payment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::City => "City:",
            Dimension::CustomerType => "Customer Type:",
            Dimension::Gender => "Gender:",
            Dimension::Payment => "Payment Method:",
        }
    }

    /// Query-string key carrying the selected values.
    pub fn param(self) -> &'static str {
        match self {
            Dimension::City => "city",
            Dimension::CustomerType => "customer_type",
            Dimension::Gender => "gender",
            Dimension::Payment => "payment",
        }
    }

    pub fn value(self, tx: &Transaction) -> &str {
        match self {
            Dimension::City => &tx.city,
            Dimension::CustomerType => &tx.customer_type,
            Dimension::Gender => &tx.gender,
            Dimension::Payment => &tx.payment,
        }
    }
}

/// Selectable values for every dimension, taken from the full table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterOptions {
    values: BTreeMap<Dimension, Vec<String>>,
}

impl FilterOptions {
    pub fn from_rows(rows: &[Transaction]) -> Self {
        let mut values = BTreeMap::new();
        for dim in Dimension::ALL {
            let mut seen = BTreeSet::new();
            let mut distinct = Vec::new();
            for tx in rows {
                let value = dim.value(tx);
                if seen.insert(value) {
                    distinct.push(value.to_string());
                }
            }
            values.insert(dim, distinct);
        }
        Self { values }
    }

    pub fn values(&self, dim: Dimension) -> &[String] {
        self.values.get(&dim).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, dim: Dimension, value: &str) -> bool {
        self.values(dim).iter().any(|v| v == value)
    }
}

/// The user's current selection across the four dimensions.
///
/// Each set is a subset of the matching [`FilterOptions`] domain; values
/// outside the domain are dropped on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterState {
    selected: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterState {
    /// Every option selected. This is the sidebar default.
    pub fn all(options: &FilterOptions) -> Self {
        let selected = Dimension::ALL
            .into_iter()
            .map(|dim| (dim, options.values(dim).iter().cloned().collect()))
            .collect();
        Self { selected }
    }

    /// Builds a state from submitted values. Dimensions missing from
    /// `selection` end up with nothing selected.
    pub fn from_selection<I, V>(options: &FilterOptions, selection: I) -> Self
    where
        I: IntoIterator<Item = (Dimension, V)>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut state = Self {
            selected: Dimension::ALL
                .into_iter()
                .map(|dim| (dim, BTreeSet::new()))
                .collect(),
        };
        for (dim, values) in selection {
            state.set(options, dim, values);
        }
        state
    }

    /// Replaces the selection for one dimension.
    pub fn set<V>(&mut self, options: &FilterOptions, dim: Dimension, values: V)
    where
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let chosen = values
            .into_iter()
            .filter(|v| options.contains(dim, v.as_ref()))
            .map(|v| v.as_ref().to_string())
            .collect();
        self.selected.insert(dim, chosen);
    }

    pub fn selected(&self, dim: Dimension) -> impl Iterator<Item = &str> {
        self.selected
            .get(&dim)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        self.selected
            .get(&dim)
            .is_some_and(|set| set.contains(value))
    }

    /// Conjunctive membership test over all four dimensions.
    pub fn matches(&self, tx: &Transaction) -> bool {
        Dimension::ALL
            .into_iter()
            .all(|dim| self.is_selected(dim, dim.value(tx)))
    }
}

/// Rows of the table that pass the current filter, in table order.
#[derive(Clone, Debug)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.rows.iter().copied()
    }
}

/// Applies `state` to `table`.
pub fn select<'a>(table: &'a TransactionTable, state: &FilterState) -> FilteredView<'a> {
    let rows = table.rows().iter().filter(|tx| state.matches(tx)).collect();
    FilteredView { rows }
}
