use serde::Serialize;

use crate::filter::FilteredView;

/// The four headline figures shown above the charts.
///
/// Means are `None` when the view is empty; that is the "no data" state,
/// not an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiSummary {
    pub transactions: usize,
    pub total_sales: i64,
    pub average_rating: Option<f64>,
    pub average_transaction: Option<f64>,
    pub average_gross_income: Option<f64>,
}

const NO_DATA: &str = "no data";

impl KpiSummary {
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let total: f64 = view.iter().map(|tx| tx.total).sum();
        Self {
            transactions: view.len(),
            // truncates toward zero, like int() on the summed column
            total_sales: total as i64,
            average_rating: mean(view, |tx| tx.rating).map(|v| round_to(v, 1)),
            average_transaction: mean(view, |tx| tx.total).map(|v| round_to(v, 2)),
            average_gross_income: mean(view, |tx| tx.gross_income).map(|v| round_to(v, 1)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions == 0
    }

    /// One star per rating point, rounded half to even.
    pub fn stars(&self) -> String {
        match self.average_rating {
            Some(rating) => "\u{2b50}".repeat(rating.round_ties_even().max(0.0) as usize),
            None => String::new(),
        }
    }

    /// Label/value pairs for the KPI strip, left to right.
    pub fn metrics(&self) -> [(&'static str, String); 4] {
        [
            ("Total Sales", format!("$ {}", group_thousands(self.total_sales))),
            (
                "Average Rating",
                self.average_rating
                    .map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.1}")),
            ),
            ("Average Trans. Sales", money(self.average_transaction, 2)),
            ("Gross Income", money(self.average_gross_income, 1)),
        ]
    }
}

fn mean<F>(view: &FilteredView<'_>, field: F) -> Option<f64>
where
    F: Fn(&crate::transaction::Transaction) -> f64,
{
    if view.is_empty() {
        return None;
    }
    let sum: f64 = view.iter().map(field).sum();
    Some(sum / view.len() as f64)
}

/// Rounds to `places` decimals, ties to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

fn money(value: Option<f64>, places: usize) -> String {
    match value {
        Some(v) => format!("$ {v:.places$}"),
        None => NO_DATA.to_string(),
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Dimension, FilterState, select};
    use crate::transaction::TransactionTable;
    use crate::transaction::fixtures::{sample_table, tx};
    use approx::assert_abs_diff_eq;

    #[test]
    fn summarises_the_full_table() {
        let table = sample_table();
        let view = select(&table, &FilterState::all(table.options()));
        let kpis = KpiSummary::from_view(&view);

        assert_eq!(kpis.transactions, 6);
        assert_eq!(kpis.total_sales, 800);
        assert_abs_diff_eq!(kpis.average_rating.unwrap(), 7.4);
        assert_abs_diff_eq!(kpis.average_transaction.unwrap(), 133.33);
        assert_abs_diff_eq!(kpis.average_gross_income.unwrap(), 6.7);
        assert_eq!(kpis.stars().chars().count(), 7);
    }

    #[test]
    fn ties_round_to_even() {
        let table = TransactionTable::new(vec![
            tx("Yangon", "Member", "Female", "Cash", "Health and beauty", 10.0, 7.2, 0.5, "10:00:00"),
            tx("Yangon", "Member", "Female", "Cash", "Health and beauty", 20.0, 7.3, 0.5, "11:00:00"),
        ]);
        let kpis = KpiSummary::from_view(&select(&table, &FilterState::all(table.options())));
        assert_abs_diff_eq!(kpis.average_rating.unwrap(), 7.2);

        assert_abs_diff_eq!(round_to(0.125, 2), 0.12);
        assert_abs_diff_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn stars_round_half_to_even() {
        let stars = |rating: f64| {
            KpiSummary {
                transactions: 1,
                total_sales: 0,
                average_rating: Some(rating),
                average_transaction: None,
                average_gross_income: None,
            }
            .stars()
            .chars()
            .count()
        };
        assert_eq!(stars(6.5), 6);
        assert_eq!(stars(7.5), 8);
        assert_eq!(stars(6.6), 7);
    }

    #[test]
    fn empty_view_is_no_data() {
        let table = sample_table();
        let mut state = FilterState::all(table.options());
        state.set(table.options(), Dimension::City, Vec::<String>::new());
        let kpis = KpiSummary::from_view(&select(&table, &state));

        assert!(kpis.is_empty());
        assert_eq!(kpis.total_sales, 0);
        assert_eq!(kpis.average_rating, None);
        assert_eq!(kpis.stars(), "");

        let metrics = kpis.metrics();
        assert_eq!(metrics[0].1, "$ 0");
        assert!(metrics[1..].iter().all(|(_, v)| v == "no data"));
    }

    #[test]
    fn metric_strip_formatting() {
        let kpis = KpiSummary {
            transactions: 1000,
            total_sales: 322_966,
            average_rating: Some(7.0),
            average_transaction: Some(322.97),
            average_gross_income: Some(15.4),
        };
        let metrics = kpis.metrics();
        assert_eq!(metrics[0], ("Total Sales", "$ 322,966".to_string()));
        assert_eq!(metrics[1].1, "7.0");
        assert_eq!(metrics[2].1, "$ 322.97");
        assert_eq!(metrics[3].1, "$ 15.4");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
    }
}
