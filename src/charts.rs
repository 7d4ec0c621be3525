use serde::Serialize;
use std::collections::BTreeMap;

use crate::filter::FilteredView;
use crate::transaction::Transaction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    ProductLine,
    Hourly,
    Payment,
    Rating,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::ProductLine => "Sales by Product Line",
            ChartKind::Hourly => "Sales by hour",
            ChartKind::Payment => "Sales by Payment",
            ChartKind::Rating => "Sales by Rating",
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            ChartKind::ProductLine => Orientation::Horizontal,
            _ => Orientation::Vertical,
        }
    }

    /// Axis drawn without gridlines. It is always the value axis.
    pub fn hidden_grid(self) -> Axis {
        match self.orientation() {
            Orientation::Horizontal => Axis::X,
            Orientation::Vertical => Axis::Y,
        }
    }
}

/// One bar: a group key and the summed `Total` of its rows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    /// Numeric key for integer axes (hour, rounded rating).
    pub position: Option<i64>,
    pub total: f64,
    pub transactions: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartDataset {
    pub kind: ChartKind,
    pub title: &'static str,
    pub bars: Vec<Bar>,
}

impl ChartDataset {
    fn new(kind: ChartKind, bars: Vec<Bar>) -> Self {
        Self {
            kind,
            title: kind.title(),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Inclusive range spanned by the bar positions, if the chart has an
    /// integer axis and at least one bar.
    pub fn position_range(&self) -> Option<(i64, i64)> {
        let mut positions = self.bars.iter().filter_map(|bar| bar.position);
        let first = positions.next()?;
        Some(positions.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Groups the view by `key`. Every row lands in exactly one group and
/// groups without rows do not exist.
pub fn partition<'a, K, F>(view: &FilteredView<'a>, key: F) -> BTreeMap<K, Vec<&'a Transaction>>
where
    K: Ord,
    F: Fn(&Transaction) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a Transaction>> = BTreeMap::new();
    for tx in view.iter() {
        groups.entry(key(tx)).or_default().push(tx);
    }
    groups
}

fn sum_groups<K, F, L>(view: &FilteredView<'_>, key: F, describe: L) -> Vec<Bar>
where
    K: Ord,
    F: Fn(&Transaction) -> K,
    L: Fn(&K) -> (String, Option<i64>),
{
    partition(view, key)
        .into_iter()
        .map(|(k, rows)| {
            let (label, position) = describe(&k);
            Bar {
                label,
                position,
                total: rows.iter().map(|tx| tx.total).sum(),
                transactions: rows.len(),
            }
        })
        .collect()
}

/// Rating bucket: nearest integer, ties to even.
pub fn rating_bucket(rating: f64) -> i64 {
    rating.round_ties_even() as i64
}

pub fn sales_by_product_line(view: &FilteredView<'_>) -> ChartDataset {
    let mut bars = sum_groups(view, |tx| tx.product_line.clone(), |k| (k.clone(), None));
    // stable: equal totals keep key order
    bars.sort_by(|a, b| a.total.total_cmp(&b.total));
    ChartDataset::new(ChartKind::ProductLine, bars)
}

pub fn sales_by_hour(view: &FilteredView<'_>) -> ChartDataset {
    let bars = sum_groups(view, |tx| tx.hour, |h| (h.to_string(), Some(i64::from(*h))));
    ChartDataset::new(ChartKind::Hourly, bars)
}

pub fn sales_by_payment(view: &FilteredView<'_>) -> ChartDataset {
    let bars = sum_groups(view, |tx| tx.payment.clone(), |k| (k.clone(), None));
    ChartDataset::new(ChartKind::Payment, bars)
}

pub fn sales_by_rating(view: &FilteredView<'_>) -> ChartDataset {
    let bars = sum_groups(view, |tx| rating_bucket(tx.rating), |r| (r.to_string(), Some(*r)));
    ChartDataset::new(ChartKind::Rating, bars)
}

/// All four datasets: product line, hourly, payment, rating.
pub fn build_charts(view: &FilteredView<'_>) -> [ChartDataset; 4] {
    [
        sales_by_product_line(view),
        sales_by_hour(view),
        sales_by_payment(view),
        sales_by_rating(view),
    ]
}
