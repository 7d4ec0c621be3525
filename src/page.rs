use serde::Serialize;

use crate::charts::{ChartDataset, build_charts};
use crate::filter::{FilterOptions, FilterState, select};
use crate::kpi::KpiSummary;
use crate::transaction::TransactionTable;

/// Two-column chart layout: hourly and payment on the left, product line
/// and rating on the right.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartGrid {
    pub left: [ChartDataset; 2],
    pub right: [ChartDataset; 2],
}

/// Everything the dashboard shows for one filter state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    pub options: FilterOptions,
    pub filters: FilterState,
    pub matched: usize,
    pub total_rows: usize,
    pub kpis: KpiSummary,
    pub charts: ChartGrid,
}

/// Runs selection, summary and grouping for `filters`.
///
/// Pure: the same table and filter state always give the same page, and an
/// empty selection gives an empty (not failed) page.
pub fn render(table: &TransactionTable, filters: &FilterState) -> Page {
    let view = select(table, filters);
    let kpis = KpiSummary::from_view(&view);
    let [product_line, hourly, payment, rating] = build_charts(&view);
    log::debug!("rendered page: {} of {} transactions selected", view.len(), table.len());

    Page {
        options: table.options().clone(),
        filters: filters.clone(),
        matched: view.len(),
        total_rows: table.len(),
        kpis,
        charts: ChartGrid {
            left: [hourly, payment],
            right: [product_line, rating],
        },
    }
}
