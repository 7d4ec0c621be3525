#![cfg(not(tarpaulin_include))]

use sales_dashboard::cache::{TableCache, WorkbookSource};
use sales_dashboard::config::DashboardConfig;
use sales_dashboard::filter::FilterState;
use sales_dashboard::page;

/// Prints the unfiltered KPIs and chart series to stdout.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load()?;
    let cache = TableCache::new(WorkbookSource::new(config.source));
    let table = cache.get()?;
    let page = page::render(&table, &FilterState::all(table.options()));

    println!("{} transactions", page.total_rows);
    for (label, value) in page.kpis.metrics() {
        println!("{:<22}{}", label, value);
    }
    let stars = page.kpis.stars();
    if !stars.is_empty() {
        println!("{}", stars);
    }

    for dataset in page.charts.left.iter().chain(&page.charts.right) {
        println!();
        println!("{}", dataset.title);
        for bar in &dataset.bars {
            println!("  {:<24}{:>12.2}  ({} rows)", bar.label, bar.total, bar.transactions);
        }
    }

    Ok(())
}
