/*!
# Sales Dashboard

A browser-based sales dashboard for supermarket point-of-sale data, built in Rust.

## Overview

The dashboard reads the `Sales` sheet of an Excel workbook once, keeps the
parsed transactions in memory, and lets the user narrow them down with four
checkbox groups in a sidebar. For every selection it shows four headline
figures and four bar charts, all recomputed from the same filtered rows.

## Architecture

### Data Layer
- **Technologies**: calamine, chrono, regex
- **Key Components**:
  - Workbook Loader - Reads the configured sheet, header row and column range
  - Transaction Table - Typed rows plus the filter domain computed at load time
  - Table Cache - Load-once cache shared by every request

### Analysis Layer
- **Key Components**:
  - Filter State - Per-dimension selections, combined with AND
  - KPI Summary - Total sales, average rating, average sale, average gross income
  - Chart Datasets - Totals grouped by product line, hour, payment method and rating

### Presentation Layer
- **Technologies**: axum, handlebars, plotters
- **Key Components**:
  - Page - Everything shown for one filter state, serialisable to JSON
  - Presenter - HTML page with the sidebar, KPI strip and SVG charts
  - Exports - CSV and XLSX downloads of the filtered rows

## Key Features

- Multi-select filters on city, customer type, gender and payment method
- Empty selections render a "no data" page instead of failing
- Hourly and rating charts label every integer value on the axis
- Configuration through `dashboard.toml` and `DASHBOARD_*` environment variables

## Modules

- **transaction**: Transaction record and table
- **loader**: Workbook reading and row parsing
- **cache**: Transaction source trait and load-once cache
- **filter**: Dimensions, filter options, filter state and selection
- **kpi**: Headline figures and their display formatting
- **charts**: Grouping and aggregation behind the four charts
- **page**: Page assembly for one filter state
- **graph**: SVG bar chart rendering
- **presenter**: HTML rendering of a page
- **downloader**: Export functionality (CSV, XLSX)
- **app**: Routing and handlers
- **config**: Layered configuration
- **error**: Load errors

## REST API Endpoints

- `/` - HTML dashboard; filters come from the query string
- `/api/dashboard` - The same page as JSON
- `/api/export.csv`, `/api/export.xlsx` - Filtered rows as a download
- `/health` - Liveness and row count
*/

pub mod cache;
pub mod charts;
pub mod config;
pub mod downloader;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod page;
pub mod transaction;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod graph;
#[cfg(feature = "web")]
pub mod presenter;

pub use cache::{TableCache, TransactionSource, WorkbookSource};
pub use config::DashboardConfig;
pub use error::LoadError;
pub use filter::{Dimension, FilterOptions, FilterState, FilteredView};
pub use kpi::KpiSummary;
pub use page::{Page, render};
pub use transaction::{Transaction, TransactionTable};
