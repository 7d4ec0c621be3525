use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::cache::TableCache;
use crate::config::DashboardConfig;
use crate::downloader;
use crate::error::LoadError;
use crate::filter::{Dimension, FilterOptions, FilterState, select};
use crate::graph::ChartStyle;
use crate::page::{self, Page};
use crate::presenter::Presenter;
use crate::transaction::TransactionTable;

pub struct AppState {
    cache: Arc<TableCache>,
    presenter: Presenter,
}

impl AppState {
    pub fn new(cache: Arc<TableCache>, presenter: Presenter) -> Self {
        Self { cache, presenter }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to render dashboard: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("failed to build xlsx export: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("workbook load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Sidebar selection as submitted by the form.
///
/// Without `applied` the request is a first visit: dimensions that carry no
/// values keep every option. With `applied` present, an absent dimension
/// means the user cleared it.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    applied: Option<String>,
    #[serde(default)]
    city: Vec<String>,
    #[serde(default)]
    customer_type: Vec<String>,
    #[serde(default)]
    gender: Vec<String>,
    #[serde(default)]
    payment: Vec<String>,
}

impl FilterQuery {
    pub fn into_state(self, options: &FilterOptions) -> FilterState {
        let applied = self.applied.is_some();
        let mut state = FilterState::all(options);
        for (dim, values) in [
            (Dimension::City, self.city),
            (Dimension::CustomerType, self.customer_type),
            (Dimension::Gender, self.gender),
            (Dimension::Payment, self.payment),
        ] {
            if applied || !values.is_empty() {
                state.set(options, dim, values);
            }
        }
        state
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    transactions: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/export.csv", get(export_csv))
        .route("/api/export.xlsx", get(export_xlsx))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(
    config: &DashboardConfig,
    cache: Arc<TableCache>,
) -> Result<(), Box<dyn std::error::Error>> {
    let style = ChartStyle::from_config(&config.charts)?;
    let presenter = Presenter::new(style)?;
    let app = router(Arc::new(AppState::new(cache, presenter)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Cached table, loading it on the blocking pool when the cache is cold.
async fn load_table(state: &AppState) -> Result<Arc<TransactionTable>, AppError> {
    if state.cache.is_warm() {
        return Ok(state.cache.get()?);
    }
    let cache = Arc::clone(&state.cache);
    Ok(tokio::task::spawn_blocking(move || cache.get()).await??)
}

async fn build_page(state: &AppState, query: FilterQuery) -> Result<Page, AppError> {
    let table = load_table(state).await?;
    let filters = query.into_state(table.options());
    Ok(page::render(&table, &filters))
}

async fn serve_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Html<String>, AppError> {
    let page = build_page(&state, query).await?;
    Ok(Html(state.presenter.render_html(&page)?))
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<Page>, AppError> {
    Ok(Json(build_page(&state, query).await?))
}

fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let table = load_table(&state).await?;
    let filters = query.into_state(table.options());
    let csv = downloader::to_csv(&select(&table, &filters));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, attachment("sales.csv")),
        ],
        csv,
    )
        .into_response())
}

async fn export_xlsx(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, AppError> {
    let table = load_table(&state).await?;
    let filters = query.into_state(table.options());
    let bytes = downloader::to_xlsx(&select(&table, &filters))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, attachment("sales.xlsx")),
        ],
        bytes,
    )
        .into_response())
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let table = load_table(&state).await?;
    Ok(Json(HealthResponse {
        status: "ok",
        transactions: table.len(),
    }))
}
