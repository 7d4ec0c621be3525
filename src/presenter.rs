use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::charts::ChartDataset;
use crate::filter::{Dimension, FilterState};
use crate::graph::{ChartStyle, render_svg};
use crate::page::Page;

const TEMPLATE_NAME: &str = "dashboard";
const PAGE_TITLE: &str = "Company Sales";
const HEADING: &str = "Sales Dashboard";

#[derive(Serialize)]
struct OptionView<'a> {
    value: &'a str,
    checked: bool,
}

#[derive(Serialize)]
struct FilterGroupView<'a> {
    label: &'static str,
    param: &'static str,
    options: Vec<OptionView<'a>>,
}

#[derive(Serialize)]
struct MetricView {
    label: &'static str,
    value: String,
}

#[derive(Serialize)]
struct ChartView {
    title: &'static str,
    svg: Option<String>,
}

#[derive(Serialize)]
struct DashboardView<'a> {
    page_title: &'static str,
    heading: &'static str,
    sidebar: Vec<FilterGroupView<'a>>,
    metrics: Vec<MetricView>,
    stars: String,
    left: Vec<ChartView>,
    right: Vec<ChartView>,
    matched: usize,
    total_rows: usize,
    export_query: String,
}

/// Turns a [`Page`] into the HTML dashboard.
pub struct Presenter {
    templates: Handlebars<'static>,
    style: ChartStyle,
}

impl Presenter {
    pub fn new(style: ChartStyle) -> Result<Self, TemplateError> {
        let mut templates = Handlebars::new();
        templates.register_template_string(TEMPLATE_NAME, include_str!("./static/dashboard.hbs"))?;
        Ok(Self { templates, style })
    }

    /// Renders the full dashboard document.
    ///
    /// A chart that fails to draw is replaced by a placeholder; the rest of
    /// the page is still produced.
    pub fn render_html(&self, page: &Page) -> Result<String, RenderError> {
        let view = DashboardView {
            page_title: PAGE_TITLE,
            heading: HEADING,
            sidebar: sidebar(page),
            metrics: page
                .kpis
                .metrics()
                .into_iter()
                .map(|(label, value)| MetricView { label, value })
                .collect(),
            stars: page.kpis.stars(),
            left: page.charts.left.iter().map(|c| self.chart(c)).collect(),
            right: page.charts.right.iter().map(|c| self.chart(c)).collect(),
            matched: page.matched,
            total_rows: page.total_rows,
            export_query: filter_query(&page.filters),
        };
        self.templates.render(TEMPLATE_NAME, &view)
    }

    fn chart(&self, dataset: &ChartDataset) -> ChartView {
        let svg = match render_svg(dataset, &self.style) {
            Ok(svg) => Some(svg),
            Err(e) => {
                log::warn!("could not draw `{}`: {}", dataset.title, e);
                None
            }
        };
        ChartView {
            title: dataset.title,
            svg,
        }
    }
}

fn sidebar(page: &Page) -> Vec<FilterGroupView<'_>> {
    Dimension::ALL
        .into_iter()
        .map(|dim| FilterGroupView {
            label: dim.label(),
            param: dim.param(),
            options: page
                .options
                .values(dim)
                .iter()
                .map(|value| OptionView {
                    value,
                    checked: page.filters.is_selected(dim, value),
                })
                .collect(),
        })
        .collect()
}

/// Query string that reproduces `filters`, e.g. for export links.
///
/// Always carries `applied=1` so that an all-empty selection is not read
/// back as the default.
pub fn filter_query(filters: &FilterState) -> String {
    let mut pairs = vec!["applied=1".to_string()];
    for dim in Dimension::ALL {
        for value in filters.selected(dim) {
            pairs.push(format!("{}={}", dim.param(), urlencoding::encode(value)));
        }
    }
    pairs.join("&")
}
