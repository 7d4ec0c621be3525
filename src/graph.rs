use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use thiserror::Error;

use crate::charts::{Axis, ChartDataset, Orientation};
use crate::config::ChartConfig;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid bar color `{0}`, expected #RRGGBB")]
    InvalidColor(String),

    #[error("failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Styling shared by every chart on the page.
///
/// Flat bar color on a transparent background, matching the page's
/// `plotly_white` look.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    pub bar_color: RGBColor,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_color: RGBColor(0x00, 0x83, 0xB8),
            width: 640,
            height: 420,
        }
    }
}

impl ChartStyle {
    pub fn from_config(config: &ChartConfig) -> Result<Self, ChartError> {
        Ok(Self {
            bar_color: parse_hex_color(&config.bar_color)?,
            width: config.width,
            height: config.height,
        })
    }
}

/// `#0083B8` -> `RGBColor(0, 131, 184)`
pub fn parse_hex_color(hex: &str) -> Result<RGBColor, ChartError> {
    let invalid = || ChartError::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

const TRANSPARENT_BG: RGBAColor = RGBAColor(0, 0, 0, 0.0);

/// Slots along the category axis: one label per slot and the bars placed
/// in them.
struct Slots {
    labels: Vec<String>,
    bars: Vec<(u32, f64)>,
}

impl Slots {
    fn from_dataset(dataset: &ChartDataset) -> Self {
        match dataset.position_range() {
            // integer axis: label every value between the smallest and largest key
            Some((lo, hi)) => Self {
                labels: (lo..=hi).map(|p| p.to_string()).collect(),
                bars: dataset
                    .bars
                    .iter()
                    .filter_map(|bar| bar.position.map(|p| ((p - lo) as u32, bar.total)))
                    .collect(),
            },
            None => Self {
                labels: dataset.bars.iter().map(|bar| bar.label.clone()).collect(),
                bars: dataset
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, bar)| (i as u32, bar.total))
                    .collect(),
            },
        }
    }

    fn count(&self) -> u32 {
        self.labels.len().max(1) as u32
    }

    fn value_max(&self) -> f64 {
        let max = self.bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        if max > 0.0 { max * 1.1 } else { 1.0 }
    }

    fn label(&self, value: &SegmentValue<u32>) -> String {
        match value {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                self.labels.get(*i as usize).cloned().unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        }
    }
}

/// Renders `dataset` as an SVG bar chart.
///
/// An empty dataset still renders its title and axes.
pub fn render_svg(dataset: &ChartDataset, style: &ChartStyle) -> Result<String, ChartError> {
    let slots = Slots::from_dataset(dataset);
    let mut svg_buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut svg_buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&TRANSPARENT_BG).map_err(draw_err)?;

        match dataset.kind.orientation() {
            Orientation::Horizontal => draw_horizontal(&root, dataset, &slots, style)?,
            Orientation::Vertical => draw_vertical(&root, dataset, &slots, style)?,
        }

        root.present().map_err(draw_err)?;
    }
    Ok(svg_buffer)
}

fn caption_font() -> FontDesc<'static> {
    ("sans-serif", 20).into_font().style(FontStyle::Bold)
}

fn draw_vertical(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    dataset: &ChartDataset,
    slots: &Slots,
    style: &ChartStyle,
) -> Result<(), ChartError> {
    let n = slots.count();
    let mut chart = ChartBuilder::on(root)
        .caption(dataset.title, caption_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0f64..slots.value_max())
        .map_err(draw_err)?;

    {
        let mut mesh = chart.configure_mesh();
        if dataset.kind.hidden_grid() == Axis::Y {
            mesh.disable_y_mesh();
        }
        mesh.x_labels(n as usize + 1)
            .x_label_formatter(&|v| slots.label(v))
            .y_desc("Total")
            .draw()
            .map_err(draw_err)?;
    }

    chart
        .draw_series(slots.bars.iter().map(|&(slot, total)| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(slot), 0.0), (SegmentValue::Exact(slot + 1), total)],
                style.bar_color.filled(),
            );
            bar.set_margin(0, 0, 4, 4);
            bar
        }))
        .map_err(draw_err)?;
    Ok(())
}

fn draw_horizontal(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    dataset: &ChartDataset,
    slots: &Slots,
    style: &ChartStyle,
) -> Result<(), ChartError> {
    let n = slots.count();
    let mut chart = ChartBuilder::on(root)
        .caption(dataset.title, caption_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..slots.value_max(), (0u32..n).into_segmented())
        .map_err(draw_err)?;

    {
        let mut mesh = chart.configure_mesh();
        if dataset.kind.hidden_grid() == Axis::X {
            mesh.disable_x_mesh();
        }
        mesh.y_labels(n as usize + 1)
            .y_label_formatter(&|v| slots.label(v))
            .x_desc("Total")
            .draw()
            .map_err(draw_err)?;
    }

    chart
        .draw_series(slots.bars.iter().map(|&(slot, total)| {
            let mut bar = Rectangle::new(
                [(0.0, SegmentValue::Exact(slot)), (total, SegmentValue::Exact(slot + 1))],
                style.bar_color.filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(draw_err)?;
    Ok(())
}
