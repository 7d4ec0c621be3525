//! Runtime configuration.
//!
//! Every field has a default, so the dashboard runs with no configuration at
//! all: `data.xlsx`, sheet `Sales`, columns `B:R`, three rows skipped above the
//! header, 1004 data rows, served on `127.0.0.1:3000`.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where the transactions live inside the workbook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_sheet")]
    pub sheet: String,
    /// Column range, e.g. `B:R`.
    #[serde(default = "default_columns")]
    pub columns: String,
    /// Rows above the header row.
    #[serde(default = "default_skip_rows")]
    pub skip_rows: u32,
    /// Maximum number of data rows read below the header.
    #[serde(default = "default_row_limit")]
    pub row_limit: u32,
}

fn default_path() -> String {
    "data.xlsx".to_string()
}

fn default_sheet() -> String {
    "Sales".to_string()
}

fn default_columns() -> String {
    "B:R".to_string()
}

fn default_skip_rows() -> u32 {
    3
}

fn default_row_limit() -> u32 {
    1004
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            sheet: default_sheet(),
            columns: default_columns(),
            skip_rows: default_skip_rows(),
            row_limit: default_row_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Bar fill as `#RRGGBB`.
    #[serde(default = "default_bar_color")]
    pub bar_color: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_bar_color() -> String {
    "#0083B8".to_string()
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    420
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_color: default_bar_color(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DashboardConfig {
    /// Loads `dashboard.toml` (optional) and `DASHBOARD_*` environment
    /// variables, e.g. `DASHBOARD_SOURCE__PATH=sales.xlsx`.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("dashboard").required(false))
            .add_source(
                config::Environment::with_prefix("DASHBOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
