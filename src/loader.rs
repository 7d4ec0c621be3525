use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::config::SourceConfig;
use crate::error::LoadError;
use crate::filter::Dimension;
use crate::transaction::{Transaction, TransactionTable};

lazy_static! {
    static ref TIME_REGEX: Regex = Regex::new(r"^\d{1,2}:\d{2}:\d{2}$").unwrap();
}

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Inclusive, zero-based column range such as `B:R`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    pub first: u32,
    pub last: u32,
}

impl ColumnSpan {
    /// Parses a `B:R` style range. A single column (`C`) is a span of one.
    pub fn parse(spec: &str) -> Result<Self, LoadError> {
        let invalid = || LoadError::InvalidLayout(format!("bad column range `{spec}`"));
        let (first, last) = match spec.split_once(':') {
            Some((a, b)) => (a, b),
            None => (spec, spec),
        };
        let first = letter_to_column(first.trim()).ok_or_else(invalid)?;
        let last = letter_to_column(last.trim()).ok_or_else(invalid)?;
        if first > last {
            return Err(invalid());
        }
        Ok(Self { first, last })
    }

    pub fn columns(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }
}

/// `A` -> 0, `Z` -> 25, `AA` -> 26.
fn letter_to_column(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }
    Some(n - 1)
}

/// Parses a `HH:MM:SS` time of day.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    if !TIME_REGEX.is_match(text) {
        return None;
    }
    NaiveTime::parse_from_str(text, "%H:%M:%S").ok()
}

/// Spreadsheet time serial (fraction of a day) to a time of day.
fn time_from_serial(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let seconds = (serial.fract() * SECONDS_PER_DAY).round() as u32 % 86_400;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// Absolute column of each field the dashboard reads.
struct Columns {
    city: u32,
    customer_type: u32,
    gender: u32,
    payment: u32,
    product_line: u32,
    total: u32,
    rating: u32,
    gross_income: u32,
    time: u32,
}

impl Columns {
    fn resolve(range: &Range<Data>, header_row: u32, span: ColumnSpan) -> Result<Self, LoadError> {
        let headers: Vec<(u32, String)> = span
            .columns()
            .filter_map(|col| cell_text(range.get_value((header_row, col))).map(|h| (col, h)))
            .collect();
        let find = |name: &str| {
            headers
                .iter()
                .find(|(_, h)| h == name)
                .map(|(col, _)| *col)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            city: find(Dimension::City.column())?,
            customer_type: find(Dimension::CustomerType.column())?,
            gender: find(Dimension::Gender.column())?,
            payment: find(Dimension::Payment.column())?,
            product_line: find("Product line")?,
            total: find("Total")?,
            rating: find("Rating")?,
            gross_income: find("gross income")?,
            time: find("Time")?,
        })
    }
}

/// Loads the transaction table described by `source`.
///
/// The header row sits at absolute row `skip_rows`; at most `row_limit`
/// rows below it are read, restricted to the configured column range.
///
/// # Examples
/// ```no_run
/// use sales_dashboard::config::SourceConfig;
/// use sales_dashboard::loader::load_workbook;
///
/// match load_workbook(&SourceConfig::default()) {
///     Ok(table) => println!("Loaded {} transactions", table.len()),
///     Err(e) => eprintln!("Error loading workbook: {}", e),
/// }
/// ```
pub fn load_workbook(source: &SourceConfig) -> Result<TransactionTable, LoadError> {
    let path = Path::new(&source.path);
    if !path.is_file() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }
    let span = ColumnSpan::parse(&source.columns)?;

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Workbook {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == &source.sheet) {
        return Err(LoadError::SheetNotFound {
            sheet: source.sheet.clone(),
            available,
        });
    }

    let range = workbook
        .worksheet_range(&source.sheet)
        .map_err(|e| LoadError::Workbook {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let table = table_from_range(&range, source.skip_rows, source.row_limit, span)?;
    log::info!(
        "loaded {} transactions from {} (sheet `{}`)",
        table.len(),
        path.display(),
        source.sheet
    );
    Ok(table)
}

fn table_from_range(
    range: &Range<Data>,
    header_row: u32,
    row_limit: u32,
    span: ColumnSpan,
) -> Result<TransactionTable, LoadError> {
    let columns = Columns::resolve(range, header_row, span)?;
    let last_row = match range.end() {
        Some((end_row, _)) => end_row.min(header_row.saturating_add(row_limit)),
        None => header_row,
    };

    let mut rows = Vec::new();
    for row in header_row + 1..=last_row {
        if span.columns().all(|col| is_blank(range.get_value((row, col)))) {
            log::debug!("skipping blank sheet row {}", row + 1);
            continue;
        }
        rows.push(parse_row(range, row, &columns)?);
    }
    Ok(TransactionTable::new(rows))
}

fn parse_row(range: &Range<Data>, row: u32, columns: &Columns) -> Result<Transaction, LoadError> {
    let sheet_row = row + 1;
    let text = |col: u32, name: &str| {
        cell_text(range.get_value((row, col))).ok_or_else(|| LoadError::MissingValue {
            row: sheet_row,
            column: name.to_string(),
        })
    };
    let number = |col: u32, name: &str| cell_number(range.get_value((row, col)), sheet_row, name);

    let time = cell_time(range.get_value((row, columns.time)), sheet_row)?;
    Ok(Transaction {
        city: text(columns.city, "City")?,
        customer_type: text(columns.customer_type, "Customer_type")?,
        gender: text(columns.gender, "Gender")?,
        payment: text(columns.payment, "Payment")?,
        product_line: text(columns.product_line, "Product line")?,
        total: number(columns.total, "Total")?,
        rating: number(columns.rating, "Rating")?,
        gross_income: number(columns.gross_income, "gross income")?,
        time,
        hour: time.hour(),
    })
}

fn is_blank(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
        _ => None,
    }
}

fn cell_number(cell: Option<&Data>, row: u32, column: &str) -> Result<f64, LoadError> {
    let invalid = |value: String| LoadError::InvalidNumber {
        row,
        column: column.to_string(),
        value,
    };
    let Some(cell) = cell.filter(|c| !is_blank(Some(c))) else {
        return Err(LoadError::MissingValue {
            row,
            column: column.to_string(),
        });
    };
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().map_err(|_| invalid(s.clone())),
        other => Err(invalid(format!("{other:?}"))),
    }
}

fn cell_time(cell: Option<&Data>, row: u32) -> Result<NaiveTime, LoadError> {
    let parsed = match cell {
        Some(Data::String(s)) => parse_time(s),
        // ISO datetimes such as `1899-12-31T13:08:00`
        Some(Data::DateTimeIso(s)) => s.rsplit('T').next().and_then(parse_time),
        Some(Data::DateTime(dt)) => time_from_serial(dt.as_f64()),
        Some(Data::Float(f)) => time_from_serial(*f),
        c if is_blank(c) => {
            return Err(LoadError::MissingValue {
                row,
                column: "Time".to_string(),
            });
        }
        _ => None,
    };
    parsed.ok_or_else(|| LoadError::InvalidTime {
        row,
        value: cell_text(cell).unwrap_or_default(),
    })
}
