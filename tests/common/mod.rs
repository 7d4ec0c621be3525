#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sales_dashboard::config::SourceConfig;

/// Column headers B..R of the supermarket sales sheet.
pub const HEADERS: [&str; 17] = [
    "Invoice ID",
    "Branch",
    "City",
    "Customer_type",
    "Gender",
    "Product line",
    "Unit price",
    "Quantity",
    "Tax 5%",
    "Total",
    "Date",
    "Time",
    "Payment",
    "cogs",
    "gross margin percentage",
    "gross income",
    "Rating",
];

/// How the `Time` cell of a row is written.
#[derive(Clone, Debug)]
pub enum TimeCell {
    Text(&'static str),
    Serial(f64),
}

#[derive(Clone, Debug)]
pub struct SaleRow {
    pub city: &'static str,
    pub customer_type: &'static str,
    pub gender: &'static str,
    pub payment: &'static str,
    pub product_line: &'static str,
    pub total: f64,
    pub rating: f64,
    pub gross_income: f64,
    pub time: TimeCell,
}

pub fn sale(
    city: &'static str,
    customer_type: &'static str,
    gender: &'static str,
    payment: &'static str,
    product_line: &'static str,
    total: f64,
    rating: f64,
    gross_income: f64,
    time: &'static str,
) -> SaleRow {
    SaleRow {
        city,
        customer_type,
        gender,
        payment,
        product_line,
        total,
        rating,
        gross_income,
        time: TimeCell::Text(time),
    }
}

pub fn sample_rows() -> Vec<SaleRow> {
    vec![
        sale("Yangon", "Member", "Female", "Ewallet", "Health and beauty", 100.5, 9.1, 5.0, "13:08:00"),
        sale("Naypyitaw", "Normal", "Female", "Cash", "Electronic accessories", 200.25, 9.6, 10.0, "10:29:00"),
        sale("Yangon", "Normal", "Male", "Credit card", "Home and lifestyle", 50.0, 7.4, 2.5, "13:23:00"),
        sale("Mandalay", "Member", "Male", "Ewallet", "Health and beauty", 300.75, 8.5, 15.0, "20:33:00"),
        sale("Yangon", "Normal", "Male", "Cash", "Sports and travel", 25.5, 5.5, 1.25, "10:37:00"),
        sale("Mandalay", "Normal", "Female", "Credit card", "Sports and travel", 123.0, 4.2, 6.25, "10:05:00"),
    ]
}

/// Shape of a fixture workbook: three title rows above the header, data
/// in columns B..R, column A left empty.
pub struct SheetLayout {
    pub sheet: &'static str,
    pub headers: Vec<&'static str>,
    /// Data-row indexes before which an empty row is inserted.
    pub blank_before: Vec<usize>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Sales",
            headers: HEADERS.to_vec(),
            blank_before: Vec::new(),
        }
    }
}

pub fn write_workbook(path: &Path, layout: &SheetLayout, rows: &[SaleRow]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(layout.sheet).unwrap();

    worksheet.write_string(0, 1, "Supermarket sales").unwrap();
    worksheet.write_string(1, 1, "Q1 2019").unwrap();

    for (i, header) in layout.headers.iter().enumerate() {
        worksheet.write_string(3, i as u16 + 1, *header).unwrap();
    }

    let mut row = 4u32;
    for (index, sale) in rows.iter().enumerate() {
        if layout.blank_before.contains(&index) {
            row += 1;
        }
        for (i, header) in layout.headers.iter().enumerate() {
            let col = i as u16 + 1;
            match *header {
                "Invoice ID" => worksheet.write_string(row, col, &format!("750-67-{:04}", index)),
                "Branch" => worksheet.write_string(row, col, "A"),
                "City" => worksheet.write_string(row, col, sale.city),
                "Customer_type" => worksheet.write_string(row, col, sale.customer_type),
                "Gender" => worksheet.write_string(row, col, sale.gender),
                "Product line" => worksheet.write_string(row, col, sale.product_line),
                "Total" => worksheet.write_number(row, col, sale.total),
                "Date" => worksheet.write_string(row, col, "1/5/2019"),
                "Time" => match sale.time {
                    TimeCell::Text(text) => worksheet.write_string(row, col, text),
                    TimeCell::Serial(serial) => worksheet.write_number(row, col, serial),
                },
                "Payment" => worksheet.write_string(row, col, sale.payment),
                "gross income" => worksheet.write_number(row, col, sale.gross_income),
                "Rating" => worksheet.write_number(row, col, sale.rating),
                _ => worksheet.write_number(row, col, 1.0),
            }
            .unwrap();
        }
        row += 1;
    }

    workbook.save(path).unwrap();
}

/// Writes `rows` into a fresh temp directory and returns a source config
/// pointing at it. Keep the `TempDir` alive for as long as the file is used.
pub fn fixture(layout: &SheetLayout, rows: &[SaleRow]) -> (TempDir, SourceConfig) {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("supermarkt_sales.xlsx");
    write_workbook(&path, layout, rows);
    let source = SourceConfig {
        path: path.to_string_lossy().into_owned(),
        ..SourceConfig::default()
    };
    (dir, source)
}

pub fn sample_fixture() -> (TempDir, SourceConfig) {
    fixture(&SheetLayout::default(), &sample_rows())
}
