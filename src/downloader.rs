use crate::filter::FilteredView;
use crate::transaction::Transaction;

/// Header row shared by the CSV and XLSX exports.
pub const EXPORT_HEADERS: [&str; 10] = [
    "City",
    "Customer_type",
    "Gender",
    "Payment",
    "Product line",
    "Total",
    "Rating",
    "gross income",
    "Time",
    "hour",
];

fn text_fields(tx: &Transaction) -> [&str; 5] {
    [&tx.city, &tx.customer_type, &tx.gender, &tx.payment, &tx.product_line]
}

fn time_text(tx: &Transaction) -> String {
    tx.time.format("%H:%M:%S").to_string()
}

/// Convert the filtered view to CSV format
///
/// Produces one header row followed by one line per transaction, in table
/// order. Fields containing commas, quotes or newlines are quoted.
///
/// # Examples
/// ```
/// use sales_dashboard::downloader::to_csv;
/// use sales_dashboard::filter::{FilterState, select};
/// use sales_dashboard::transaction::TransactionTable;
///
/// let table = TransactionTable::new(Vec::new());
/// let view = select(&table, &FilterState::all(table.options()));
/// assert_eq!(to_csv(&view).lines().count(), 1);
/// ```
pub fn to_csv(view: &FilteredView<'_>) -> String {
    let mut csv_content = EXPORT_HEADERS.join(",");
    csv_content.push('\n');

    for tx in view.iter() {
        let mut fields: Vec<String> = text_fields(tx).iter().map(|f| escape(f)).collect();
        fields.push(tx.total.to_string());
        fields.push(tx.rating.to_string());
        fields.push(tx.gross_income.to_string());
        fields.push(time_text(tx));
        fields.push(tx.hour.to_string());
        csv_content.push_str(&fields.join(","));
        csv_content.push('\n');
    }

    csv_content
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Convert the filtered view to XLSX format
///
/// Writes a single `Sales` worksheet with the same columns as [`to_csv`].
#[cfg(feature = "web")]
pub fn to_xlsx(view: &FilteredView<'_>) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    use rust_xlsxwriter::{Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name("Sales")?;

    for (c, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet.write_string(0, c as u16, *header)?;
    }

    for (r, tx) in view.iter().enumerate() {
        let row = r as u32 + 1;
        for (c, field) in text_fields(tx).iter().enumerate() {
            worksheet.write_string(row, c as u16, *field)?;
        }
        worksheet.write_number(row, 5, tx.total)?;
        worksheet.write_number(row, 6, tx.rating)?;
        worksheet.write_number(row, 7, tx.gross_income)?;
        worksheet.write_string(row, 8, time_text(tx).as_str())?;
        worksheet.write_number(row, 9, f64::from(tx.hour))?;
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer()
}
