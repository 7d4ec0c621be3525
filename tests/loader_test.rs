mod common;

use common::{SheetLayout, TimeCell, fixture, sale, sample_fixture, sample_rows};
use sales_dashboard::cache::{TableCache, WorkbookSource};
use sales_dashboard::config::SourceConfig;
use sales_dashboard::error::LoadError;
use sales_dashboard::filter::Dimension;
use sales_dashboard::loader::load_workbook;

#[test]
fn loads_typed_rows_from_the_sales_sheet() {
    let (_dir, source) = sample_fixture();
    let table = load_workbook(&source).unwrap();

    assert_eq!(table.len(), 6);
    let first = &table.rows()[0];
    assert_eq!(first.city, "Yangon");
    assert_eq!(first.product_line, "Health and beauty");
    assert_eq!(first.total, 100.5);
    assert_eq!(first.rating, 9.1);
    assert_eq!(first.hour, 13);

    assert_eq!(
        table.options().values(Dimension::City),
        ["Yangon", "Naypyitaw", "Mandalay"]
    );
    assert_eq!(
        table.options().values(Dimension::Payment),
        ["Ewallet", "Cash", "Credit card"]
    );
}

#[test]
fn missing_file_is_reported() {
    let source = SourceConfig {
        path: "does/not/exist.xlsx".to_string(),
        ..SourceConfig::default()
    };
    assert!(matches!(load_workbook(&source), Err(LoadError::FileNotFound(_))));
}

#[test]
fn missing_sheet_lists_available_sheets() {
    let layout = SheetLayout {
        sheet: "Data",
        ..SheetLayout::default()
    };
    let (_dir, source) = fixture(&layout, &sample_rows());

    match load_workbook(&source) {
        Err(LoadError::SheetNotFound { sheet, available }) => {
            assert_eq!(sheet, "Sales");
            assert_eq!(available, ["Data"]);
        }
        other => panic!("expected SheetNotFound, got {:?}", other),
    }
}

#[test]
fn missing_column_is_rejected_up_front() {
    let layout = SheetLayout {
        headers: common::HEADERS
            .iter()
            .copied()
            .filter(|h| *h != "gross income")
            .collect(),
        ..SheetLayout::default()
    };
    let (_dir, source) = fixture(&layout, &sample_rows());

    match load_workbook(&source) {
        Err(LoadError::MissingColumn(column)) => assert_eq!(column, "gross income"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn narrow_column_range_hides_later_columns() {
    let (_dir, mut source) = sample_fixture();
    source.columns = "B:K".to_string();

    match load_workbook(&source) {
        Err(LoadError::MissingColumn(column)) => assert_eq!(column, "Payment"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn unparseable_time_names_the_sheet_row() {
    let mut rows = sample_rows();
    rows[1].time = TimeCell::Text("25:99:00");
    let (_dir, source) = fixture(&SheetLayout::default(), &rows);

    match load_workbook(&source) {
        Err(LoadError::InvalidTime { row, value }) => {
            // title rows, header, then the second data row
            assert_eq!(row, 6);
            assert_eq!(value, "25:99:00");
        }
        other => panic!("expected InvalidTime, got {:?}", other),
    }
}

#[test]
fn serial_times_are_accepted() {
    let mut rows = sample_rows();
    rows[0].time = TimeCell::Serial(0.75);
    let (_dir, source) = fixture(&SheetLayout::default(), &rows);

    let table = load_workbook(&source).unwrap();
    assert_eq!(table.rows()[0].hour, 18);
}

#[test]
fn row_limit_caps_the_rows_read() {
    let (_dir, mut source) = sample_fixture();
    source.row_limit = 2;

    let table = load_workbook(&source).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[1].city, "Naypyitaw");
}

#[test]
fn blank_rows_are_skipped() {
    let layout = SheetLayout {
        blank_before: vec![2, 4],
        ..SheetLayout::default()
    };
    let (_dir, source) = fixture(&layout, &sample_rows());

    let table = load_workbook(&source).unwrap();
    assert_eq!(table.len(), 6);
    assert_eq!(table.rows()[2].product_line, "Home and lifestyle");
}

#[test]
fn header_only_sheet_loads_empty() {
    let (_dir, source) = fixture(&SheetLayout::default(), &[]);
    let table = load_workbook(&source).unwrap();
    assert!(table.is_empty());
    assert!(table.options().values(Dimension::City).is_empty());
}

#[test]
fn loading_twice_gives_identical_tables() {
    let rows = vec![
        sale("Yangon", "Member", "Female", "Ewallet", "Food and beverages", 548.97, 9.1, 26.14, "13:08:00"),
        sale("Mandalay", "Normal", "Male", "Cash", "Fashion accessories", 80.22, 9.6, 3.82, "10:29:00"),
    ];
    let (_dir, source) = fixture(&SheetLayout::default(), &rows);

    let first = load_workbook(&source).unwrap();
    let second = load_workbook(&source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cache_reads_the_workbook_once() {
    let (dir, source) = sample_fixture();
    let path = source.path.clone();
    let cache = TableCache::new(WorkbookSource::new(source));

    assert!(!cache.is_warm());
    let cold = cache.get().unwrap();
    assert!(cache.is_warm());

    // the file is gone but the warm path never touches it
    std::fs::remove_file(&path).unwrap();
    let warm = cache.get().unwrap();
    assert!(std::sync::Arc::ptr_eq(&cold, &warm));

    cache.invalidate();
    assert!(matches!(cache.get(), Err(LoadError::FileNotFound(_))));
    drop(dir);
}
