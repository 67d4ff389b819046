//! FILENAME: core/persistence/tests/workbook_io.rs
//! Upload parsing, caching, configuration files and export, end to end.

use persistence::{
    load_config, load_dataset, load_dataset_cached, load_dataset_from_path, load_table_from_bytes,
    save_config, save_xlsx, save_xlsx_to_buffer, ExportSheet, PersistenceError, TableCache,
    DEFAULT_CACHE_CAPACITY, DEFAULT_SKIP_ROWS,
};
use pivot_engine::{count_by, AggregationSpec, PivotCalculator};
use records::{CellValue, EngineError, Field, PlanCost};
use rust_xlsxwriter::Workbook;

enum Cell<'a> {
    T(&'a str),
    N(f64),
    Blank,
}

/// Builds an export the way the registrar report lays it out: a title line,
/// a run-date line, then the header and data.
fn report_bytes(headers: &[&str], rows: &[Vec<Cell<'_>>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Graduate Enrollment Report").unwrap();
    sheet.write_string(1, 0, "Run date: 2023-09-15").unwrap();

    for (c, header) in headers.iter().enumerate() {
        sheet.write_string(2, c as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let excel_row = (r + 3) as u32;
        for (c, cell) in row.iter().enumerate() {
            match cell {
                Cell::T(s) => {
                    sheet.write_string(excel_row, c as u16, *s).unwrap();
                }
                Cell::N(n) => {
                    sheet.write_number(excel_row, c as u16, *n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

const HEADERS: [&str; 6] = [
    "Academic Plan",
    "Academic Plan Description",
    "Admit Term",
    "Visa Type",
    "Enrolled Credits",
    "STFACT_TOT_CUMULATIVE",
];

fn sample_rows() -> Vec<Vec<Cell<'static>>> {
    use Cell::*;
    vec![
        vec![T("MBA1"), T("Master of Business Administration"), T("Fall 2022"), T("F1"), N(9.0), N(12.0)],
        vec![T("CS1"), T("MS Computer Science"), T("Spring 2023"), Blank, N(6.0), N(0.0)],
        vec![Blank, Blank, Blank, Blank, Blank, Blank],
        vec![T("CS1"), T("MS Computer Science"), T("Fall 2022"), T("H1B"), N(3.0), N(27.0)],
    ]
}

#[test]
fn test_load_dataset_skips_banner_rows() {
    let bytes = report_bytes(&HEADERS, &sample_rows());
    let dataset = load_dataset(&bytes, DEFAULT_SKIP_ROWS).unwrap();

    // the fully blank row is dropped
    assert_eq!(dataset.len(), 3);
    assert!(dataset.schema.contains(Field::StudentType));
    assert!(dataset.schema.contains(Field::CumulativeCredits));

    let first = &dataset.records[0];
    assert_eq!(first.plan_code.as_deref(), Some("MBA1"));
    assert_eq!(first.admit_term.as_deref(), Some("Fall 2022"));
    assert_eq!(first.enrolled_credits, Some(9.0));
    assert_eq!(first.visa_type.as_deref(), Some("F1"));
    assert_eq!(dataset.records[1].visa_type, None);
}

#[test]
fn test_skip_rows_counts_from_sheet_top() {
    // No banner text: rows 1-2 are empty, header still on row 3
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(2, 0, "Academic Plan").unwrap();
    sheet.write_string(2, 1, "Academic Plan Description").unwrap();
    sheet.write_string(3, 0, "CS1").unwrap();
    sheet.write_string(3, 1, "MS Computer Science").unwrap();
    let bytes = workbook.save_to_buffer().unwrap();

    let table = load_table_from_bytes(&bytes, 2).unwrap();
    assert_eq!(table.headers, vec!["Academic Plan", "Academic Plan Description"]);
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.get(0, 1), &CellValue::Text("MS Computer Science".to_string()));
}

#[test]
fn test_missing_required_column() {
    let bytes = report_bytes(
        &["Academic Plan", "Admit Term"],
        &[vec![Cell::T("CS1"), Cell::T("Fall 2022")]],
    );
    let err = load_dataset(&bytes, DEFAULT_SKIP_ROWS).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::Engine(EngineError::MissingColumn(ref c)) if c == "Academic Plan Description"
    ));
}

#[test]
fn test_wrong_skip_rows_reports_missing_column() {
    let bytes = report_bytes(&HEADERS, &sample_rows());
    // header taken from the title line
    let err = load_dataset(&bytes, 0).unwrap_err();
    assert!(matches!(err, PersistenceError::Engine(EngineError::MissingColumn(_))));
}

#[test]
fn test_cache_reuses_parsed_upload() {
    let bytes = report_bytes(&HEADERS, &sample_rows());
    let mut cache = TableCache::new();

    let first = load_dataset_cached(&mut cache, &bytes, DEFAULT_SKIP_ROWS).unwrap();
    let second = load_dataset_cached(&mut cache, &bytes, DEFAULT_SKIP_ROWS).unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 1);

    // a different skip count is a different parse
    assert!(!cache.contains(&bytes, 0));
    let _ = cache.load(&bytes, 0).unwrap();
    assert_eq!(cache.len(), 2);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_cache_evicts_oldest_upload_at_capacity() {
    let uploads: Vec<Vec<u8>> = ["CS1", "DS1", "MBA1"]
        .iter()
        .map(|code| {
            report_bytes(
                &["Academic Plan", "Academic Plan Description"],
                &[vec![Cell::T(*code), Cell::T("MS Computer Science")]],
            )
        })
        .collect();

    let mut cache = TableCache::with_capacity(2);
    for upload in &uploads {
        cache.load(upload, DEFAULT_SKIP_ROWS).unwrap();
    }

    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&uploads[0], DEFAULT_SKIP_ROWS));
    assert!(cache.contains(&uploads[1], DEFAULT_SKIP_ROWS));
    assert!(cache.contains(&uploads[2], DEFAULT_SKIP_ROWS));

    // the evicted upload parses again
    cache.load(&uploads[0], DEFAULT_SKIP_ROWS).unwrap();
    assert_eq!(cache.misses(), 4);
    assert_eq!(cache.len(), 2);
    assert!(!cache.contains(&uploads[1], DEFAULT_SKIP_ROWS));
    assert_eq!(TableCache::new().capacity(), DEFAULT_CACHE_CAPACITY);
}

#[test]
fn test_load_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enrollment.xlsx");
    std::fs::write(&path, report_bytes(&HEADERS, &sample_rows())).unwrap();

    let dataset = load_dataset_from_path(&path, DEFAULT_SKIP_ROWS).unwrap();
    assert_eq!(dataset.len(), 3);
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "preferred_defaults": ["MS Computer Science"],
            "costs": {
                "plans": { "MS Computer Science": { "cost_per_credit": 1300.0, "credits_required": 32.0 } },
                "fallback_cost": 900.0
            }
        }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.preferred_defaults, vec!["MS Computer Science".to_string()]);
    assert_eq!(
        config.costs.lookup(Some("MS Computer Science")),
        PlanCost::new(1300.0, 32.0)
    );
    assert_eq!(config.fallback_cost(), 900.0);
    // omitted key keeps its default
    assert_eq!(config.fallback_required_credits(), 30.0);

    let copy = dir.path().join("copy.json");
    save_config(&config, &copy).unwrap();
    assert_eq!(load_config(&copy).unwrap(), config);
}

#[test]
fn test_bad_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_config(&path), Err(PersistenceError::Config(_))));

    let missing = dir.path().join("absent.json");
    assert!(matches!(load_config(&missing), Err(PersistenceError::Io(_))));
}

#[test]
fn test_export_pivot_and_summary() {
    let bytes = report_bytes(&HEADERS, &sample_rows());
    let dataset = load_dataset(&bytes, DEFAULT_SKIP_ROWS).unwrap();

    let spec = AggregationSpec::count("Admit Term", "Academic Plan Description");
    let pivot = PivotCalculator::new(&dataset.records, &dataset.schema, &spec)
        .unwrap()
        .calculate();
    let by_plan = count_by(&dataset.records, &dataset.schema, "Academic Plan Description").unwrap();

    let exported = save_xlsx_to_buffer(&[
        ExportSheet::Pivot { name: "Term x Plan", result: &pivot },
        ExportSheet::Summary { name: "By Plan", summary: &by_plan },
    ])
    .unwrap();

    // first sheet: header row, one row per term, a totals row
    let sheet = load_table_from_bytes(&exported, 0).unwrap();
    assert_eq!(
        sheet.headers,
        vec![
            "Admit Term / Academic Plan Description",
            "MS Computer Science",
            "Master of Business Administration",
            "Total",
        ]
    );
    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.get(0, 0), &CellValue::Text("Fall 2022".to_string()));
    assert_eq!(sheet.get(0, 1), &CellValue::Number(1.0));
    assert_eq!(sheet.get(0, 3), &CellValue::Number(2.0));
    assert_eq!(sheet.get(1, 0), &CellValue::Text("Spring 2023".to_string()));
    assert_eq!(sheet.get(1, 1), &CellValue::Number(1.0));
    assert_eq!(sheet.get(1, 2), &CellValue::Number(0.0));
    assert_eq!(sheet.get(2, 0), &CellValue::Text("Total".to_string()));
    assert_eq!(sheet.get(2, 3), &CellValue::Number(3.0));
}

#[test]
fn test_export_to_file() {
    let bytes = report_bytes(&HEADERS, &sample_rows());
    let dataset = load_dataset(&bytes, DEFAULT_SKIP_ROWS).unwrap();
    let by_plan = count_by(&dataset.records, &dataset.schema, "Academic Plan Description").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.xlsx");
    save_xlsx(&[ExportSheet::Summary { name: "By Plan", summary: &by_plan }], &path).unwrap();

    let sheet = persistence::load_table(&path, 0).unwrap();
    assert_eq!(sheet.headers, vec!["Academic Plan Description", "Count"]);
    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.get(2, 1), &CellValue::Number(3.0));
}
