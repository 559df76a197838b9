//! Full pipeline: workbook on disk → loader → filters → hierarchy → exports.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use rust_xlsxwriter::Workbook;

use rosterview::data::filter::{apply_filters, Criterion};
use rosterview::data::loader::load_file;
use rosterview::data::model::{columns, CellValue};
use rosterview::export::to_csv_string;
use rosterview::hierarchy::{build_org_hierarchy, EmployeeLabeler};
use rosterview::state::SessionState;

const SHEET: &str = "09-09";

/// Capture the loader/export log lines when running with RUST_LOG set.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Five rows across two companies, with a duplicated hierarchy path and one
/// unparseable employee id.
fn write_fixture(dir: &tempfile::TempDir) -> Result<PathBuf> {
    init_logging();
    let header = [
        columns::COMPANY,
        columns::PROJECT,
        columns::LEAD,
        columns::SUPERVISOR,
        columns::LEADER,
        columns::EMPLOYEE_NAME,
        columns::EMPLOYEE_ID,
        columns::ATTENDANCE,
    ];
    let rows = [
        ["Acme", "P1", "L1", "S1", "T1", "John", "10", "PRESENT"],
        ["Acme", "P1", "L1", "S1", "T1", "Jojo", "20", "ABSENT"],
        // Duplicate of the first row, as sheet fan-out produces.
        ["Acme", "P1", "L1", "S1", "T1", "John", "10", "PRESENT"],
        ["Globex", "P2", "L2", "S2", "T2", "Amy", "bad", "PRESENT"],
        ["Globex", "P2", "L2", "S2", "T2", "Mary", "30", "LOANED"],
    ];

    let path = dir.path().join("roster.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET)?;
    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (row, cells) in rows.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            sheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }
    workbook.save(&path)?;
    Ok(path)
}

#[test]
fn acme_filter_yields_one_company_subtree_and_matching_csv() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir)?;

    let table = load_file(&path, SHEET)?;
    assert_eq!(table.len(), 5);

    let criteria = vec![Criterion::OneOf {
        column: columns::COMPANY.into(),
        selected: [CellValue::String("Acme".into())].into_iter().collect(),
    }];
    let filtered = apply_filters(&table, &criteria);
    assert_eq!(filtered.len(), 3);

    // The tree has exactly one top-level child, and the duplicated John row
    // collapsed into a single leaf.
    let tree = build_org_hierarchy(&filtered, &EmployeeLabeler::default());
    assert_eq!(tree.root.children.len(), 1);
    assert!(tree.root.children.contains_key("Acme"));
    assert_eq!(tree.leaf_count(), 2);

    // CSV export: matching row count plus one header line.
    let csv = to_csv_string(&filtered)?;
    assert_eq!(csv.lines().count(), filtered.len() + 1);
    Ok(())
}

#[test]
fn id_range_excludes_low_and_unparseable_ids() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir)?;
    let table = load_file(&path, SHEET)?;

    let criteria = vec![Criterion::IdRange {
        column: columns::EMPLOYEE_ID.into(),
        min: 15.0,
        max: 30.0,
    }];
    let filtered = apply_filters(&table, &criteria);

    let names: BTreeSet<String> = filtered
        .records
        .iter()
        .map(|r| rosterview::data::model::cell(r, columns::EMPLOYEE_NAME).to_string())
        .collect();
    // John (10, twice) is below range; Amy's id does not parse.
    assert_eq!(
        names,
        ["Jojo".to_string(), "Mary".to_string()].into_iter().collect()
    );
    Ok(())
}

#[test]
fn session_drives_the_same_pipeline() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir)?;

    let mut session = SessionState::default();
    session.load(&path, SHEET);
    assert!(session.is_loaded());
    assert!(session.status_message.is_none());
    // Attendance column present, so it drives coloring.
    assert_eq!(
        session.color_column.as_deref(),
        Some(columns::ATTENDANCE)
    );

    session.set_criterion(Criterion::TextContains {
        column: columns::EMPLOYEE_NAME.into(),
        query: "jo".into(),
    });
    // John appears twice in the sheet plus Jojo.
    assert_eq!(session.visible_indices.len(), 3);

    let tree = session.hierarchy().expect("loaded session builds a tree");
    assert_eq!(tree.leaf_count(), 2);
    Ok(())
}

#[test]
fn wrong_sheet_name_degrades_to_default_state() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_fixture(&dir)?;

    let mut session = SessionState::default();
    session.load(&path, "10-10");
    assert!(!session.is_loaded());
    assert!(session.status_message.is_some());
    assert!(session.hierarchy().is_none());
    Ok(())
}
