use std::path::Path;

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, Criterion};
use crate::data::model::{columns, CellValue, RosterTable};
use crate::hierarchy::{build_org_hierarchy, EmployeeLabeler, HierarchyTree};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Per-session context passed to the pipeline, independent of any UI.
/// Two logical states only: no data loaded / data loaded. Filters are pure
/// functions of the loaded table; every change refilters from scratch.
#[derive(Default)]
pub struct SessionState {
    /// Loaded table (None until a file is loaded).
    pub table: Option<RosterTable>,

    /// Active filter criteria, at most one per column.
    pub criteria: Vec<Criterion>,

    /// Indices of rows passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Which categorical column drives chart coloring.
    pub color_column: Option<String>,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    /// Load error message for the host UI; None while healthy. An empty
    /// filter result is NOT an error and never sets this.
    pub status_message: Option<String>,
}

impl SessionState {
    /// Load a worksheet into the session. On failure the error is recorded
    /// in `status_message` and the previous state is cleared, so the caller
    /// renders the empty/default view instead of crashing.
    pub fn load(&mut self, path: &Path, sheet: &str) {
        match crate::data::loader::load_file(path, sheet) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("failed to load roster: {e}");
                *self = SessionState::default();
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Ingest a loaded table, reset criteria, pick a default color column.
    pub fn set_table(&mut self, table: RosterTable) {
        self.criteria.clear();
        self.visible_indices = (0..table.len()).collect();

        // Attendance is the canonical coloring when the workbook carries it;
        // otherwise fall back to first-appearance colors on the first column.
        if table.has_values(columns::ATTENDANCE) {
            self.color_column = Some(columns::ATTENDANCE.to_string());
            self.color_map = Some(ColorMap::attendance());
        } else {
            self.color_column = table.column_names.first().cloned();
            self.rebuild_color_map(&table);
        }

        self.table = Some(table);
        self.status_message = None;
    }

    /// Whether a table is loaded (the only other state is "no data").
    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// Rebuild the colour map from the current `color_column`.
    pub fn rebuild_color_map(&mut self, table: &RosterTable) {
        self.color_map = self.color_column.as_ref().map(|col| {
            if col == columns::ATTENDANCE {
                return ColorMap::attendance();
            }
            let in_order: Vec<String> = table
                .records
                .iter()
                .map(|rec| crate::data::model::cell(rec, col).to_string())
                .collect();
            ColorMap::by_appearance(col, in_order.iter().map(String::as_str))
        });
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = Some(col);
        if let Some(table) = self.table.take() {
            self.rebuild_color_map(&table);
            self.table = Some(table);
        }
    }

    /// Recompute `visible_indices` after a criteria change, always against
    /// the original unfiltered table.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.criteria);
        }
    }

    /// Install or replace the criterion for its column, then refilter.
    pub fn set_criterion(&mut self, criterion: Criterion) {
        self.criteria.retain(|c| c.column() != criterion.column());
        self.criteria.push(criterion);
        self.refilter();
    }

    /// Drop the criterion on `column`, then refilter.
    pub fn clear_criterion(&mut self, column: &str) {
        self.criteria.retain(|c| c.column() != column);
        self.refilter();
    }

    /// Drop all criteria.
    pub fn clear_criteria(&mut self) {
        self.criteria.clear();
        self.refilter();
    }

    /// Materialize the current filtered view for display or export.
    /// May be empty ("no rows matched"), which is a valid terminal state.
    pub fn filtered_table(&self) -> Option<RosterTable> {
        self.table.as_ref().map(|t| t.select(&self.visible_indices))
    }

    /// Build the organizational tree over the current filtered view with the
    /// standard grouping and leaf label.
    pub fn hierarchy(&self) -> Option<HierarchyTree> {
        let filtered = self.filtered_table()?;
        Some(build_org_hierarchy(&filtered, &EmployeeLabeler::default()))
    }

    /// Convenience for multi-select widgets: the distinct values of a column.
    pub fn options_for(&self, column: &str) -> Vec<CellValue> {
        self.table
            .as_ref()
            .and_then(|t| t.unique_values.get(column))
            .map(|vals| vals.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeSet;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn row(company: &str, name: &str, attendance: &str) -> Record {
        [
            (columns::COMPANY.to_string(), s(company)),
            (columns::EMPLOYEE_NAME.to_string(), s(name)),
            (columns::ATTENDANCE.to_string(), s(attendance)),
        ]
        .into_iter()
        .collect()
    }

    fn sample() -> RosterTable {
        RosterTable::from_records(
            vec![
                row("Acme", "John", "PRESENT"),
                row("Acme", "Amy", "ABSENT"),
                row("Globex", "Mary", "PRESENT"),
            ],
            vec![
                columns::COMPANY.into(),
                columns::EMPLOYEE_NAME.into(),
                columns::ATTENDANCE.into(),
            ],
        )
    }

    #[test]
    fn set_table_defaults_to_attendance_coloring() {
        let mut state = SessionState::default();
        state.set_table(sample());
        assert!(state.is_loaded());
        assert_eq!(state.color_column.as_deref(), Some(columns::ATTENDANCE));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn set_criterion_replaces_per_column() {
        let mut state = SessionState::default();
        state.set_table(sample());

        state.set_criterion(Criterion::OneOf {
            column: columns::COMPANY.into(),
            selected: [s("Acme")].into_iter().collect(),
        });
        assert_eq!(state.visible_indices, vec![0, 1]);

        // Replacing rather than stacking.
        state.set_criterion(Criterion::OneOf {
            column: columns::COMPANY.into(),
            selected: [s("Globex")].into_iter().collect(),
        });
        assert_eq!(state.criteria.len(), 1);
        assert_eq!(state.visible_indices, vec![2]);

        state.clear_criterion(columns::COMPANY);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_match_is_valid_and_not_an_error() {
        let mut state = SessionState::default();
        state.set_table(sample());
        state.set_criterion(Criterion::TextContains {
            column: columns::EMPLOYEE_NAME.into(),
            query: "zz".into(),
        });
        assert!(state.visible_indices.is_empty());
        assert!(state.status_message.is_none());
        assert_eq!(state.filtered_table().map(|t| t.len()), Some(0));
    }

    #[test]
    fn load_failure_resets_to_default_view() {
        let mut state = SessionState::default();
        state.set_table(sample());
        state.load(Path::new("/nonexistent/roster.xlsx"), "09-09");
        assert!(!state.is_loaded());
        assert!(state.status_message.is_some());
        assert!(state.filtered_table().is_none());
    }

    #[test]
    fn hierarchy_follows_the_filtered_view() {
        let mut state = SessionState::default();
        state.set_table(sample());
        state.set_criterion(Criterion::OneOf {
            column: columns::COMPANY.into(),
            selected: [s("Acme")].into_iter().collect(),
        });

        let tree = state.hierarchy().unwrap();
        // Root fans out to exactly one company.
        assert_eq!(tree.root.children.len(), 1);
        assert!(tree.root.children.contains_key("Acme"));
    }

    #[test]
    fn options_come_from_the_unfiltered_table() {
        let mut state = SessionState::default();
        state.set_table(sample());
        state.set_criterion(Criterion::OneOf {
            column: columns::COMPANY.into(),
            selected: [s("Acme")].into_iter().collect(),
        });
        let opts: BTreeSet<String> = state
            .options_for(columns::COMPANY)
            .into_iter()
            .map(|v| v.to_string())
            .collect();
        assert!(opts.contains("Globex"));
    }
}
