use std::collections::BTreeSet;

use super::model::{cell, CellValue, Record, RosterTable};

// ---------------------------------------------------------------------------
// Filter criteria: one named predicate per column
// ---------------------------------------------------------------------------

/// A single filter over one column. Criteria are independent and conjunctive;
/// applying them in any order yields the same rows.
///
/// Any criterion over a column that is absent from the table, or whose values
/// are entirely missing, is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Case-insensitive substring match for free-text columns.
    /// An empty query matches everything.
    TextContains { column: String, query: String },

    /// Set membership for multi-select categorical columns.
    /// An empty selection means "no constraint" (a cleared multi-select),
    /// not "hide everything".
    OneOf {
        column: String,
        selected: BTreeSet<CellValue>,
    },

    /// Inclusive numeric range over the employee id column.
    ///
    /// Activating this criterion coerces the column to numeric; rows whose
    /// value cannot be parsed are treated as missing and dropped from the
    /// result entirely. That narrowing only happens when an `IdRange` is
    /// actually supplied.
    IdRange { column: String, min: f64, max: f64 },
}

impl Criterion {
    /// The column this criterion reads.
    pub fn column(&self) -> &str {
        match self {
            Criterion::TextContains { column, .. }
            | Criterion::OneOf { column, .. }
            | Criterion::IdRange { column, .. } => column,
        }
    }

    /// Whether this criterion constrains anything at all on `table`.
    fn is_active(&self, table: &RosterTable) -> bool {
        if !table.has_values(self.column()) {
            return false;
        }
        match self {
            Criterion::TextContains { query, .. } => !query.trim().is_empty(),
            Criterion::OneOf { selected, .. } => !selected.is_empty(),
            Criterion::IdRange { .. } => true,
        }
    }

    fn matches(&self, record: &Record) -> bool {
        match self {
            Criterion::TextContains { column, query } => {
                let haystack = cell(record, column).to_string().to_lowercase();
                haystack.contains(&query.trim().to_lowercase())
            }
            Criterion::OneOf { column, selected } => selected.contains(cell(record, column)),
            Criterion::IdRange { column, min, max } => match cell(record, column).to_numeric() {
                Some(v) => *min <= v && v <= *max,
                None => false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Return indices of rows that pass all active criteria, recomputed from
/// scratch against the original table on every call.
pub fn filtered_indices(table: &RosterTable, criteria: &[Criterion]) -> Vec<usize> {
    let active: Vec<&Criterion> = criteria
        .iter()
        .filter(|c| c.is_active(table))
        .collect();

    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| active.iter().all(|c| c.matches(rec)))
        .map(|(i, _)| i)
        .collect()
}

/// Materialize the filtered view as a new table with the same schema.
/// Identity on empty criteria; idempotent. An empty result is a valid
/// outcome ("no rows matched"), not an error.
pub fn apply_filters(table: &RosterTable, criteria: &[Criterion]) -> RosterTable {
    table.select(&filtered_indices(table, criteria))
}
