use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column header contract
// ---------------------------------------------------------------------------

/// Column names as they appear in the roster worksheet header row.
/// Presence of each optional column is gated before use; see
/// [`RosterTable::available_fields`].
pub mod columns {
    pub const COMPANY: &str = "COMPANY";
    pub const PROJECT: &str = "PROJECT";
    pub const LEAD: &str = "LEAD";
    pub const SUPERVISOR: &str = "INCHARGE SUPERVISOR";
    pub const LEADER: &str = "LEADER";
    pub const EMPLOYEE_NAME: &str = "EMPLOYEE NAME";
    pub const EMPLOYEE_ID: &str = "EMPLOYEE ID";
    pub const COMMON_FUNCTION: &str = "COMMON FUNCTION";
    pub const FUNCTION: &str = "FUNCTION";
    pub const SHIFT: &str = "SHIFT";
    /// Spelled as in the source workbooks.
    pub const ATTENDANCE: &str = "DAILY ATTENDENCE";

    /// Hierarchy levels in display order, company down to employee.
    pub const GROUPING: [&str; 6] = [
        COMPANY,
        PROJECT,
        LEAD,
        SUPERVISOR,
        LEADER,
        EMPLOYEE_NAME,
    ];

    /// Columns that may be absent from a given workbook revision.
    pub const OPTIONAL: [&str; 5] = [EMPLOYEE_ID, COMMON_FUNCTION, FUNCTION, SHIFT, ATTENDANCE];
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the roster table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common spreadsheet dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Export text. `Null` renders as the empty string so it never leaks a
/// placeholder into CSV cells or node labels.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Coerce to a number for range filtering. Numeric strings parse;
    /// everything else is treated as missing.
    pub fn to_numeric(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the roster sheet
// ---------------------------------------------------------------------------

/// One (employee, project-assignment) fact: column name → cell.
pub type Record = BTreeMap<String, CellValue>;

/// The cell at `column`, with absent and null both reading as `Null`.
pub fn cell<'a>(record: &'a Record, column: &str) -> &'a CellValue {
    record.get(column).unwrap_or(&CellValue::Null)
}

// ---------------------------------------------------------------------------
// RosterTable – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed sheet with pre-computed column indices. Read-only once
/// loaded; filters always recompute against this original table.
#[derive(Debug, Clone)]
pub struct RosterTable {
    /// All rows, in sheet order.
    pub records: Vec<Record>,
    /// Column names in header order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl RosterTable {
    /// Build column indices from the loaded rows. `column_names` keeps the
    /// header order; rows may omit columns (treated as null).
    pub fn from_records(records: Vec<Record>, column_names: Vec<String>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in rec {
                if !val.is_null() {
                    unique_values
                        .entry(col.clone())
                        .or_default()
                        .insert(val.clone());
                }
            }
        }
        RosterTable {
            records,
            column_names,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Schema-capability check: the column exists and is not entirely missing.
    pub fn has_values(&self, column: &str) -> bool {
        self.unique_values
            .get(column)
            .is_some_and(|vals| !vals.is_empty())
    }

    /// The optional header-contract columns this workbook actually carries,
    /// computed from the load-time column index.
    pub fn available_fields(&self) -> BTreeSet<&'static str> {
        columns::OPTIONAL
            .iter()
            .copied()
            .filter(|col| self.has_values(col))
            .collect()
    }

    /// A new table containing the rows at `indices`, same schema.
    pub fn select(&self, indices: &[usize]) -> RosterTable {
        let records = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        RosterTable::from_records(records, self.column_names.clone())
    }
}
