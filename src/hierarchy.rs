use std::collections::BTreeMap;

use crate::data::model::{cell, columns, Record, RosterTable};

// ---------------------------------------------------------------------------
// Leaf labeling
// ---------------------------------------------------------------------------

/// Formats the leaf node text for one row.
///
/// Implementations declare the extra columns they read so deduplication can
/// include them alongside the grouping columns. Formatting must not fail on
/// missing sub-fields; absent cells read as empty strings.
pub trait Labeler {
    /// Columns the formatter reads beyond the grouping columns.
    fn columns(&self) -> &[String];

    fn label(&self, record: &Record) -> String;
}

/// Composes the employee name with role, id, and attendance status:
/// `"John (Welder, 1042, PRESENT)"`. Missing sub-fields drop out of the
/// parenthesis; an employee with none renders as the bare name.
#[derive(Debug, Clone)]
pub struct EmployeeLabeler {
    detail_columns: Vec<String>,
}

impl Default for EmployeeLabeler {
    fn default() -> Self {
        Self {
            detail_columns: vec![
                columns::COMMON_FUNCTION.to_string(),
                columns::EMPLOYEE_ID.to_string(),
                columns::ATTENDANCE.to_string(),
            ],
        }
    }
}

impl EmployeeLabeler {
    /// Use a custom set of detail columns, in display order.
    pub fn with_details(detail_columns: Vec<String>) -> Self {
        Self { detail_columns }
    }
}

impl Labeler for EmployeeLabeler {
    fn columns(&self) -> &[String] {
        &self.detail_columns
    }

    fn label(&self, record: &Record) -> String {
        let name = cell(record, columns::EMPLOYEE_NAME).to_string();
        let details: Vec<String> = self
            .detail_columns
            .iter()
            .map(|col| cell(record, col).to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if details.is_empty() {
            name
        } else {
            format!("{name} ({})", details.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Hierarchy tree
// ---------------------------------------------------------------------------

/// One level of the organizational tree. Children are keyed by segment text,
/// so identical paths from different rows collapse into one node and the
/// shape is independent of row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub children: BTreeMap<String, Node>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The full tree: an unnamed root whose children are the top grouping level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyTree {
    pub root: Node,
    /// The grouping columns the intermediate levels were built from.
    pub levels: Vec<String>,
}

impl HierarchyTree {
    /// Every root-to-leaf path, sorted. One path per unique combination of
    /// grouping values + leaf label.
    pub fn leaf_paths(&self) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        collect_paths(&self.root, &mut stack, &mut out);
        out
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_paths().len()
    }
}

fn collect_paths(node: &Node, stack: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    if node.is_leaf() && !stack.is_empty() {
        out.push(stack.clone());
        return;
    }
    for (segment, child) in &node.children {
        stack.push(segment.clone());
        collect_paths(child, stack, out);
        stack.pop();
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Build the organizational tree from a (typically already filtered) table.
///
/// Each row contributes one root-to-leaf path: the last grouping column is
/// replaced by the labeler's leaf text, the rest become intermediate segments
/// verbatim. Rows identical on the grouping columns plus the labeler's
/// columns map to the same path, which is the deduplication the chart needs —
/// without it every employee would repeat once per upstream fan-out row.
pub fn build_hierarchy(
    table: &RosterTable,
    grouping_columns: &[&str],
    labeler: &dyn Labeler,
) -> HierarchyTree {
    let mut root = Node::default();

    // The last grouping column is rendered by the labeler, not verbatim.
    let Some((_, intermediate)) = grouping_columns.split_last() else {
        return HierarchyTree::default();
    };

    for record in &table.records {
        let mut node = &mut root;
        for col in intermediate {
            let segment = cell(record, col).to_string();
            node = node.children.entry(segment).or_default();
        }
        // Leaf text carries the labeler's detail columns, so differing
        // details under the same parent stay distinct.
        let leaf = labeler.label(record);
        node.children.entry(leaf).or_default();
    }

    HierarchyTree {
        root,
        levels: grouping_columns.iter().map(|c| c.to_string()).collect(),
    }
}

/// [`build_hierarchy`] over the standard company → employee grouping.
pub fn build_org_hierarchy(table: &RosterTable, labeler: &dyn Labeler) -> HierarchyTree {
    build_hierarchy(table, &columns::GROUPING, labeler)
}
