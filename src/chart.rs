use serde::Serialize;

use crate::color::ColorMap;
use crate::hierarchy::{HierarchyTree, Node};

// ---------------------------------------------------------------------------
// ChartData – flat sunburst/treemap feed
// ---------------------------------------------------------------------------

/// The hierarchy flattened into the parallel arrays a sunburst or treemap
/// renderer consumes: one entry per node, parents referenced by id. Ids are
/// the `/`-joined path from the root, so they are unique even when two
/// branches share a segment label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartData {
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    /// `#rrggbb` per node; empty when no coloring was requested.
    pub colors: Vec<String>,
}

impl ChartData {
    /// Flatten a tree without coloring.
    pub fn from_tree(tree: &HierarchyTree) -> Self {
        Self::build(tree, None)
    }

    /// Flatten a tree, coloring each node by its ancestor segment at grouping
    /// depth `depth` (0 = the top level). Nodes above that depth take the
    /// map's default color; nodes at or below it inherit the segment's color.
    pub fn from_tree_colored(tree: &HierarchyTree, color_map: &ColorMap, depth: usize) -> Self {
        Self::build(tree, Some((color_map, depth)))
    }

    fn build(tree: &HierarchyTree, coloring: Option<(&ColorMap, usize)>) -> Self {
        let mut data = ChartData::default();
        let mut path = Vec::new();
        flatten(&tree.root, &mut path, "", coloring, None, &mut data);
        data
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn flatten(
    node: &Node,
    path: &mut Vec<String>,
    parent_id: &str,
    coloring: Option<(&ColorMap, usize)>,
    inherited: Option<String>,
    out: &mut ChartData,
) {
    for (segment, child) in &node.children {
        path.push(segment.clone());
        let id = path.join("/");

        let color = match (&coloring, &inherited) {
            (Some((map, depth)), _) if path.len() == depth + 1 => {
                Some(map.color_for(segment).to_hex())
            }
            (Some(_), Some(c)) => Some(c.clone()),
            // Above the coloring depth there is no category yet; use the
            // map's fallback, not a lookup of the empty string (which can be
            // a real category when the column has missing values).
            (Some((map, _)), None) => Some(map.default_color().to_hex()),
            (None, _) => None,
        };

        out.ids.push(id.clone());
        out.labels.push(segment.clone());
        out.parents.push(parent_id.to_string());
        if let Some(c) = &color {
            out.colors.push(c.clone());
        }

        // Children below the color depth keep their ancestor's color.
        let next_inherited = match (&coloring, &color) {
            (Some((_, depth)), Some(c)) if path.len() >= depth + 1 => Some(c.clone()),
            _ => inherited.clone(),
        };
        flatten(child, path, &id, coloring, next_inherited, out);
        path.pop();
    }
}
