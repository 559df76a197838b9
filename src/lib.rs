//! Roster filter-and-hierarchy core for employee dashboards.
//!
//! Loads one named worksheet from a roster workbook into a [`data::model::RosterTable`],
//! applies independent conjunctive [`data::filter::Criterion`]s, and projects
//! the surviving rows into a [`hierarchy::HierarchyTree`] (company → project →
//! lead → supervisor → leader → employee) plus a flat [`chart::ChartData`]
//! artifact for a sunburst/treemap renderer. The filtered rows export as CSV
//! or a single-sheet workbook.
//!
//! Widget rendering and page layout belong to the host UI; this crate is the
//! piece it calls into, with [`state::SessionState`] as the per-session
//! context.

pub mod chart;
pub mod color;
pub mod data;
pub mod export;
pub mod hierarchy;
pub mod state;
