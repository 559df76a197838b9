//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv
//!       │
//!       ▼
//!  ┌──────────┐
//!  │  loader   │  parse one worksheet → RosterTable
//!  └──────────┘
//!       │
//!       ▼
//!  ┌─────────────┐
//!  │ RosterTable  │  Vec<Record>, column index
//!  └─────────────┘
//!       │
//!       ▼
//!  ┌──────────┐
//!  │  filter   │  apply criteria → filtered rows
//!  └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
