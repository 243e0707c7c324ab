//! Data layer: catalog, loading, summary statistics and filtering.
//!
//! Architecture:
//! ```text
//!   data/ directory
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ catalog  │  list *.csv / *.json / *.parquet names
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Table   │  typed columns, rows in file order
//!   └──────────┘
//!     │        │          │
//!     ▼        ▼          ▼
//!  summary   filter     pivot
//! (describe) (range)   (grid for contour / heatmap)
//! ```

pub mod catalog;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pivot;
pub mod summary;
