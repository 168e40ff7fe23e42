//! In-memory table engine.
//!
//! Turns a record set plus a column model, a global filter query, sort keys and a
//! page window into the rows a rendering layer should draw:
//! records → filter → sort → paginate → [`DerivedView`].
//!
//! ```
//! use datatable::{Column, ColumnModel, Record, TableEngine};
//!
//! let records = vec![
//!     Record::new().with("id", 1).with("name", "Bob"),
//!     Record::new().with("id", 2).with("name", "Ann"),
//! ];
//! let columns = ColumnModel::new(vec![Column::new("id"), Column::new("name")]).unwrap();
//! let mut table = TableEngine::new(records, columns).unwrap();
//!
//! let view = table.toggle_sort("name").unwrap();
//! let names: Vec<String> = view.records().map(|r| r.value("name").to_string()).collect();
//! assert_eq!(names, ["Ann", "Bob"]);
//! ```

pub mod action;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod logging;
pub mod services;

// Re-export commonly used types
pub use action::TableAction;
pub use config::TableConfig;
pub use crate::core::{
    Column, ColumnModel, DerivedView, PaginationState, Record, SortDirection, SortKey, SortingFn,
    Value, ViewRow, records_from_json_str, records_from_reader,
};
pub use engine::{TableEngine, TableState};
pub use error::{Result, TableError};
pub use services::{FilterOptions, SearchMode};
