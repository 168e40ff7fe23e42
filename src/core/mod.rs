pub mod column;
pub mod models;
pub mod types;

pub use column::{Accessor, Column, ColumnModel, SortingFn};
pub use models::*;
pub use types::*;
