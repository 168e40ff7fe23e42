use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum::{Display, EnumString};

use crate::core::column::ColumnModel;
use crate::core::types::{Record, Value};

/// Sort direction for one sort key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A single (column, direction) pair. A sequence of keys is the sort state;
/// the first key is primary and later keys break ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.column_id, self.direction)
    }
}

/// Current page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 5,
        }
    }
}

/// A visible row: the record plus its position in the original record set.
///
/// The position is stable across filtering and sorting, so it serves as a row id.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub index: usize,
    pub record: Record,
}

impl ViewRow {
    /// Cell values in declared column order.
    pub fn cells<'a>(&'a self, columns: &'a ColumnModel) -> impl Iterator<Item = (&'a str, Value)> + 'a {
        columns
            .columns()
            .iter()
            .map(|c| (c.id(), c.value(&self.record)))
    }
}

/// Render-ready output of the pipeline.
///
/// Always recomputed from scratch and replaced as a whole; never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub rows: Arc<[ViewRow]>,
    /// Rows left after filtering, across all pages.
    pub row_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

impl DerivedView {
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().map(|r| &r.record)
    }

    /// 1-based page number for "page X of N" displays; 0 when there are no pages.
    pub fn page_number(&self) -> usize {
        if self.page_count == 0 { 0 } else { self.page_index + 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_sort_direction_conversion() {
        assert_eq!(SortDirection::from_str("asc").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::from_str("DESC").unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.to_string(), "desc");
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
        assert!(SortDirection::from_str("up").is_err());
    }

    #[test]
    fn test_sort_key_serialization() {
        let key = SortKey::desc("name");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#"{"column_id":"name","direction":"desc"}"#);
        assert_eq!(key.to_string(), "name: desc");

        let restored: SortKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, restored);
    }
}
