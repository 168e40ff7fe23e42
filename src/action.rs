use serde::{Deserialize, Serialize};
use strum::Display;

use crate::core::SortKey;
use crate::services::FilterOptions;

/// Mutations a host can route to a [`TableEngine`](crate::engine::TableEngine).
///
/// Serialisable so that event-driven hosts can queue or replay them.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TableAction {
    /// Replace the global filter query
    SetQuery(String),
    SetFilterOptions(FilterOptions),
    /// Replace the whole sort state
    SetSortKeys(Vec<SortKey>),
    /// Cycle one column through unsorted, ascending, descending
    ToggleSort(String),
    SetPageIndex(usize),
    SetPageSize(usize),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(TableAction::NextPage.to_string(), "NextPage");
        assert_eq!(TableAction::ToggleSort("name".into()).to_string(), "ToggleSort");
    }

    #[test]
    fn test_action_serialization() {
        let action = TableAction::SetSortKeys(vec![SortKey::asc("name")]);
        let json = serde_json::to_string(&action).unwrap();
        let restored: TableAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, restored);

        let page: TableAction = serde_json::from_str(r#"{"SetPageSize":10}"#).unwrap();
        assert_eq!(page, TableAction::SetPageSize(10));
    }
}
