//! TableEngine: owns the filter/sort/pagination state of one table and the
//! view derived from it.
//!
//! Every mutator runs the whole pipeline (filter, then sort, then paginate)
//! against a candidate state and only commits when the run succeeds, so a
//! rejected call leaves both the state and the current view untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::action::TableAction;
use crate::config::TableConfig;
use crate::core::{
    ColumnModel, DerivedView, PaginationState, Record, SortDirection, SortKey, ViewRow,
};
use crate::error::{Result, TableError};
use crate::services::{FilterOptions, FilterService, PaginationService, SortService};

/// The configuration half of a table: everything a mutator can change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableState {
    pub query: String,
    pub filter_options: FilterOptions,
    pub sort_keys: Vec<SortKey>,
    pub pagination: PaginationState,
}

pub struct TableEngine {
    records: Arc<[Record]>,
    columns: ColumnModel,
    state: TableState,
    page_size_options: Vec<usize>,
    view: DerivedView,
    subscribers: Vec<UnboundedSender<DerivedView>>,
}

impl TableEngine {
    /// Create an engine with the default configuration.
    pub fn new(records: impl Into<Arc<[Record]>>, columns: ColumnModel) -> Result<Self> {
        Self::with_config(records, columns, &TableConfig::default())
    }

    pub fn with_config(
        records: impl Into<Arc<[Record]>>,
        columns: ColumnModel,
        config: &TableConfig,
    ) -> Result<Self> {
        if config.page_size == 0 {
            return Err(TableError::InvalidPageSize(0));
        }
        let records = records.into();
        let state = TableState {
            query: String::new(),
            filter_options: config.filter.clone(),
            sort_keys: Vec::new(),
            pagination: PaginationState {
                page_index: 0,
                page_size: config.page_size,
            },
        };
        let view = Self::compute(&records, &columns, &state)?;
        debug!(
            records = records.len(),
            columns = columns.len(),
            page_size = config.page_size,
            "created table engine"
        );
        Ok(Self {
            records,
            columns,
            state,
            page_size_options: config.page_size_options.clone(),
            view,
            subscribers: Vec::new(),
        })
    }

    /// Run filter, sort and paginate for `state`. The page index is clamped
    /// into the resulting page range.
    fn compute(records: &[Record], columns: &ColumnModel, state: &TableState) -> Result<DerivedView> {
        let filtered = FilterService::filter(records, &state.query, columns, &state.filter_options)?;
        let ordered = SortService::sort(filtered, records, &state.sort_keys, columns)?;

        let page_count = PaginationService::page_count(ordered.len(), state.pagination.page_size);
        let pagination = PaginationState {
            page_index: PaginationService::clamp_page_index(state.pagination.page_index, page_count),
            page_size: state.pagination.page_size,
        };
        let (page, window) = PaginationService::page(&ordered, &pagination);

        let rows: Arc<[ViewRow]> = page
            .iter()
            .map(|&index| ViewRow {
                index,
                record: records[index].clone(),
            })
            .collect();

        Ok(DerivedView {
            rows,
            row_count: ordered.len(),
            page_index: pagination.page_index,
            page_size: pagination.page_size,
            page_count: window.page_count,
            can_go_next: window.can_go_next,
            can_go_previous: window.can_go_previous,
        })
    }

    /// Recompute against `next` and swap it in, or leave everything as is on error.
    fn commit(&mut self, mut next: TableState, action: &str) -> Result<&DerivedView> {
        let view = match Self::compute(&self.records, &self.columns, &next) {
            Ok(view) => view,
            Err(e) => {
                warn!(action, error = %e, "rejected table mutation");
                return Err(e);
            }
        };
        next.pagination.page_index = view.page_index;
        self.state = next;
        self.view = view;
        debug!(
            action,
            rows = self.view.row_count,
            page = self.view.page_index,
            pages = self.view.page_count,
            "recomputed table view"
        );
        self.notify();
        Ok(&self.view)
    }

    fn notify(&mut self) {
        self.subscribers
            .retain(|tx| tx.send(self.view.clone()).is_ok());
    }

    /// Register a channel that receives the new view after every successful mutation.
    pub fn register_view_handler(&mut self, tx: UnboundedSender<DerivedView>) {
        self.subscribers.push(tx);
    }

    /// Convenience over [`TableEngine::register_view_handler`].
    pub fn subscribe(&mut self) -> UnboundedReceiver<DerivedView> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.register_view_handler(tx);
        rx
    }

    /// Replace the global filter query. Returns to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) -> Result<&DerivedView> {
        let query = query.into();
        if let Err(e) = FilterService::validate(&query, &self.state.filter_options) {
            warn!(action = "set_query", error = %e, "rejected table mutation");
            return Err(e);
        }
        let mut next = self.state.clone();
        next.query = query;
        next.pagination.page_index = 0;
        self.commit(next, "set_query")
    }

    /// Change how the query is matched. Returns to the first page.
    pub fn set_filter_options(&mut self, options: FilterOptions) -> Result<&DerivedView> {
        if let Err(e) = FilterService::validate(&self.state.query, &options) {
            warn!(action = "set_filter_options", error = %e, "rejected table mutation");
            return Err(e);
        }
        let mut next = self.state.clone();
        next.filter_options = options;
        next.pagination.page_index = 0;
        self.commit(next, "set_filter_options")
    }

    /// Replace the sort state. Returns to the first page.
    pub fn set_sort_keys(&mut self, sort_keys: Vec<SortKey>) -> Result<&DerivedView> {
        if let Err(e) = SortService::validate(&sort_keys, &self.columns) {
            warn!(action = "set_sort_keys", error = %e, "rejected table mutation");
            return Err(e);
        }
        let mut next = self.state.clone();
        next.sort_keys = sort_keys;
        next.pagination.page_index = 0;
        self.commit(next, "set_sort_keys")
    }

    /// Cycle one column through unsorted, ascending, descending and back,
    /// replacing any other active sort key.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<&DerivedView> {
        let next_keys = match self.sort_direction(column_id) {
            None => vec![SortKey::asc(column_id)],
            Some(SortDirection::Asc) => vec![SortKey::desc(column_id)],
            Some(SortDirection::Desc) => Vec::new(),
        };
        if !self.can_sort(column_id)? {
            let e = TableError::ColumnNotSortable(column_id.to_string());
            warn!(action = "toggle_sort", error = %e, "rejected table mutation");
            return Err(e);
        }
        self.set_sort_keys(next_keys)
    }

    /// Jump to a page; out-of-range indices are clamped.
    pub fn set_page_index(&mut self, page_index: usize) -> Result<&DerivedView> {
        let mut next = self.state.clone();
        next.pagination.page_index = page_index;
        self.commit(next, "set_page_index")
    }

    /// Change the page size, keeping the page index where it still fits.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<&DerivedView> {
        if page_size == 0 {
            let e = TableError::InvalidPageSize(page_size);
            warn!(action = "set_page_size", error = %e, "rejected table mutation");
            return Err(e);
        }
        let mut next = self.state.clone();
        next.pagination.page_size = page_size;
        self.commit(next, "set_page_size")
    }

    /// Advance one page; a no-op on the last page.
    pub fn next_page(&mut self) -> Result<&DerivedView> {
        if !self.view.can_go_next {
            return Ok(&self.view);
        }
        self.set_page_index(self.state.pagination.page_index + 1)
    }

    /// Go back one page; a no-op on the first page.
    pub fn previous_page(&mut self) -> Result<&DerivedView> {
        if !self.view.can_go_previous {
            return Ok(&self.view);
        }
        self.set_page_index(self.state.pagination.page_index - 1)
    }

    pub fn first_page(&mut self) -> Result<&DerivedView> {
        if !self.view.can_go_previous {
            return Ok(&self.view);
        }
        self.set_page_index(0)
    }

    pub fn last_page(&mut self) -> Result<&DerivedView> {
        if !self.view.can_go_next {
            return Ok(&self.view);
        }
        self.set_page_index(self.view.page_count.saturating_sub(1))
    }

    /// Route an action to the matching mutator.
    pub fn apply(&mut self, action: TableAction) -> Result<&DerivedView> {
        debug!(%action, "applying table action");
        match action {
            TableAction::SetQuery(query) => self.set_query(query),
            TableAction::SetFilterOptions(options) => self.set_filter_options(options),
            TableAction::SetSortKeys(keys) => self.set_sort_keys(keys),
            TableAction::ToggleSort(column_id) => self.toggle_sort(&column_id),
            TableAction::SetPageIndex(index) => self.set_page_index(index),
            TableAction::SetPageSize(size) => self.set_page_size(size),
            TableAction::NextPage => self.next_page(),
            TableAction::PreviousPage => self.previous_page(),
            TableAction::FirstPage => self.first_page(),
            TableAction::LastPage => self.last_page(),
        }
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.state.filter_options
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.state.sort_keys
    }

    pub fn pagination(&self) -> PaginationState {
        self.state.pagination
    }

    pub fn page_index(&self) -> usize {
        self.state.pagination.page_index
    }

    pub fn page_size(&self) -> usize {
        self.state.pagination.page_size
    }

    pub fn page_count(&self) -> usize {
        self.view.page_count
    }

    /// Filtered row count across all pages.
    pub fn row_count(&self) -> usize {
        self.view.row_count
    }

    /// Page sizes a selector should offer.
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn can_sort(&self, column_id: &str) -> Result<bool> {
        self.columns.is_sortable(column_id)
    }

    /// Direction the column is currently sorted in, if it is part of the sort state.
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.state
            .sort_keys
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }
}
