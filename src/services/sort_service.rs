use std::cmp::Ordering;

use tracing::trace;

use crate::core::{Column, ColumnModel, Record, SortDirection, SortKey, Value};
use crate::error::{Result, TableError};

/// Service for sort operations
pub struct SortService;

impl SortService {
    /// Check that every key names a known, sortable column.
    pub fn validate(sort_keys: &[SortKey], columns: &ColumnModel) -> Result<()> {
        Self::resolve(sort_keys, columns).map(|_| ())
    }

    /// Stable multi-key sort of `indices` (positions into `records`).
    ///
    /// The first key is primary. Records equal on every key keep their input order.
    /// An empty key list returns the input unchanged.
    pub fn sort(
        indices: Vec<usize>,
        records: &[Record],
        sort_keys: &[SortKey],
        columns: &ColumnModel,
    ) -> Result<Vec<usize>> {
        if sort_keys.is_empty() {
            return Ok(indices);
        }
        let resolved = Self::resolve(sort_keys, columns)?;

        // Read each sort value once per record.
        let mut decorated: Vec<(usize, Vec<Value>)> = indices
            .into_iter()
            .map(|i| {
                let values = resolved.iter().map(|(c, _)| c.value(&records[i])).collect();
                (i, values)
            })
            .collect();

        decorated.sort_by(|(_, a), (_, b)| {
            resolved
                .iter()
                .zip(a.iter().zip(b.iter()))
                .map(|((column, direction), (x, y))| {
                    let ord = column.get_sorting_fn().compare(x, y);
                    match direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        trace!(keys = sort_keys.len(), rows = decorated.len(), "sorted records");
        Ok(decorated.into_iter().map(|(i, _)| i).collect())
    }

    /// Same as [`SortService::sort`] over a whole record slice, returning records.
    pub fn sort_records(
        records: &[Record],
        sort_keys: &[SortKey],
        columns: &ColumnModel,
    ) -> Result<Vec<Record>> {
        let order = Self::sort((0..records.len()).collect(), records, sort_keys, columns)?;
        Ok(order.into_iter().map(|i| records[i].clone()).collect())
    }

    fn resolve<'a>(
        sort_keys: &[SortKey],
        columns: &'a ColumnModel,
    ) -> Result<Vec<(&'a Column, SortDirection)>> {
        sort_keys
            .iter()
            .map(|key| {
                let column = columns.column(&key.column_id)?;
                if !column.is_sortable() {
                    return Err(TableError::ColumnNotSortable(key.column_id.clone()));
                }
                Ok((column, key.direction))
            })
            .collect()
    }
}
