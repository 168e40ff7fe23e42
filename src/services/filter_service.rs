//! Global free-text filter across every column of a record set.
//!
//! Each column's value is rendered through its display form (see
//! [`Value`](crate::core::Value)'s `Display`) before matching. Numeric columns
//! therefore match on the raw number's text: `3.0` matches `"3"` but not `"3.0"`.
//! Matching runs from scratch on every call; there is no incremental index.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ColumnModel, Record};
use crate::error::{Result, TableError};

/// Options for the global filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Case-sensitive matching
    pub match_case: bool,
    /// The whole cell must match, not just a substring
    pub whole_word: bool,
    pub mode: SearchMode,
}

/// Search mode (normal substring or regex)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Normal substring matching
    #[default]
    Normal,
    /// Regular expression matching
    Regex,
}

type Matcher = Box<dyn Fn(&str) -> bool>;

/// Service for filter operations
pub struct FilterService;

impl FilterService {
    /// Indices of the records matching `query` in any column, in input order.
    ///
    /// An empty (or all-whitespace) query keeps every record.
    pub fn filter(
        records: &[Record],
        query: &str,
        columns: &ColumnModel,
        options: &FilterOptions,
    ) -> Result<Vec<usize>> {
        let Some(matcher) = Self::build_matcher(query, options)? else {
            return Ok((0..records.len()).collect());
        };

        let kept: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| Self::record_matches(record, columns, &matcher))
            .map(|(i, _)| i)
            .collect();

        trace!(query = query.trim(), total = records.len(), kept = kept.len(), "filtered records");
        Ok(kept)
    }

    /// Same as [`FilterService::filter`] but returns the matching records.
    pub fn filter_records(
        records: &[Record],
        query: &str,
        columns: &ColumnModel,
        options: &FilterOptions,
    ) -> Result<Vec<Record>> {
        Ok(Self::filter(records, query, columns, options)?
            .into_iter()
            .map(|i| records[i].clone())
            .collect())
    }

    /// Validate a query without running it; fails on a bad regex.
    pub fn validate(query: &str, options: &FilterOptions) -> Result<()> {
        Self::build_matcher(query, options).map(|_| ())
    }

    fn record_matches(record: &Record, columns: &ColumnModel, matcher: &Matcher) -> bool {
        columns
            .columns()
            .iter()
            .any(|column| matcher(&column.value(record).to_string()))
    }

    /// Returns `None` when the query is empty after trimming.
    fn build_matcher(query: &str, options: &FilterOptions) -> Result<Option<Matcher>> {
        let pattern = query.trim();
        if pattern.is_empty() {
            return Ok(None);
        }

        let whole_word = options.whole_word;
        let matcher: Matcher = match options.mode {
            SearchMode::Normal => {
                let match_case = options.match_case;
                let pat = if match_case {
                    pattern.to_string()
                } else {
                    pattern.to_lowercase()
                };
                Box::new(move |cell: &str| {
                    let cell_cmp = if match_case {
                        cell.to_string()
                    } else {
                        cell.to_lowercase()
                    };
                    if whole_word {
                        cell_cmp == pat
                    } else {
                        cell_cmp.contains(&pat)
                    }
                })
            }
            SearchMode::Regex => {
                let anchored = if whole_word {
                    format!("^(?:{pattern})$")
                } else {
                    pattern.to_string()
                };
                let source = if options.match_case {
                    anchored
                } else {
                    format!("(?i){anchored}")
                };
                let re = Regex::new(&source).map_err(|source| TableError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
                Box::new(move |cell: &str| re.is_match(cell))
            }
        };
        Ok(Some(matcher))
    }
}
