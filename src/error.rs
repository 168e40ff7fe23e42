//! Error types surfaced by the table engine

use thiserror::Error;

/// Errors raised by the column model, the pipeline stages and the engine mutators.
///
/// All variants are recoverable: a mutator that fails leaves the engine state and
/// its derived view exactly as they were before the call.
#[derive(Debug, Error)]
pub enum TableError {
    /// A column id was referenced that the column model does not declare.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A sort was requested on a column flagged as not sortable.
    #[error("column is not sortable: {0}")]
    ColumnNotSortable(String),

    /// Page sizes must be positive.
    #[error("invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Two columns in one model share the same id.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A regex filter query failed to compile.
    #[error("invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid record data: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TableError::UnknownColumn("email".into()).to_string(),
            "unknown column: email"
        );
        assert_eq!(
            TableError::ColumnNotSortable("phone".into()).to_string(),
            "column is not sortable: phone"
        );
        assert_eq!(TableError::InvalidPageSize(0).to_string(), "invalid page size: 0");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = TableError::InvalidPattern {
            pattern: "(".into(),
            source,
        };
        assert!(err.to_string().starts_with("invalid filter pattern '('"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
