//! Column model: how each column reads its value from a record and how it sorts.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::core::types::{Record, Value};
use crate::error::{Result, TableError};

type AccessorFn = dyn Fn(&Record) -> Value + Send + Sync;
type CompareFn = dyn Fn(&Value, &Value) -> Ordering + Send + Sync;

/// How a column reads its value out of a record. Accessors must be pure.
#[derive(Clone)]
pub enum Accessor {
    /// Read a named field.
    Field(String),
    /// Derive the value from the whole record.
    Computed(Arc<AccessorFn>),
}

impl Accessor {
    pub fn read(&self, record: &Record) -> Value {
        match self {
            Accessor::Field(field) => record.value(field),
            Accessor::Computed(f) => f(record),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Accessor::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Comparison applied when a column takes part in a sort.
#[derive(Clone, Default)]
pub enum SortingFn {
    /// [`Value::compare`]: numbers numerically, strings by code point.
    #[default]
    Basic,
    /// Case-insensitive comparison of the display strings.
    Text,
    /// Natural ordering: runs of digits compare numerically, so `item2 < item10`.
    Alphanumeric,
    Custom(Arc<CompareFn>),
}

impl SortingFn {
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match self {
            SortingFn::Basic => a.compare(b),
            SortingFn::Text => a
                .to_string()
                .to_lowercase()
                .cmp(&b.to_string().to_lowercase()),
            SortingFn::Alphanumeric => {
                if a.is_number() && b.is_number() {
                    a.compare(b)
                } else {
                    compare_alphanumeric(&a.to_string(), &b.to_string())
                }
            }
            SortingFn::Custom(f) => f(a, b),
        }
    }
}

impl fmt::Debug for SortingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortingFn::Basic => f.write_str("Basic"),
            SortingFn::Text => f.write_str("Text"),
            SortingFn::Alphanumeric => f.write_str("Alphanumeric"),
            SortingFn::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Split into alternating digit / non-digit chunks and compare chunk by chunk.
fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a);
    let mut right = chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = if is_digit_run(x) && is_digit_run(y) {
                    compare_digit_runs(x, y)
                } else {
                    x.cmp(y)
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digit_run(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// Numeric order for ASCII digit runs of any length; ties on value go to the
/// shorter (fewer leading zeros) run.
fn compare_digit_runs(x: &str, y: &str) -> Ordering {
    let m = x.trim_start_matches('0');
    let n = y.trim_start_matches('0');
    m.len()
        .cmp(&n.len())
        .then_with(|| m.cmp(n))
        .then_with(|| x.len().cmp(&y.len()))
}

fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

/// A named view onto one field of a record, plus its sort behaviour.
#[derive(Debug, Clone)]
pub struct Column {
    id: String,
    accessor: Accessor,
    header: Option<String>,
    sortable: bool,
    sorting_fn: SortingFn,
}

impl Column {
    /// Column reading the record field named `id`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: Accessor::Field(id.clone()),
            id,
            header: None,
            sortable: true,
            sorting_fn: SortingFn::default(),
        }
    }

    /// Column whose value is derived from the whole record.
    pub fn computed<F>(id: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            accessor: Accessor::Computed(Arc::new(accessor)),
            header: None,
            sortable: true,
            sorting_fn: SortingFn::default(),
        }
    }

    /// Read a field whose name differs from the column id.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.accessor = Accessor::Field(field.into());
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn sorting_fn(mut self, sorting_fn: SortingFn) -> Self {
        self.sorting_fn = sorting_fn;
        self
    }

    /// Shorthand for a [`SortingFn::Custom`] comparison.
    pub fn compare_with<F>(self, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.sorting_fn(SortingFn::Custom(Arc::new(compare)))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Header text for the rendering layer; falls back to the id.
    pub fn header_label(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.id)
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn get_sorting_fn(&self) -> &SortingFn {
        &self.sorting_fn
    }

    pub fn value(&self, record: &Record) -> Value {
        self.accessor.read(record)
    }
}

/// Ordered set of columns with unique ids.
#[derive(Debug, Clone, Default)]
pub struct ColumnModel {
    columns: Vec<Column>,
}

impl ColumnModel {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(TableError::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Columns in declared order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::id)
    }

    pub fn column(&self, id: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TableError::UnknownColumn(id.to_string()))
    }

    pub fn value(&self, record: &Record, column_id: &str) -> Result<Value> {
        Ok(self.column(column_id)?.value(record))
    }

    pub fn is_sortable(&self, column_id: &str) -> Result<bool> {
        Ok(self.column(column_id)?.sortable)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ColumnModel {
        ColumnModel::new(vec![
            Column::new("id").header("ID"),
            Column::new("name"),
            Column::new("email").field("mail").sortable(false),
            Column::computed("initial", |r| {
                Value::from(r.value("name").to_string().chars().next().map(String::from))
            }),
        ])
        .unwrap()
    }

    #[test]
    fn test_value_via_accessor() {
        let model = model();
        let record = Record::new()
            .with("id", 7)
            .with("name", "Ann")
            .with("mail", "ann@example.com");

        assert_eq!(model.value(&record, "id").unwrap(), Value::Int(7));
        assert_eq!(
            model.value(&record, "email").unwrap(),
            Value::from("ann@example.com")
        );
        assert_eq!(model.value(&record, "initial").unwrap(), Value::from("A"));
        assert!(matches!(
            model.value(&record, "phone"),
            Err(TableError::UnknownColumn(id)) if id == "phone"
        ));
    }

    #[test]
    fn test_declared_order_and_flags() {
        let model = model();
        assert_eq!(model.ids().collect::<Vec<_>>(), ["id", "name", "email", "initial"]);
        assert!(model.is_sortable("name").unwrap());
        assert!(!model.is_sortable("email").unwrap());
        assert!(model.is_sortable("nope").is_err());
        assert_eq!(model.column("id").unwrap().header_label(), "ID");
        assert_eq!(model.column("name").unwrap().header_label(), "name");
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ColumnModel::new(vec![Column::new("id"), Column::new("id")]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(id) if id == "id"));
    }

    #[test]
    fn test_alphanumeric_ordering() {
        let f = SortingFn::Alphanumeric;
        assert_eq!(f.compare(&"item2".into(), &"item10".into()), Ordering::Less);
        assert_eq!(f.compare(&"b1".into(), &"a9".into()), Ordering::Greater);
        assert_eq!(f.compare(&"x".into(), &"x1".into()), Ordering::Less);
        assert_eq!(f.compare(&Value::from(10), &Value::from(9)), Ordering::Greater);
        assert_eq!(f.compare(&"v007".into(), &"v7".into()), Ordering::Greater);
    }

    #[test]
    fn test_alphanumeric_long_digit_runs() {
        let f = SortingFn::Alphanumeric;
        let huge = Value::from(format!("1{}", "0".repeat(45)));
        let nine = Value::from("9");
        let ten = Value::from("10");
        assert_eq!(f.compare(&nine, &ten), Ordering::Less);
        assert_eq!(f.compare(&ten, &huge), Ordering::Less);
        assert_eq!(f.compare(&nine, &huge), Ordering::Less);

        let mut values = vec![huge.clone(), ten.clone(), nine.clone(), Value::from("item99")];
        values.sort_by(|a, b| f.compare(a, b));
        assert_eq!(values, vec![nine, ten, huge, Value::from("item99")]);
    }

    #[test]
    fn test_text_and_custom_ordering() {
        assert_eq!(
            SortingFn::Text.compare(&"bob".into(), &"Ann".into()),
            Ordering::Greater
        );
        let by_len = Column::new("name")
            .compare_with(|a, b| a.to_string().len().cmp(&b.to_string().len()));
        assert_eq!(
            by_len.get_sorting_fn().compare(&"zz".into(), &"aaa".into()),
            Ordering::Less
        );
    }
}
