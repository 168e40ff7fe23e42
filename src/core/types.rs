use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use crate::error::{Result, TableError};

/// A single cell value read from a record.
///
/// JSON scalars map directly onto the variants. Nested arrays and objects have no
/// tabular meaning and are kept as their compact JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    /// Default ordering used by sorting.
    ///
    /// Values of different kinds order as `null < bool < number < string`. Numbers
    /// compare numerically across `Int` and `Float`, with NaN after every other
    /// number. Strings compare by code point.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => compare_f64(*a, *b),
            (Value::Int(a), Value::Float(b)) => compare_int_float(*a, *b),
            (Value::Float(a), Value::Int(b)) => compare_int_float(*b, *a).reverse(),
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
        }
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer against a float, without rounding the integer.
fn compare_int_float(i: i64, f: f64) -> Ordering {
    // 2^63, exactly representable
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= BOUND {
        return Ordering::Less;
    }
    if f < -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| whole.partial_cmp(&f).unwrap_or(Ordering::Equal))
}

/// Display form of a value, as matched by the global filter.
///
/// `Null` renders empty and floats use Rust's shortest round-trip formatting,
/// so `3.0` renders as `3`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            nested => Value::String(nested.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One row of source data: field name to value.
///
/// Fields that are not present read as [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for literal rows.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Owned value of a field, `Null` when absent.
    pub fn value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

impl From<serde_json::Value> for Record {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => Record::default(),
        }
    }
}

/// Parse a JSON array of objects into records.
pub fn records_from_json_str(json: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    records_from_json_value(value)
}

/// Read a JSON array of objects from any reader.
pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    records_from_json_value(value)
}

fn records_from_json_value(value: serde_json::Value) -> Result<Vec<Record>> {
    let serde_json::Value::Array(items) = value else {
        return Err(TableError::InvalidRecord(format!(
            "expected a JSON array of objects, found {}",
            json_kind(&value)
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(_) => Ok(Record::from(item)),
            other => Err(TableError::InvalidRecord(format!(
                "element {i} is {}, not an object",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("Ann").to_string(), "Ann");
    }

    #[test]
    fn test_value_compare_numbers_across_kinds() {
        assert_eq!(Value::from(2).compare(&Value::from(10)), Ordering::Less);
        assert_eq!(Value::from(2.5).compare(&Value::from(2)), Ordering::Greater);
        assert_eq!(Value::from(1).compare(&Value::from(1.0)), Ordering::Equal);
        assert_eq!(Value::from(f64::NAN).compare(&Value::from(1e300)), Ordering::Greater);
        assert_eq!(Value::from(-2).compare(&Value::from(-1.5)), Ordering::Less);
        assert_eq!(Value::from(f64::NAN).compare(&Value::from(i64::MAX)), Ordering::Greater);
    }

    #[test]
    fn test_value_compare_large_int_against_float() {
        // 2^53 + 1 has no f64 representation
        let big = Value::from(9_007_199_254_740_993_i64);
        let float = Value::from(9_007_199_254_740_992.0);
        assert_eq!(big.compare(&float), Ordering::Greater);
        assert_eq!(float.compare(&big), Ordering::Less);
        assert_eq!(Value::from(9_007_199_254_740_992_i64).compare(&float), Ordering::Equal);
        assert_eq!(Value::from(i64::MAX).compare(&Value::from(f64::INFINITY)), Ordering::Less);
        assert_eq!(Value::from(i64::MIN).compare(&Value::from(-1e300)), Ordering::Greater);
    }

    #[test]
    fn test_value_compare_mixed_kinds() {
        assert_eq!(Value::Null.compare(&Value::from(false)), Ordering::Less);
        assert_eq!(Value::from(true).compare(&Value::from(0)), Ordering::Less);
        assert_eq!(Value::from(99).compare(&Value::from("1")), Ordering::Less);
        // code point order: uppercase before lowercase
        assert_eq!(Value::from("Zed").compare(&Value::from("ann")), Ordering::Less);
    }

    #[test]
    fn test_record_missing_field_is_null() {
        let record = Record::new().with("id", 1).with("name", "Bob");
        assert_eq!(record.value("name"), Value::from("Bob"));
        assert_eq!(record.value("email"), Value::Null);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_records_from_json() {
        let records = records_from_json_str(
            r#"[{"id": 1, "name": "Bob", "score": 2.5, "tags": ["a"]}, {"id": 2, "name": null}]"#,
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value("id"), Value::Int(1));
        assert_eq!(records[0].value("score"), Value::Float(2.5));
        assert_eq!(records[0].value("tags"), Value::from(r#"["a"]"#));
        assert_eq!(records[1].value("name"), Value::Null);
    }

    #[test]
    fn test_records_from_json_rejects_non_objects() {
        let err = records_from_json_str(r#"[{"id": 1}, 7]"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord(msg) if msg.contains("element 1")));

        let err = records_from_json_str(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidRecord(_)));

        let err = records_from_json_str("not json").unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
    }

    #[test]
    fn test_records_from_reader() {
        let json = br#"[{"id": 1, "active": true}]"#;
        let records = records_from_reader(&json[..]).unwrap();
        assert_eq!(records[0].value("active"), Value::Bool(true));
    }

    #[test]
    fn test_record_serialization() {
        let record = Record::new().with("id", 1).with("name", "Ann");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Ann"}"#);

        let restored: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
    }
}
