//! Lookup values, keyword lookup parameters and Q objects.
//!
//! A list filter hands the ORM a [`LookupParams`] map such as
//! `{"created_at__gte": "2024-03-20", "created_at__lte": "2024-03-25"}`,
//! the Rust rendering of `queryset.filter(**params)`. Each key is a field path
//! followed by an optional lookup suffix; [`LookupParams::to_q`] folds the map
//! into an AND of [`Q::Filter`] nodes.
//!
//! # Examples
//!
//! ```
//! use rangefilter2::lookups::{Lookup, LookupParams, Q, Value};
//!
//! let mut params = LookupParams::new();
//! params.insert("created_at__gte", Value::from("2024-03-20"));
//!
//! let q = params.to_q().unwrap();
//! assert_eq!(
//!     q,
//!     Q::And(vec![Q::filter("created_at", Lookup::Gte(Value::from("2024-03-20")))])
//! );
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rangefilter2_core::ValidationError;
use thiserror::Error;

/// A backend-agnostic lookup value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A 64-bit signed integer.
    Int(i64),
    /// A UTF-8 string, converted by the field that receives it.
    String(String),
    /// A date without time.
    Date(NaiveDate),
    /// A date and time without timezone.
    DateTime(NaiveDateTime),
    /// A timezone-aware instant.
    DateTimeTz(DateTime<Utc>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::DateTimeTz(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTimeTz(v)
    }
}

/// A field-level comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// `field = value`.
    Exact(Value),
    /// `field > value`.
    Gt(Value),
    /// `field >= value`.
    Gte(Value),
    /// `field < value`.
    Lt(Value),
    /// `field <= value`.
    Lte(Value),
}

impl Lookup {
    /// Builds a lookup from its keyword suffix (`exact`, `gt`, `gte`, `lt`, `lte`).
    pub fn from_suffix(suffix: &str, value: Value) -> Option<Self> {
        match suffix {
            "exact" => Some(Self::Exact(value)),
            "gt" => Some(Self::Gt(value)),
            "gte" => Some(Self::Gte(value)),
            "lt" => Some(Self::Lt(value)),
            "lte" => Some(Self::Lte(value)),
            _ => None,
        }
    }

    /// The keyword suffix of this lookup.
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
        }
    }

    /// The value compared against.
    pub const fn value(&self) -> &Value {
        match self {
            Self::Exact(v) | Self::Gt(v) | Self::Gte(v) | Self::Lt(v) | Self::Lte(v) => v,
        }
    }

    /// Returns `true` if a stored value ordered as `ordering` relative to the
    /// lookup value satisfies this lookup.
    pub fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Self::Exact(_) => ordering == Equal,
            Self::Gt(_) => ordering == Greater,
            Self::Gte(_) => ordering != Less,
            Self::Lt(_) => ordering == Less,
            Self::Lte(_) => ordering != Greater,
        }
    }
}

/// A composable filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Q {
    /// A single field lookup.
    Filter {
        /// The field path (may use `__` for related fields).
        field: String,
        /// The lookup operation.
        lookup: Lookup,
    },
    /// Logical AND of multiple conditions.
    And(Vec<Q>),
}

impl Q {
    /// Creates a new filter Q object.
    pub fn filter(field: impl Into<String>, lookup: Lookup) -> Self {
        Self::Filter {
            field: field.into(),
            lookup,
        }
    }

    /// Returns `true` if this is an empty AND (always true).
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::And(children) if children.is_empty())
    }
}

/// Why the ORM refused a set of lookup parameters.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// A value could not be converted for the field.
    #[error("{0}")]
    Value(String),
    /// A value failed the field's validation.
    #[error("{0}")]
    Validation(ValidationError),
    /// The lookup names a field the model does not have.
    #[error("Cannot resolve keyword '{0}' into field")]
    UnknownField(String),
    /// The lookup suffix is not supported by the field.
    #[error("Unsupported lookup '{lookup}' for field '{field}'")]
    UnsupportedLookup {
        /// The field path.
        field: String,
        /// The unsupported suffix.
        lookup: String,
    },
}

impl From<ValidationError> for LookupError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Keyword lookup arguments, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupParams {
    entries: Vec<(String, Value)>,
}

impl LookupParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the lookup keys in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Splits every key into field path and lookup and ANDs them together.
    ///
    /// A key without a recognised suffix is an `exact` lookup on the full key.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownField`] for an empty field path.
    pub fn to_q(&self) -> Result<Q, LookupError> {
        self.entries
            .iter()
            .map(|(key, value)| {
                let (field, lookup) = split_lookup(key, value.clone());
                if field.is_empty() {
                    return Err(LookupError::UnknownField(key.clone()));
                }
                Ok(Q::filter(field, lookup))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Q::And)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for LookupParams {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Splits `field__path__lookup` into its field path and [`Lookup`].
pub fn split_lookup(key: &str, value: Value) -> (&str, Lookup) {
    if let Some((field, suffix)) = key.rsplit_once("__") {
        if let Some(lookup) = Lookup::from_suffix(suffix, value.clone()) {
            return (field, lookup);
        }
    }
    (key, Lookup::Exact(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_lookup_from_suffix() {
        assert_eq!(
            Lookup::from_suffix("gte", Value::Int(1)),
            Some(Lookup::Gte(Value::Int(1)))
        );
        assert_eq!(Lookup::from_suffix("range", Value::Null), None);
    }

    #[test]
    fn test_lookup_accepts() {
        let gte = Lookup::Gte(Value::Null);
        assert!(gte.accepts(Ordering::Equal));
        assert!(gte.accepts(Ordering::Greater));
        assert!(!gte.accepts(Ordering::Less));

        let lte = Lookup::Lte(Value::Null);
        assert!(lte.accepts(Ordering::Equal));
        assert!(!lte.accepts(Ordering::Greater));

        assert!(!Lookup::Gt(Value::Null).accepts(Ordering::Equal));
        assert!(!Lookup::Lt(Value::Null).accepts(Ordering::Equal));
        assert!(Lookup::Exact(Value::Null).accepts(Ordering::Equal));
    }

    #[test]
    fn test_split_lookup() {
        let (field, lookup) = split_lookup("order__created__lte", Value::from("x"));
        assert_eq!(field, "order__created");
        assert_eq!(lookup.suffix(), "lte");

        let (field, lookup) = split_lookup("order__created", Value::from("x"));
        assert_eq!(field, "order__created");
        assert_eq!(lookup, Lookup::Exact(Value::from("x")));
    }

    #[test]
    fn test_params_insert_replaces_in_place() {
        let mut params = LookupParams::new();
        params.insert("a__gte", Value::from("1"));
        params.insert("a__lte", Value::from("2"));
        params.insert("a__gte", Value::from("3"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.keys(), vec!["a__gte", "a__lte"]);
        assert_eq!(params.get("a__gte"), Some(&Value::from("3")));
    }

    #[test]
    fn test_params_to_q() {
        let params: LookupParams = vec![
            ("created__gte", Value::from("2024-01-01")),
            ("created__lte", Value::from("2024-01-31")),
        ]
        .into_iter()
        .collect();
        let q = params.to_q().unwrap();
        assert_eq!(
            q,
            Q::And(vec![
                Q::filter("created", Lookup::Gte(Value::from("2024-01-01"))),
                Q::filter("created", Lookup::Lte(Value::from("2024-01-31"))),
            ])
        );
    }

    #[test]
    fn test_empty_params_give_empty_q() {
        assert!(LookupParams::new().to_q().unwrap().is_empty());
    }

    #[test]
    fn test_to_q_rejects_empty_field() {
        let params: LookupParams = vec![("__gte", Value::Int(1))].into_iter().collect();
        assert!(matches!(params.to_q(), Err(LookupError::UnknownField(_))));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from("2024-03-20").to_string(), "2024-03-20");
        assert_eq!(Value::Null.to_string(), "NULL");
        let dt = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(Value::from(dt).to_string(), "1970-01-01T00:00:00+00:00");
    }
}
