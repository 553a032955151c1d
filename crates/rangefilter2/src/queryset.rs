//! The ORM filtering seam and an in-memory record set.
//!
//! [`QuerySet`] is the one ORM operation a list filter needs:
//! `filter(**params)`. A host ORM implements it for its own query type; the
//! in-memory [`RecordSet`] implements it over serialized JSON objects the way
//! the django-rs admin's in-memory database filters its list view.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use rangefilter2_core::i18n::timezone;
use rangefilter2_core::ValidationError;

use crate::lookups::{split_lookup, Lookup, LookupError, LookupParams, Value};

/// A query that can be narrowed with keyword lookups.
pub trait QuerySet: Sized {
    /// Returns a new query restricted by every lookup in `params`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] when a lookup value cannot be converted or
    /// validated for its field, or when a field or lookup is unknown.
    fn filter(self, params: &LookupParams) -> Result<Self, LookupError>;
}

/// The storage type of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A calendar date (`DateField`).
    Date,
    /// A timezone-aware instant (`DateTimeField`).
    DateTime,
}

/// A converted lookup or record value, comparable within one field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FieldValue {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

/// An in-memory list of JSON records with typed date fields.
///
/// Record values are ISO strings (`2024-03-20`, `2024-03-20T10:00:00+03:30`);
/// naive datetimes are read in the record set's default timezone. Lookup values
/// are converted the way a date or datetime model field converts query values,
/// so out-of-range or malformed values are rejected rather than ignored.
///
/// # Examples
///
/// ```
/// use rangefilter2::lookups::{LookupParams, Value};
/// use rangefilter2::queryset::{FieldKind, QuerySet, RecordSet};
///
/// let records = RecordSet::new(vec![
///     serde_json::json!({"id": 1, "published": "2024-03-19"}),
///     serde_json::json!({"id": 2, "published": "2024-03-21"}),
/// ])
/// .field("published", FieldKind::Date);
///
/// let params: LookupParams = vec![("published__gte", Value::from("2024-03-20"))]
///     .into_iter()
///     .collect();
/// let filtered = records.filter(&params).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Vec<serde_json::Value>,
    fields: HashMap<String, FieldKind>,
    timezone: Tz,
}

impl RecordSet {
    /// Creates a record set read in the default timezone.
    pub fn new(records: Vec<serde_json::Value>) -> Self {
        Self {
            records,
            fields: HashMap::new(),
            timezone: timezone::get_default_timezone(),
        }
    }

    /// Declares a filterable field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    /// Sets the timezone naive values are read in.
    #[must_use]
    pub const fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// The records currently in the set.
    pub fn records(&self) -> &[serde_json::Value] {
        &self.records
    }

    /// Consumes the set, returning its records.
    pub fn into_records(self) -> Vec<serde_json::Value> {
        self.records
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records remain.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collects the `id` of each record, for assertions and logging.
    pub fn ids(&self) -> Vec<i64> {
        self.records
            .iter()
            .filter_map(|r| r.get("id").and_then(serde_json::Value::as_i64))
            .collect()
    }

    fn resolve(&self, key: &str, value: &Value) -> Result<(String, FieldKind, Lookup, FieldValue), LookupError> {
        let (field, lookup) = split_lookup(key, value.clone());
        let kind = *self.fields.get(field).ok_or_else(|| {
            if key.contains("__") && !self.fields.contains_key(key) {
                if let Some((base, suffix)) = key.rsplit_once("__") {
                    if self.fields.contains_key(base) {
                        return LookupError::UnsupportedLookup {
                            field: base.to_string(),
                            lookup: suffix.to_string(),
                        };
                    }
                }
            }
            LookupError::UnknownField(field.to_string())
        })?;
        let bound = to_field_value(kind, lookup.value(), self.timezone)?;
        Ok((field.to_string(), kind, lookup, bound))
    }
}

impl QuerySet for RecordSet {
    fn filter(mut self, params: &LookupParams) -> Result<Self, LookupError> {
        let conditions = params
            .iter()
            .map(|(key, value)| self.resolve(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        let tz = self.timezone;
        self.records.retain(|record| {
            conditions.iter().all(|(field, kind, lookup, bound)| {
                record_value(record, field, *kind, tz)
                    .is_some_and(|stored| lookup.accepts(stored.cmp(bound)))
            })
        });
        Ok(self)
    }
}

/// Reads a record's field, treating NULL, missing and unparseable values as
/// matching nothing.
fn record_value(record: &serde_json::Value, field: &str, kind: FieldKind, tz: Tz) -> Option<FieldValue> {
    let raw = record.get(field)?.as_str()?;
    match kind {
        FieldKind::Date => parse_date(raw).map(FieldValue::Date),
        FieldKind::DateTime => parse_datetime(raw, tz).map(FieldValue::DateTime),
    }
}

/// Converts a lookup value the way the field would store it.
fn to_field_value(kind: FieldKind, value: &Value, tz: Tz) -> Result<FieldValue, LookupError> {
    let converted = match (kind, value) {
        (_, Value::Null) => {
            return Err(LookupError::Value(
                "None is not allowed as a range bound".to_string(),
            ))
        }
        (_, Value::Int(i)) => {
            return Err(LookupError::Value(format!(
                "'{i}' value has an invalid date format"
            )))
        }
        (FieldKind::Date, Value::Date(d)) => FieldValue::Date(*d),
        (FieldKind::Date, Value::DateTime(dt)) => FieldValue::Date(dt.date()),
        (FieldKind::Date, Value::DateTimeTz(dt)) => {
            FieldValue::Date(dt.with_timezone(&tz).date_naive())
        }
        (FieldKind::Date, Value::String(s)) => {
            FieldValue::Date(parse_date(s).ok_or_else(|| invalid_date(s))?)
        }
        (FieldKind::DateTime, Value::DateTimeTz(dt)) => FieldValue::DateTime(*dt),
        (FieldKind::DateTime, Value::DateTime(naive)) => {
            let aware = aware_utc(*naive, tz).ok_or_else(|| invalid_date(&naive.to_string()))?;
            FieldValue::DateTime(aware)
        }
        (FieldKind::DateTime, Value::Date(d)) => FieldValue::DateTime(
            aware_utc(d.and_time(chrono::NaiveTime::MIN), tz)
                .ok_or_else(|| invalid_date(&d.to_string()))?,
        ),
        (FieldKind::DateTime, Value::String(s)) => {
            FieldValue::DateTime(parse_datetime(s, tz).ok_or_else(|| invalid_date(s))?)
        }
    };

    let year = match converted {
        FieldValue::Date(d) => d.year(),
        FieldValue::DateTime(dt) => dt.year(),
    };
    if (1..=9999).contains(&year) {
        Ok(converted)
    } else {
        Err(LookupError::Validation(
            ValidationError::new(format!("year {year} is out of range"), "invalid_date")
                .with_param("value", value.to_string()),
        ))
    }
}

fn invalid_date(raw: &str) -> LookupError {
    LookupError::Validation(
        ValidationError::new(
            format!("'{raw}' value has an invalid date format. It must be in YYYY-MM-DD format."),
            "invalid_date",
        )
        .with_param("value", raw),
    )
}

fn aware_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    timezone::make_aware(naive, tz).map(|dt| dt.with_timezone(&Utc))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    // Four-digit years only; chrono accepts signed, wider years.
    (raw.len() == 10).then_some(date)
}

fn parse_datetime(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| parse_date(raw).map(|d| d.and_time(chrono::NaiveTime::MIN)))
        .and_then(|naive| aware_utc(naive, tz))
}
