//! The date range filter: two epoch-millisecond parameters.

use chrono::{DateTime, Utc};
use rangefilter2_core::i18n::CalendarSystem;
use rangefilter2_core::jalali::JalaliDate;
use rangefilter2_core::settings::Settings;
use rangefilter2_core::FilterResult;

use super::{FilterBase, FilterChoice, ListFilter, DATE_PICKER_FORMAT};
use crate::changelist::ChangeList;
use crate::lookups::{LookupParams, Value};
use crate::media::Media;
use crate::request::FilterRequest;

/// Bounds a date field between `<field>__gte` and `<field>__lte`.
///
/// Both parameters are UNIX timestamps in milliseconds, as sent by the
/// datepicker script. Each bound is applied as the calendar date of the
/// timestamp in the current timezone, inclusive on both ends. A missing,
/// empty or unparseable parameter leaves that side of the range open.
///
/// # Examples
///
/// ```
/// use rangefilter2::filters::{DateRangeFilter, ListFilter};
/// use rangefilter2::lookups::Value;
/// use rangefilter2::request::FilterRequest;
/// use rangefilter2_core::Settings;
///
/// let request = FilterRequest::from_query_string("created__gte=1710892800000");
/// let filter = DateRangeFilter::new("created", &request, &Settings::default()).unwrap();
/// let params = filter.lookup_params();
/// assert_eq!(params.get("created__gte"), Some(&Value::from("2024-03-20")));
/// assert!(!params.contains_key("created__lte"));
/// ```
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    base: FilterBase,
    value_gte: Option<DateTime<Utc>>,
    value_lte: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    /// Reads the filter's parameters from `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownTimeZone`](rangefilter2_core::FilterError::UnknownTimeZone)
    /// if no timezone is active and the configured one does not exist.
    pub fn new(field_path: &str, request: &FilterRequest, settings: &Settings) -> FilterResult<Self> {
        let base = FilterBase::new(field_path, request, settings)?;
        let value_gte = read_timestamp(request, &base.lookup_kwarg_gte);
        let value_lte = read_timestamp(request, &base.lookup_kwarg_lte);
        Ok(Self {
            base,
            value_gte,
            value_lte,
        })
    }

    /// Overrides the title derived from the field path.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.base.title = title.into();
        self
    }

    /// The lower bound, if one was given.
    pub const fn value_gte(&self) -> Option<DateTime<Utc>> {
        self.value_gte
    }

    /// The upper bound, if one was given.
    pub const fn value_lte(&self) -> Option<DateTime<Utc>> {
        self.value_lte
    }

    /// The calendar the datepicker shows.
    pub const fn calendar(&self) -> CalendarSystem {
        self.base.calendar
    }

    /// Formats a bound for the datepicker, in the display calendar.
    fn date_for_picker(&self, value: DateTime<Utc>) -> String {
        let local = value.with_timezone(&self.base.timezone);
        match self.base.calendar {
            CalendarSystem::Persian => JalaliDate::from_gregorian(local.date_naive())
                .map(|date| date.format(DATE_PICKER_FORMAT))
                .unwrap_or_default(),
            CalendarSystem::Gregorian => local.format(DATE_PICKER_FORMAT).to_string(),
        }
    }

    /// Formats a bound for the ORM, always Gregorian.
    fn date_for_query(&self, value: DateTime<Utc>) -> String {
        value
            .with_timezone(&self.base.timezone)
            .format(DATE_PICKER_FORMAT)
            .to_string()
    }
}

/// Parses an epoch-millisecond parameter, dropping anything unusable.
fn read_timestamp(request: &FilterRequest, key: &str) -> Option<DateTime<Utc>> {
    let raw = request.get(key)?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = raw
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis);
    if parsed.is_none() {
        tracing::debug!(parameter = key, value = raw, "ignoring malformed timestamp");
    }
    parsed
}

impl ListFilter for DateRangeFilter {
    fn filter_name(&self) -> &'static str {
        "DateRangeFilter"
    }

    fn title(&self) -> &str {
        &self.base.title
    }

    fn field_path(&self) -> &str {
        &self.base.field_path
    }

    fn expected_parameters(&self) -> Vec<String> {
        vec![
            self.base.lookup_kwarg_gte.clone(),
            self.base.lookup_kwarg_lte.clone(),
        ]
    }

    fn choices(&self, changelist: &ChangeList) -> Vec<FilterChoice> {
        let date_start = self.value_gte.map(|v| self.date_for_picker(v)).unwrap_or_default();
        let date_end = self.value_lte.map(|v| self.date_for_picker(v)).unwrap_or_default();
        let mut choice = self.base.choice(
            changelist,
            &self.expected_parameters(),
            date_start,
            date_end,
            None,
        );
        // Resubmitted as-is so an unchanged side survives the next search.
        choice.value_gte_ms = self.value_gte.map(|v| v.timestamp_millis().to_string()).unwrap_or_default();
        choice.value_lte_ms = self.value_lte.map(|v| v.timestamp_millis().to_string()).unwrap_or_default();
        vec![choice]
    }

    fn template(&self) -> &'static str {
        self.base.template
    }

    fn media(&self) -> Media {
        self.base.media()
    }

    fn lookup_params(&self) -> LookupParams {
        let mut params = LookupParams::new();
        if let Some(value) = self.value_gte {
            params.insert(self.base.lookup_kwarg_gte.clone(), Value::String(self.date_for_query(value)));
        }
        if let Some(value) = self.value_lte {
            params.insert(self.base.lookup_kwarg_lte.clone(), Value::String(self.date_for_query(value)));
        }
        params
    }
}
