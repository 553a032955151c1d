//! The date-time range filter: split date and time inputs per bound.

use chrono::Utc;
use chrono_tz::Tz;
use rangefilter2_core::i18n::timezone::{self, MaybeAware};
use rangefilter2_core::i18n::CalendarSystem;
use rangefilter2_core::settings::Settings;
use rangefilter2_core::utils::text::escape_html;
use rangefilter2_core::{FilterResult, ValidationError};

use super::{FilterBase, FilterChoice, ListFilter};
use crate::changelist::ChangeList;
use crate::fields::SplitJalaliDateTimeField;
use crate::lookups::{LookupParams, Value};
use crate::media::Media;
use crate::request::FilterRequest;
use crate::widgets::{AdminSplitJalaliDateTime, Widget};

/// One side of the range: its form field, what was submitted and what it cleaned to.
#[derive(Debug, Clone)]
struct Bound {
    lookup: String,
    field: SplitJalaliDateTimeField,
    raw: [Option<String>; 2],
    value: Option<Value>,
    error: Option<ValidationError>,
}

impl Bound {
    fn raw_parts(&self) -> [Option<&str>; 2] {
        [self.raw[0].as_deref(), self.raw[1].as_deref()]
    }
}

/// Bounds a date-time field with a date input and a time input per side.
///
/// The parameters are `<field>__gte_0` (date), `<field>__gte_1` (time) and
/// the same for `__lte`. Dates are entered in the request's calendar; Persian
/// input is converted to the Gregorian calendar and, with `use_tz`, made
/// aware in the default timezone before it reaches the ORM. A bound whose
/// input does not validate is left open and its error shown in the form.
///
/// # Examples
///
/// ```
/// use rangefilter2::filters::{DateTimeRangeFilter, ListFilter};
/// use rangefilter2::request::FilterRequest;
/// use rangefilter2_core::Settings;
///
/// let request = FilterRequest::from_query_string("created__gte_0=1403-01-01&created__gte_1=08:00")
///     .with_language("fa");
/// let filter = DateTimeRangeFilter::new("created", &request, &Settings::default()).unwrap();
/// let params = filter.lookup_params();
/// assert_eq!(params.get("created__gte").unwrap().to_string(), "2024-03-20T08:00:00+00:00");
/// ```
#[derive(Debug, Clone)]
pub struct DateTimeRangeFilter {
    base: FilterBase,
    bounds: [Bound; 2],
}

impl DateTimeRangeFilter {
    /// Reads and cleans the filter's form data from `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownTimeZone`](rangefilter2_core::FilterError::UnknownTimeZone)
    /// if the configured default timezone does not exist.
    pub fn new(field_path: &str, request: &FilterRequest, settings: &Settings) -> FilterResult<Self> {
        let base = FilterBase::new(field_path, request, settings)?;
        let default_tz = settings.default_timezone()?;
        let aware = settings.use_tz.then_some(default_tz);

        let gte = build_bound(&base, &base.lookup_kwarg_gte, "From date", request, aware);
        let lte = build_bound(&base, &base.lookup_kwarg_lte, "To date", request, aware);
        Ok(Self {
            base,
            bounds: [gte, lte],
        })
    }

    /// Overrides the title derived from the field path.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.base.title = title.into();
        self
    }

    /// The calendar dates are entered in.
    pub const fn calendar(&self) -> CalendarSystem {
        self.base.calendar
    }

    /// Validation errors by lookup name, for bounds that were dropped.
    pub fn errors(&self) -> Vec<(&str, &ValidationError)> {
        self.bounds
            .iter()
            .filter_map(|b| b.error.as_ref().map(|e| (b.lookup.as_str(), e)))
            .collect()
    }

    /// Renders both split inputs with any validation errors.
    pub fn render_form(&self) -> String {
        self.bounds
            .iter()
            .map(|bound| {
                let errors = bound
                    .error
                    .as_ref()
                    .map(|e| format!(r#"<ul class="errorlist"><li>{}</li></ul>"#, escape_html(&e.message)))
                    .unwrap_or_default();
                format!("{errors}{}", bound.field.render(&bound.lookup, bound.raw_parts()))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn build_bound(
    base: &FilterBase,
    lookup: &str,
    placeholder: &str,
    request: &FilterRequest,
    aware: Option<Tz>,
) -> Bound {
    let widget = AdminSplitJalaliDateTime::new(base.calendar).placeholder(placeholder);
    let field = SplitJalaliDateTimeField::new(widget)
        .label("")
        .localize(true)
        .required(false)
        .language(base.language_code.clone());
    let raw = field.value_from_data(request, lookup);

    let (value, error) = match field.clean([raw[0].as_deref(), raw[1].as_deref()]) {
        Ok(cleaned) => {
            let value = cleaned
                .and_then(|dt| dt.to_gregorian())
                .and_then(|naive| match aware {
                    Some(tz) => timezone::normalize_or_localize(MaybeAware::Naive(naive), tz)
                        .map(|dt| Value::DateTimeTz(dt.with_timezone(&Utc))),
                    None => Some(Value::DateTime(naive)),
                });
            (value, None)
        }
        Err(err) => {
            tracing::debug!(parameter = lookup, error = %err, "ignoring invalid date-time bound");
            (None, Some(err))
        }
    };

    Bound {
        lookup: lookup.to_string(),
        field,
        raw,
        value,
        error,
    }
}

impl ListFilter for DateTimeRangeFilter {
    fn filter_name(&self) -> &'static str {
        "DateTimeRangeFilter"
    }

    fn title(&self) -> &str {
        &self.base.title
    }

    fn field_path(&self) -> &str {
        &self.base.field_path
    }

    fn expected_parameters(&self) -> Vec<String> {
        self.bounds
            .iter()
            .flat_map(|b| (0..2).map(move |i| format!("{}_{i}", b.lookup)))
            .collect()
    }

    fn choices(&self, changelist: &ChangeList) -> Vec<FilterChoice> {
        let [gte, lte] = &self.bounds;
        vec![self.base.choice(
            changelist,
            &self.expected_parameters(),
            gte.raw[0].clone().unwrap_or_default(),
            lte.raw[0].clone().unwrap_or_default(),
            Some(self.render_form()),
        )]
    }

    fn template(&self) -> &'static str {
        self.base.template
    }

    fn media(&self) -> Media {
        self.bounds[0].field.widget().media().merge(&self.base.media())
    }

    fn lookup_params(&self) -> LookupParams {
        self.bounds
            .iter()
            .filter_map(|b| b.value.clone().map(|v| (b.lookup.clone(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn filter_with(query: &str, language: &str, settings: &Settings) -> DateTimeRangeFilter {
        timezone::deactivate();
        let request = FilterRequest::from_query_string(query).with_language(language);
        DateTimeRangeFilter::new("created", &request, settings).unwrap()
    }

    fn filter(query: &str, language: &str) -> DateTimeRangeFilter {
        filter_with(query, language, &Settings::default())
    }

    #[test]
    fn test_expected_parameters() {
        let f = filter("", "en");
        assert_eq!(
            f.expected_parameters(),
            vec!["created__gte_0", "created__gte_1", "created__lte_0", "created__lte_1"]
        );
    }

    #[test]
    fn test_empty_form_has_no_bounds() {
        let f = filter("", "fa");
        assert!(f.lookup_params().is_empty());
        assert!(f.errors().is_empty());
    }

    #[test]
    fn test_persian_bounds_become_aware_gregorian() {
        let settings = Settings {
            time_zone: "Asia/Tehran".to_string(),
            ..Settings::default()
        };
        let f = filter_with(
            "created__gte_0=1403/01/01&created__gte_1=00:00&created__lte_0=۱۴۰۳-۰۱-۰۵&created__lte_1=23:59:59",
            "fa-ir",
            &settings,
        );
        let params = f.lookup_params();
        assert_eq!(
            params.get("created__gte").unwrap().to_string(),
            "2024-03-19T20:30:00+00:00"
        );
        assert_eq!(
            params.get("created__lte").unwrap().to_string(),
            "2024-03-24T20:29:59+00:00"
        );
    }

    #[test]
    fn test_naive_without_use_tz() {
        let settings = Settings {
            use_tz: false,
            ..Settings::default()
        };
        let f = filter_with("created__lte_0=2024-03-20&created__lte_1=12:00", "en", &settings);
        let expected = NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(f.lookup_params().get("created__lte"), Some(&Value::DateTime(expected)));
    }

    #[test]
    fn test_invalid_bound_is_dropped_with_error() {
        let f = filter(
            "created__gte_0=2024-02-30&created__gte_1=10:00&created__lte_0=2024-03-01&created__lte_1=10:00",
            "en",
        );
        let params = f.lookup_params();
        assert!(!params.contains_key("created__gte"));
        assert!(params.contains_key("created__lte"));
        let errors = f.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "created__gte");
        assert_eq!(errors[0].1.code, "invalid_date");
        assert!(f.render_form().contains(r#"<ul class="errorlist"><li>Enter a valid date.</li></ul>"#));
    }

    #[test]
    fn test_date_without_time_is_dropped() {
        let f = filter("created__gte_0=2024-03-01", "en");
        assert!(f.lookup_params().is_empty());
        assert_eq!(f.errors()[0].1.code, "invalid_time");
    }

    #[test]
    fn test_choices_carry_form() {
        let query = "created__gte_0=1403-01-01&created__gte_1=08:00&o=1";
        let f = filter(query, "fa");
        let cl = ChangeList::from_request(&FilterRequest::from_query_string(query));
        let choice = &f.choices(&cl)[0];
        assert_eq!(choice.query_string, "?o=1");
        assert_eq!(choice.date_start, "1403-01-01");
        assert_eq!(choice.date_end, "");
        let form = choice.form.as_deref().unwrap();
        assert!(form.contains(r#"name="created__gte_0" value="1403-01-01""#));
        assert!(form.contains(r#"placeholder="از تاریخ""#));
        assert!(form.contains(r#"placeholder="تا تاریخ""#));
    }

    #[test]
    fn test_media_merges_widget_and_filter_assets() {
        let f = filter("", "fa");
        let media = f.media();
        assert_eq!(media.js()[0], "admin/js/django_jalali.min.js");
        assert!(media.js().contains(&"rangefilter2/persian-datepicker.js".to_string()));
        assert!(media.css()["all"].contains(&"rangefilter2/persian-datepicker.css".to_string()));
    }
}
