//! Admin list filters bounding a date or date-time field.
//!
//! A [`ListFilter`] is built once per changelist request from the request's
//! query parameters. It exposes the parameter names it consumes, the template
//! context the sidebar renders ([`FilterChoice`]), the media it needs, and the
//! keyword lookups it narrows the list's [`QuerySet`] with.

pub mod date_range;
pub mod datetime_range;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono_tz::Tz;
use rangefilter2_core::i18n::{timezone, CalendarSystem};
use rangefilter2_core::logging::filter_span;
use rangefilter2_core::settings::Settings;
use rangefilter2_core::utils::text::{capfirst, slugify, verbose_name};
use rangefilter2_core::{FilterError, FilterResult};
use serde::Serialize;

use crate::changelist::ChangeList;
use crate::lookups::{LookupError, LookupParams};
use crate::media::Media;
use crate::queryset::QuerySet;
use crate::request::FilterRequest;
use crate::templates::{select_template, CSP_INIT_SCRIPT_PATH, DATE_FILTER_CSP_TEMPLATE};

pub use date_range::DateRangeFilter;
pub use datetime_range::DateTimeRangeFilter;

/// The format dates are handed to the datepicker and the ORM in.
pub const DATE_PICKER_FORMAT: &str = "%Y-%m-%d";

/// The template context for one rendering of a range filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChoice {
    /// The lower bound for the datepicker, empty when unset.
    pub date_start: String,
    /// The upper bound for the datepicker, empty when unset.
    pub date_end: String,
    /// The submitted lower bound in epoch milliseconds, empty when unset.
    pub value_gte_ms: String,
    /// The submitted upper bound in epoch milliseconds, empty when unset.
    pub value_lte_ms: String,
    /// A DOM-safe identifier for the filter.
    pub system_name: String,
    /// The current query string without this filter's parameters.
    pub query_string: String,
    /// The calendar the datepicker shows.
    pub calendar: CalendarSystem,
    /// The parameter name of the lower bound.
    pub lookup_kwarg_gte: String,
    /// The parameter name of the upper bound.
    pub lookup_kwarg_lte: String,
    /// Pre-rendered form inputs, for filters that render their own.
    pub form: Option<String>,
    /// The other list parameters, resubmitted as hidden inputs.
    pub preserved: Vec<PreservedParam>,
}

/// A query parameter the filter form carries over unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreservedParam {
    /// The parameter name.
    pub name: String,
    /// The parameter value.
    pub value: String,
}

/// An admin list filter.
pub trait ListFilter {
    /// A short name identifying the filter type in logs.
    fn filter_name(&self) -> &'static str;

    /// The heading shown above the filter.
    fn title(&self) -> &str;

    /// The model field path the filter bounds.
    fn field_path(&self) -> &str;

    /// The query parameters this filter consumes.
    fn expected_parameters(&self) -> Vec<String>;

    /// Whether the filter renders anything.
    fn has_output(&self) -> bool {
        true
    }

    /// The template contexts to render.
    fn choices(&self, changelist: &ChangeList) -> Vec<FilterChoice>;

    /// The template the sidebar entry is rendered with.
    fn template(&self) -> &'static str;

    /// The assets the rendered filter needs.
    fn media(&self) -> Media;

    /// The keyword lookups applied to the list's query.
    fn lookup_params(&self) -> LookupParams;

    /// Narrows `queryset` by [`lookup_params`](ListFilter::lookup_params).
    ///
    /// # Errors
    ///
    /// Values the ORM cannot convert or validate surface as
    /// [`FilterError::IncorrectLookupParameters`]. A field or lookup the ORM
    /// does not know is a [`FilterError::Configuration`] error.
    fn queryset<Q: QuerySet>(&self, queryset: Q) -> FilterResult<Q>
    where
        Self: Sized,
    {
        let span = filter_span(self.filter_name(), self.field_path());
        let _guard = span.enter();

        let params = self.lookup_params();
        tracing::debug!(lookups = ?params.keys(), "applying range filter");
        queryset.filter(&params).map_err(|err| {
            tracing::warn!(error = %err, "range filter rejected");
            match err {
                LookupError::Value(message) => FilterError::IncorrectLookupParameters(message),
                LookupError::Validation(err) => {
                    FilterError::IncorrectLookupParameters(err.to_string())
                }
                other => FilterError::Configuration(other.to_string()),
            }
        })
    }
}

/// A DOM identifier derived from a title.
///
/// Titles that slugify to nothing (for example Persian ones) fall back to a
/// hash of the title, stable for the lifetime of the process.
///
/// # Examples
///
/// ```
/// use rangefilter2::filters::system_name;
///
/// assert_eq!(system_name("Created at"), "created-at");
/// assert!(system_name("تاریخ").chars().all(|c| c.is_ascii_digit()));
/// ```
pub fn system_name(title: &str) -> String {
    let slug = slugify(title);
    if !slug.is_empty() {
        return slug;
    }
    let mut hasher = DefaultHasher::new();
    title.hash(&mut hasher);
    hasher.finish().to_string()
}

/// State shared by both range filters.
#[derive(Debug, Clone)]
pub(crate) struct FilterBase {
    pub(crate) field_path: String,
    pub(crate) title: String,
    pub(crate) lookup_kwarg_gte: String,
    pub(crate) lookup_kwarg_lte: String,
    pub(crate) calendar: CalendarSystem,
    pub(crate) language_code: String,
    pub(crate) timezone: Tz,
    pub(crate) debug: bool,
    pub(crate) template: &'static str,
}

impl FilterBase {
    pub(crate) fn new(field_path: &str, request: &FilterRequest, settings: &Settings) -> FilterResult<Self> {
        // An activated zone wins over the configured default.
        let timezone = if timezone::is_active() {
            timezone::get_current_timezone()
        } else {
            settings.default_timezone()?
        };
        Ok(Self {
            field_path: field_path.to_string(),
            title: capfirst(&verbose_name(field_path)),
            lookup_kwarg_gte: format!("{field_path}__gte"),
            lookup_kwarg_lte: format!("{field_path}__lte"),
            calendar: CalendarSystem::from_language_code(request.language_code()),
            language_code: request.language_code().to_string(),
            timezone,
            debug: settings.debug,
            template: select_template(settings.framework_version, settings.csp_nonce),
        })
    }

    /// The datepicker assets, minified names when `debug` is on.
    ///
    /// The CSP template has no inline script, so its initializer is added.
    pub(crate) fn media(&self) -> Media {
        let ext = if self.debug { ".min" } else { "" };
        let media = Media::new()
            .with_js(format!("rangefilter2/persian-date{ext}.js"))
            .with_js(format!("rangefilter2/persian-datepicker{ext}.js"))
            .with_css("all", format!("rangefilter2/persian-datepicker{ext}.css"));
        if self.template == DATE_FILTER_CSP_TEMPLATE {
            media.with_js(CSP_INIT_SCRIPT_PATH)
        } else {
            media
        }
    }

    pub(crate) fn choice(
        &self,
        changelist: &ChangeList,
        expected: &[String],
        date_start: String,
        date_end: String,
        form: Option<String>,
    ) -> FilterChoice {
        FilterChoice {
            date_start,
            date_end,
            value_gte_ms: String::new(),
            value_lte_ms: String::new(),
            system_name: system_name(&self.title),
            query_string: changelist.get_query_string(&[], expected),
            calendar: self.calendar,
            lookup_kwarg_gte: self.lookup_kwarg_gte.clone(),
            lookup_kwarg_lte: self.lookup_kwarg_lte.clone(),
            form,
            preserved: changelist
                .params_without(expected)
                .map(|(name, value)| PreservedParam {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}
