//! Widgets for the date-time range inputs.
//!
//! The split date-time widget renders a date input and a time input under
//! the names `<name>_0` and `<name>_1`. In the Persian calendar the date input
//! carries the class the Jalali datepicker script attaches to; otherwise it
//! uses the admin's own `vDateField`.

use std::collections::BTreeMap;
use std::fmt;

use rangefilter2_core::i18n::{self, CalendarSystem};
use rangefilter2_core::utils::text::escape_html;

use crate::media::Media;
use crate::request::FilterRequest;

/// An HTML form widget.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Renders the widget for `name` with an optional current value.
    fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String;

    /// Extracts the submitted value for `name`.
    fn value_from_data(&self, data: &FilterRequest, name: &str) -> Option<String> {
        data.get(name).map(str::to_string)
    }

    /// Assets the widget needs on the page.
    fn media(&self) -> Media {
        Media::new()
    }
}

/// Formats attributes as ` key="value"` pairs in key order, escaping values.
fn render_attrs(attrs: &BTreeMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape_html(v)))
        .collect()
}

/// A text input used for dates, classed for the calendar's datepicker.
#[derive(Debug, Clone, Copy)]
pub struct DateTextInput {
    calendar: CalendarSystem,
}

impl DateTextInput {
    /// Creates a date input for `calendar`.
    pub const fn new(calendar: CalendarSystem) -> Self {
        Self { calendar }
    }

    const fn class(self) -> &'static str {
        match self.calendar {
            CalendarSystem::Persian => "jalali_date-date",
            CalendarSystem::Gregorian => "vDateField",
        }
    }
}

impl Widget for DateTextInput {
    fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
        let mut attrs = attrs.clone();
        attrs.insert("class".to_string(), self.class().to_string());
        attrs.insert("size".to_string(), "10".to_string());
        attrs.insert("data-calendar".to_string(), self.calendar.name().to_string());
        text_input(name, value, &attrs)
    }

    fn media(&self) -> Media {
        match self.calendar {
            CalendarSystem::Persian => Media::new()
                .with_js("admin/js/django_jalali.min.js")
                .with_css("all", "admin/jquery.ui.datepicker.jalali/themes/base/jquery-ui.min.css")
                .with_css("all", "admin/css/main.css"),
            CalendarSystem::Gregorian => Media::new()
                .with_js("admin/js/calendar.js")
                .with_js("admin/js/admin/DateTimeShortcuts.js"),
        }
    }
}

/// A text input used for times of day.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeTextInput;

impl Widget for TimeTextInput {
    fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
        let mut attrs = attrs.clone();
        attrs.insert("class".to_string(), "vTimeField".to_string());
        attrs.insert("size".to_string(), "8".to_string());
        text_input(name, value, &attrs)
    }

    fn media(&self) -> Media {
        Media::new()
            .with_js("admin/js/calendar.js")
            .with_js("admin/js/admin/DateTimeShortcuts.js")
    }
}

fn text_input(name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
    let value = value
        .filter(|v| !v.is_empty())
        .map(|v| format!(r#" value="{}""#, escape_html(v)))
        .unwrap_or_default();
    format!(
        r#"<input type="text" name="{}"{value}{}>"#,
        escape_html(name),
        render_attrs(attrs)
    )
}

/// A date input and a time input rendered side by side.
///
/// # Examples
///
/// ```
/// use rangefilter2::widgets::AdminSplitJalaliDateTime;
/// use rangefilter2_core::CalendarSystem;
///
/// let widget = AdminSplitJalaliDateTime::new(CalendarSystem::Persian).placeholder("From date");
/// let html = widget.render_split("created__gte", [Some("1403-01-01"), None], "en");
/// assert!(html.contains(r#"name="created__gte_0" value="1403-01-01""#));
/// assert!(html.contains(r#"name="created__gte_1""#));
/// assert!(html.contains("jalali_date-date"));
/// ```
#[derive(Debug, Clone)]
pub struct AdminSplitJalaliDateTime {
    date: DateTextInput,
    time: TimeTextInput,
    attrs: BTreeMap<String, String>,
}

impl AdminSplitJalaliDateTime {
    /// Creates the widget for `calendar` with no extra attributes.
    pub const fn new(calendar: CalendarSystem) -> Self {
        Self {
            date: DateTextInput::new(calendar),
            time: TimeTextInput,
            attrs: BTreeMap::new(),
        }
    }

    /// Sets the `placeholder` attribute on both inputs.
    #[must_use]
    pub fn placeholder(self, text: impl Into<String>) -> Self {
        self.with_attr("placeholder", text)
    }

    /// Sets an attribute on both inputs.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// The attributes shared by both inputs.
    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    /// The calendar the date input is entered in.
    pub const fn calendar(&self) -> CalendarSystem {
        self.date.calendar
    }

    /// Renders both inputs with labels translated into `language_code`.
    ///
    /// The placeholder attribute is translated the same way.
    pub fn render_split(&self, name: &str, value: [Option<&str>; 2], language_code: &str) -> String {
        let mut attrs = self.attrs.clone();
        if let Some(placeholder) = attrs.get_mut("placeholder") {
            *placeholder = i18n::translate(language_code, &*placeholder);
        }
        format!(
            r#"<p class="datetime">{} {}<br>{} {}</p>"#,
            escape_html(&i18n::translate(language_code, "Date:")),
            self.date.render(&format!("{name}_0"), value[0], &attrs),
            escape_html(&i18n::translate(language_code, "Time:")),
            self.time.render(&format!("{name}_1"), value[1], &attrs),
        )
    }

    /// Extracts the date and time parts submitted for `name`.
    pub fn value_from_split(&self, data: &FilterRequest, name: &str) -> [Option<String>; 2] {
        [
            self.date.value_from_data(data, &format!("{name}_0")),
            self.time.value_from_data(data, &format!("{name}_1")),
        ]
    }
}

impl Widget for AdminSplitJalaliDateTime {
    fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
        let mut widget = self.clone();
        widget.attrs.extend(attrs.clone());
        let (date, time) = value.map_or((None, None), |v| match v.split_once(' ') {
            Some((date, time)) => (Some(date), Some(time)),
            None => (Some(v), None),
        });
        widget.render_split(name, [date, time], &i18n::get_language())
    }

    fn value_from_data(&self, data: &FilterRequest, name: &str) -> Option<String> {
        match self.value_from_split(data, name) {
            [None, None] => None,
            [date, time] => Some(format!(
                "{} {}",
                date.unwrap_or_default(),
                time.unwrap_or_default()
            )),
        }
    }

    fn media(&self) -> Media {
        self.date.media().merge(&self.time.media())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_attrs_escaped_and_sorted() {
        let mut attrs = BTreeMap::new();
        attrs.insert("z".to_string(), "1".to_string());
        attrs.insert("a".to_string(), "\"x\"".to_string());
        assert_eq!(render_attrs(&attrs), r#" a="&quot;x&quot;" z="1""#);
    }

    #[test]
    fn test_date_input_gregorian() {
        let html = DateTextInput::new(CalendarSystem::Gregorian).render("d", Some("2024-03-20"), &BTreeMap::new());
        assert_eq!(
            html,
            r#"<input type="text" name="d" value="2024-03-20" class="vDateField" data-calendar="gregorian" size="10">"#
        );
    }

    #[test]
    fn test_time_input_omits_empty_value() {
        let html = TimeTextInput.render("t", Some(""), &BTreeMap::new());
        assert_eq!(html, r#"<input type="text" name="t" class="vTimeField" size="8">"#);
    }

    #[test]
    fn test_split_render_persian_labels_and_placeholder() {
        let widget = AdminSplitJalaliDateTime::new(CalendarSystem::Persian).placeholder("To date");
        let html = widget.render_split("created__lte", [Some("1403/01/05"), Some("10:30")], "fa");
        assert!(html.starts_with(r#"<p class="datetime">تاریخ: <input type="text" name="created__lte_0""#));
        assert!(html.contains(r#"placeholder="تا تاریخ""#));
        assert!(html.contains(r#"name="created__lte_1" value="10:30""#));
        assert!(html.contains("زمان:"));
    }

    #[test]
    fn test_split_render_escapes_values() {
        let widget = AdminSplitJalaliDateTime::new(CalendarSystem::Gregorian);
        let html = widget.render_split("x", [Some("\"><script>"), None], "en");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_value_from_split() {
        let widget = AdminSplitJalaliDateTime::new(CalendarSystem::Persian);
        let data = FilterRequest::from_query_string("c__gte_0=1403-01-01&c__gte_1=08:00");
        assert_eq!(
            widget.value_from_split(&data, "c__gte"),
            [Some("1403-01-01".to_string()), Some("08:00".to_string())]
        );
        assert_eq!(
            widget.value_from_data(&data, "c__gte"),
            Some("1403-01-01 08:00".to_string())
        );
        assert_eq!(widget.value_from_data(&data, "c__lte"), None);
    }

    #[test]
    fn test_media_depends_on_calendar() {
        let persian = AdminSplitJalaliDateTime::new(CalendarSystem::Persian).media();
        assert!(persian.js().contains(&"admin/js/django_jalali.min.js".to_string()));
        assert_eq!(persian.css()["all"].len(), 2);

        let gregorian = AdminSplitJalaliDateTime::new(CalendarSystem::Gregorian).media();
        assert_eq!(
            gregorian.js(),
            ["admin/js/calendar.js", "admin/js/admin/DateTimeShortcuts.js"]
        );
        assert!(gregorian.css().is_empty());
    }
}
