//! The split date-time form field behind the date-time range filter.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rangefilter2_core::i18n::{self, CalendarSystem};
use rangefilter2_core::jalali::{normalize_digits, JalaliDate, JalaliDateTime};
use rangefilter2_core::ValidationError;

use crate::request::FilterRequest;
use crate::widgets::AdminSplitJalaliDateTime;

const TIME_INPUT_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];
const DATE_INPUT_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// A cleaned date-time in the calendar it was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarDateTime {
    /// Entered in the Jalali calendar.
    Jalali(JalaliDateTime),
    /// Entered in the Gregorian calendar.
    Gregorian(NaiveDateTime),
}

impl CalendarDateTime {
    /// The same wall-clock reading in the Gregorian calendar.
    pub fn to_gregorian(self) -> Option<NaiveDateTime> {
        match self {
            Self::Jalali(dt) => dt.to_gregorian(),
            Self::Gregorian(dt) => Some(dt),
        }
    }
}

/// A date input plus a time input, cleaned into one [`CalendarDateTime`].
///
/// Both parts empty cleans to `None` unless the field is required. One part
/// without the other is invalid.
#[derive(Debug, Clone)]
pub struct SplitJalaliDateTimeField {
    label: String,
    widget: AdminSplitJalaliDateTime,
    localize: bool,
    required: bool,
    language_code: String,
}

impl SplitJalaliDateTimeField {
    /// Creates an optional, localized field rendered with `widget`.
    pub fn new(widget: AdminSplitJalaliDateTime) -> Self {
        Self {
            label: String::new(),
            widget,
            localize: true,
            required: false,
            language_code: i18n::get_language(),
        }
    }

    /// Sets the field label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets whether localized (Persian or Arabic-Indic) digits are accepted.
    #[must_use]
    pub const fn localize(mut self, localize: bool) -> Self {
        self.localize = localize;
        self
    }

    /// Sets whether an empty value is an error.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the language error messages and labels are translated into.
    #[must_use]
    pub fn language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }

    /// The field label.
    pub fn label_text(&self) -> &str {
        &self.label
    }

    /// The widget the field renders with.
    pub const fn widget(&self) -> &AdminSplitJalaliDateTime {
        &self.widget
    }

    /// Returns `true` if the field must have a value.
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Renders the widget for `name` with the submitted parts.
    pub fn render(&self, name: &str, value: [Option<&str>; 2]) -> String {
        self.widget.render_split(name, value, &self.language_code)
    }

    /// Reads the submitted parts for `name` from `data`.
    pub fn value_from_data(&self, data: &FilterRequest, name: &str) -> [Option<String>; 2] {
        self.widget.value_from_split(data, name)
    }

    /// Validates the submitted date and time parts.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with code `required`, `invalid_date` or
    /// `invalid_time`.
    pub fn clean(&self, value: [Option<&str>; 2]) -> Result<Option<CalendarDateTime>, ValidationError> {
        let [date, time] = value.map(|part| {
            part.map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| if self.localize { normalize_digits(p) } else { p.to_string() })
        });

        let (date, time) = match (date, time) {
            (None, None) if self.required => {
                return Err(self.error("This field is required.", "required"));
            }
            (None, None) => return Ok(None),
            (None, Some(_)) => return Err(self.error("Enter a valid date.", "invalid_date")),
            (Some(_), None) => return Err(self.error("Enter a valid time.", "invalid_time")),
            (Some(date), Some(time)) => (date, time),
        };

        let time = TIME_INPUT_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(&time, fmt).ok())
            .ok_or_else(|| self.error("Enter a valid time.", "invalid_time"))?;

        match self.widget.calendar() {
            CalendarSystem::Persian => {
                let date = JalaliDate::parse(&date)
                    .map_err(|_| self.error("Enter a valid date.", "invalid_date"))?;
                Ok(Some(CalendarDateTime::Jalali(JalaliDateTime::new(date, time))))
            }
            CalendarSystem::Gregorian => {
                let date = DATE_INPUT_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(&date, fmt).ok())
                    .ok_or_else(|| self.error("Enter a valid date.", "invalid_date"))?;
                Ok(Some(CalendarDateTime::Gregorian(date.and_time(time))))
            }
        }
    }

    fn error(&self, message: &str, code: &str) -> ValidationError {
        ValidationError::new(i18n::translate(&self.language_code, message), code)
    }
}
