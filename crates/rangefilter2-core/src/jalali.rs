//! The Jalali (Solar Hijri) calendar.
//!
//! [`JalaliDate`] and [`JalaliDateTime`] convert to and from chrono's
//! Gregorian types through ICU4X's arithmetic Persian calendar. This module
//! adds the parsing and `strftime`-style formatting the filters need.
//!
//! ```
//! use chrono::NaiveDate;
//! use rangefilter2_core::jalali::JalaliDate;
//!
//! let nowruz = JalaliDate::new(1403, 1, 1).unwrap();
//! assert_eq!(nowruz.to_gregorian(), NaiveDate::from_ymd_opt(2024, 3, 20));
//! assert_eq!(nowruz.format("%Y/%m/%d"), "1403/01/01");
//! ```

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use icu_calendar::persian::Persian;
use icu_calendar::{Date, Iso};

use crate::error::ValidationError;

const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

fn persian_date(year: i32, month: u32, day: u32) -> Option<Date<Persian>> {
    let month = u8::try_from(month).ok()?;
    let day = u8::try_from(day).ok()?;
    Date::try_new_persian_date(year, month, day).ok()
}

/// Returns `true` if `year` is a Jalali leap year.
pub fn is_leap_year(year: i32) -> bool {
    persian_date(year, 1, 1).is_some_and(|date| date.days_in_year() == 366)
}

/// Returns the number of days in a Jalali month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    persian_date(year, month, 1).map(|date| u32::from(date.days_in_month()))
}

/// Replaces Persian (`۰`-`۹`) and Arabic-Indic (`٠`-`٩`) digits with ASCII digits.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::jalali::normalize_digits;
///
/// assert_eq!(normalize_digits("۱۴۰۳/۰۱/۰۱"), "1403/01/01");
/// assert_eq!(normalize_digits("٢٠٢٤"), "2024");
/// ```
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            _ => c,
        })
        .collect()
}

/// A date in the Jalali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
}

impl JalaliDate {
    /// Creates a date, returning `None` if it does not exist.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        persian_date(year, month, day)?;
        Some(Self { year, month, day })
    }

    /// Converts a Gregorian date.
    pub fn from_gregorian(date: NaiveDate) -> Option<Self> {
        let month = u8::try_from(date.month()).ok()?;
        let day = u8::try_from(date.day()).ok()?;
        let persian = Date::try_new_iso_date(date.year(), month, day)
            .ok()?
            .to_calendar(Persian);
        Some(Self {
            year: persian.year().number,
            month: persian.month().ordinal,
            day: persian.day_of_month().0,
        })
    }

    /// Converts to the Gregorian calendar.
    pub fn to_gregorian(self) -> Option<NaiveDate> {
        let iso: Date<Iso> = persian_date(self.year, self.month, self.day)?.to_iso();
        NaiveDate::from_ymd_opt(iso.year().number, iso.month().ordinal, iso.day_of_month().0)
    }

    /// Parses `Y-m-d` or `Y/m/d`, accepting Persian and Arabic-Indic digits.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with code `invalid_date` if the input is
    /// malformed or names a date that does not exist.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || {
            ValidationError::new("Enter a valid date.", "invalid_date").with_param("value", input)
        };

        let normalized = normalize_digits(input.trim());
        let parts: Vec<&str> = normalized.split(['-', '/']).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        if year.len() != 4 {
            return Err(invalid());
        }

        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month, day).ok_or_else(invalid)
    }

    /// The Jalali year.
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month, 1 (Farvardin) through 12 (Esfand).
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The day of the month.
    pub const fn day(self) -> u32 {
        self.day
    }

    /// The Persian name of the month.
    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Returns `true` if this date falls in a leap year.
    pub fn is_leap_year(self) -> bool {
        is_leap_year(self.year)
    }

    /// Formats with `%Y`, `%y`, `%m`, `%d`, `%B` and `%%`.
    pub fn format(self, pattern: &str) -> String {
        format_with(pattern, self, None)
    }
}

impl fmt::Display for JalaliDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A wall-clock date and time in the Jalali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDateTime {
    date: JalaliDate,
    time: NaiveTime,
}

impl JalaliDateTime {
    /// Combines a Jalali date with a time of day.
    pub const fn new(date: JalaliDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    /// Converts a naive Gregorian datetime.
    pub fn from_gregorian(dt: NaiveDateTime) -> Option<Self> {
        Some(Self::new(JalaliDate::from_gregorian(dt.date())?, dt.time()))
    }

    /// Converts an aware datetime using its own wall-clock reading.
    pub fn from_datetime<T: TimeZone>(dt: &DateTime<T>) -> Option<Self> {
        Self::from_gregorian(dt.naive_local())
    }

    /// Builds the wall-clock reading of a UNIX timestamp in `tz`.
    pub fn from_timestamp<T: TimeZone>(secs: i64, nanos: u32, tz: &T) -> Option<Self> {
        let utc = DateTime::from_timestamp(secs, nanos)?;
        Self::from_datetime(&utc.with_timezone(tz))
    }

    /// Converts to a naive Gregorian datetime.
    pub fn to_gregorian(self) -> Option<NaiveDateTime> {
        Some(self.date.to_gregorian()?.and_time(self.time))
    }

    /// The date part.
    pub const fn date(self) -> JalaliDate {
        self.date
    }

    /// The time part.
    pub const fn time(self) -> NaiveTime {
        self.time
    }

    /// Formats with the date directives of [`JalaliDate::format`] plus
    /// `%H`, `%M` and `%S`.
    pub fn format(self, pattern: &str) -> String {
        format_with(pattern, self.date, Some(self.time))
    }
}

impl fmt::Display for JalaliDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time.format("%H:%M:%S"))
    }
}

fn format_with(pattern: &str, date: JalaliDate, time: Option<NaiveTime>) -> String {
    let time = time.unwrap_or(NaiveTime::MIN);
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('Y') => out.push_str(&format!("{:04}", date.year)),
            Some('y') => out.push_str(&format!("{:02}", date.year.rem_euclid(100))),
            Some('m') => out.push_str(&format!("{:02}", date.month)),
            Some('d') => out.push_str(&format!("{:02}", date.day)),
            Some('B') => out.push_str(date.month_name()),
            Some('H') => out.push_str(&format!("{:02}", time.hour())),
            Some('M') => out.push_str(&format!("{:02}", time.minute())),
            Some('S') => out.push_str(&format!("{:02}", time.second())),
            Some('%') => out.push('%'),
            Some(other) => {
                out.push('%');
                out.push(other);
            }
            None => out.push('%'),
        }
    }
    out
}
