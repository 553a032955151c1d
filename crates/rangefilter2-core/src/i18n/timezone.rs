//! Timezone support.
//!
//! Thread-local timezone activation plus the two conversions the filters need:
//! attaching a zone to a naive datetime ([`make_aware`]) and moving an aware
//! datetime into a zone ([`localtime`]). Zones are IANA names resolved by
//! `chrono-tz`, so DST transitions follow the tz database.
//!
//! ```
//! use rangefilter2_core::i18n::timezone;
//!
//! timezone::activate(chrono_tz::Asia::Tehran);
//! assert_eq!(timezone::get_current_timezone(), chrono_tz::Asia::Tehran);
//! timezone::deactivate();
//! ```

use std::cell::RefCell;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::settings::SETTINGS;

thread_local! {
    static CURRENT_TIMEZONE: RefCell<Option<Tz>> = const { RefCell::new(None) };
}

/// Activates a timezone for the current thread.
pub fn activate(tz: Tz) {
    CURRENT_TIMEZONE.with(|cell| {
        *cell.borrow_mut() = Some(tz);
    });
}

/// Deactivates the current thread's timezone, reverting to the default.
pub fn deactivate() {
    CURRENT_TIMEZONE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns `true` if a timezone has been activated for the current thread.
pub fn is_active() -> bool {
    CURRENT_TIMEZONE.with(|cell| cell.borrow().is_some())
}

/// Returns the default timezone from the global settings.
///
/// An unknown zone name falls back to UTC with a warning.
pub fn get_default_timezone() -> Tz {
    SETTINGS.get().default_timezone().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to UTC");
        Tz::UTC
    })
}

/// Returns the current thread's timezone, or the default if none is active.
pub fn get_current_timezone() -> Tz {
    CURRENT_TIMEZONE
        .with(|cell| *cell.borrow())
        .unwrap_or_else(get_default_timezone)
}

/// Converts an aware datetime into `tz`.
pub fn localtime<T: TimeZone>(dt: &DateTime<T>, tz: Tz) -> DateTime<Tz> {
    dt.with_timezone(&tz)
}

/// Attaches `tz` to a naive wall-clock datetime.
///
/// Ambiguous times (a DST fall-back overlap) resolve to the standard-time
/// reading, the later of the two instants. Non-existent times (a spring-forward gap) are shifted forward by
/// the gap so that the result stays on the requested side of the range.
/// Returns `None` only if no reading exists within two hours of `naive`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rangefilter2_core::i18n::timezone::make_aware;
///
/// let naive = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let aware = make_aware(naive, chrono_tz::Asia::Tehran).unwrap();
/// assert_eq!(aware.to_rfc3339(), "2024-06-01T12:00:00+03:30");
/// ```
pub fn make_aware(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(_, standard) => Some(standard),
        LocalResult::None => (1..=4)
            .map(|quarters| naive + Duration::minutes(30 * quarters))
            .find_map(|shifted| tz.from_local_datetime(&shifted).earliest()),
    }
}

/// Normalizes an aware datetime into `tz`, or localizes a naive one.
pub fn normalize_or_localize(value: MaybeAware, tz: Tz) -> Option<DateTime<Tz>> {
    match value {
        MaybeAware::Aware(dt) => Some(localtime(&dt, tz)),
        MaybeAware::Naive(naive) => make_aware(naive, tz),
    }
}

/// A datetime that may or may not carry a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaybeAware {
    /// Already attached to a zone.
    Aware(DateTime<Tz>),
    /// A wall-clock reading without zone.
    Naive(NaiveDateTime),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn setup() {
        deactivate();
    }

    #[test]
    fn test_default_is_settings_zone() {
        setup();
        assert!(!is_active());
        assert_eq!(get_current_timezone(), Tz::UTC);
    }

    #[test]
    fn test_activate_and_deactivate() {
        setup();
        activate(chrono_tz::Asia::Tehran);
        assert!(is_active());
        assert_eq!(get_current_timezone(), chrono_tz::Asia::Tehran);
        deactivate();
        assert_eq!(get_current_timezone(), Tz::UTC);
    }

    #[test]
    fn test_localtime() {
        let utc = Tz::UTC.from_utc_datetime(&naive(2024, 1, 1, 3, 0));
        let ny = localtime(&utc, chrono_tz::America::New_York);
        assert_eq!(ny.hour(), 22);
        assert_eq!(ny.naive_local().date(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_make_aware_single() {
        let dt = make_aware(naive(2024, 1, 15, 8, 30), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T08:30:00+01:00");
    }

    #[test]
    fn test_make_aware_ambiguous_picks_standard_time() {
        // 02:30 happens twice in Berlin on 2024-10-27.
        let dt = make_aware(naive(2024, 10, 27, 2, 30), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-10-27T02:30:00+01:00");

        // 01:30 happens twice in New York on 2024-11-03.
        let dt = make_aware(naive(2024, 11, 3, 1, 30), chrono_tz::America::New_York).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-11-03T01:30:00-05:00");
    }

    #[test]
    fn test_make_aware_gap_shifts_forward() {
        // 02:30 does not exist in Berlin on 2024-03-31.
        let dt = make_aware(naive(2024, 3, 31, 2, 30), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-31T03:00:00+02:00");
    }

    #[test]
    fn test_normalize_or_localize() {
        let aware = Tz::UTC.from_utc_datetime(&naive(2024, 6, 1, 0, 0));
        let tehran = chrono_tz::Asia::Tehran;
        let normalized = normalize_or_localize(MaybeAware::Aware(aware), tehran).unwrap();
        assert_eq!(normalized.to_rfc3339(), "2024-06-01T03:30:00+03:30");

        let localized =
            normalize_or_localize(MaybeAware::Naive(naive(2024, 6, 1, 0, 0)), tehran).unwrap();
        assert_eq!(localized.to_rfc3339(), "2024-06-01T00:00:00+03:30");
    }
}
