//! Language activation, translation and calendar selection.
//!
//! The active language is thread-local, like the rest of django-rs's i18n
//! support: a host activates the request's language before building list
//! filters and deactivates it afterwards. The [`CalendarSystem`] a filter
//! displays dates in is derived from that language code.
//!
//! ```
//! use rangefilter2_core::i18n::{self, CalendarSystem};
//!
//! i18n::activate("fa-ir");
//! assert_eq!(i18n::gettext("To date"), "تا تاریخ");
//! assert_eq!(CalendarSystem::current(), CalendarSystem::Persian);
//! i18n::deactivate();
//! ```

pub mod catalog;
pub mod timezone;

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::SETTINGS;

thread_local! {
    static CURRENT_LANGUAGE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Activates the given language code for the current thread.
pub fn activate(language_code: &str) {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = Some(language_code.to_string());
    });
}

/// Deactivates the current thread's language, reverting to the settings default.
pub fn deactivate() {
    CURRENT_LANGUAGE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Returns the language code active on the current thread.
///
/// Falls back to [`Settings::language_code`](crate::settings::Settings::language_code).
pub fn get_language() -> String {
    CURRENT_LANGUAGE.with(|cell| {
        cell.borrow()
            .clone()
            .unwrap_or_else(|| SETTINGS.get().language_code.clone())
    })
}

/// Translates a message using the current thread's active language.
///
/// Returns `msgid` unchanged when no translation is registered.
pub fn gettext(msgid: &str) -> String {
    translate(&get_language(), msgid)
}

/// Translates a message into an explicit language, falling back to `msgid`.
pub fn translate(language_code: &str, msgid: &str) -> String {
    catalog::translate(language_code, msgid).unwrap_or_else(|| msgid.to_string())
}

/// The calendar system dates are displayed and entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSystem {
    /// The Jalali (Solar Hijri) calendar.
    Persian,
    /// The Gregorian calendar.
    Gregorian,
}

impl CalendarSystem {
    /// Picks the calendar for a language code.
    ///
    /// Any code containing `fa` (case-insensitive) selects [`CalendarSystem::Persian`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rangefilter2_core::i18n::CalendarSystem;
    ///
    /// assert_eq!(CalendarSystem::from_language_code("fa-IR"), CalendarSystem::Persian);
    /// assert_eq!(CalendarSystem::from_language_code("en-us"), CalendarSystem::Gregorian);
    /// ```
    pub fn from_language_code(language_code: &str) -> Self {
        if language_code.to_lowercase().contains("fa") {
            Self::Persian
        } else {
            Self::Gregorian
        }
    }

    /// The calendar for the current thread's active language.
    pub fn current() -> Self {
        Self::from_language_code(&get_language())
    }

    /// The name used in templates and JS picker options.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Persian => "persian",
            Self::Gregorian => "gregorian",
        }
    }
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        deactivate();
    }

    #[test]
    fn test_default_language_from_settings() {
        setup();
        assert_eq!(get_language(), "en-us");
    }

    #[test]
    fn test_activate_and_deactivate() {
        setup();
        activate("fa");
        assert_eq!(get_language(), "fa");
        deactivate();
        assert_eq!(get_language(), "en-us");
    }

    #[test]
    fn test_gettext_persian() {
        setup();
        activate("fa-ir");
        assert_eq!(gettext("From date"), "از تاریخ");
        deactivate();
    }

    #[test]
    fn test_gettext_untranslated() {
        setup();
        assert_eq!(gettext("From date"), "From date");
    }

    #[test]
    fn test_translate_explicit_language() {
        setup();
        assert_eq!(translate("fa-IR", "Date:"), "تاریخ:");
        assert_eq!(translate("en", "Date:"), "Date:");
    }

    #[test]
    fn test_calendar_from_language_code() {
        assert_eq!(CalendarSystem::from_language_code("fa"), CalendarSystem::Persian);
        assert_eq!(CalendarSystem::from_language_code("FA-ir"), CalendarSystem::Persian);
        assert_eq!(CalendarSystem::from_language_code("en"), CalendarSystem::Gregorian);
        assert_eq!(CalendarSystem::from_language_code("de-at"), CalendarSystem::Gregorian);
        assert_eq!(CalendarSystem::from_language_code(""), CalendarSystem::Gregorian);
    }

    #[test]
    fn test_calendar_current_follows_activation() {
        setup();
        assert_eq!(CalendarSystem::current(), CalendarSystem::Gregorian);
        activate("fa");
        assert_eq!(CalendarSystem::current(), CalendarSystem::Persian);
        deactivate();
    }

    #[test]
    fn test_calendar_display() {
        assert_eq!(CalendarSystem::Persian.to_string(), "persian");
        assert_eq!(CalendarSystem::Gregorian.name(), "gregorian");
    }
}
