//! Settings for rangefilter2.
//!
//! [`Settings`] holds the handful of host settings the range filters read:
//! debug mode, timezone handling, the default language, the static URL used
//! for media assets and the host framework version used to pick a template.
//! [`SETTINGS`] is a lazily configured global, as in django-rs.

use std::sync::OnceLock;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// The host admin framework version, as `(major, minor)`.
///
/// Template selection depends on it: hosts at or below 1.8 get the legacy
/// filter template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameworkVersion {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
}

impl FrameworkVersion {
    /// Creates a new version.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl Default for FrameworkVersion {
    fn default() -> Self {
        Self::new(5, 0)
    }
}

/// The complete set of settings read by the range filters.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert!(settings.use_tz);
/// assert_eq!(settings.time_zone, "UTC");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects the minified picker assets.
    pub debug: bool,
    /// The host admin framework version.
    pub framework_version: FrameworkVersion,

    // ── Internationalization ─────────────────────────────────────────

    /// The default language code (e.g. "en-us", "fa-ir").
    pub language_code: String,
    /// The default time zone, as an IANA name (e.g. "UTC", "Asia/Tehran").
    pub time_zone: String,
    /// Whether filter bounds are timezone-aware datetimes.
    pub use_tz: bool,

    // ── Static files ─────────────────────────────────────────────────

    /// URL prefix for static files.
    pub static_url: String,

    // ── Security ─────────────────────────────────────────────────────

    /// Whether the host emits Content-Security-Policy nonces. Selects the
    /// CSP-friendly filter template without inline scripts.
    pub csp_nonce: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "rangefilter2=trace").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            framework_version: FrameworkVersion::default(),
            language_code: "en-us".to_string(),
            time_zone: "UTC".to_string(),
            use_tz: true,
            static_url: "/static/".to_string(),
            csp_nonce: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Resolves [`time_zone`](Settings::time_zone) to a `chrono_tz::Tz`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangefilter2_core::settings::Settings;
    ///
    /// let mut settings = Settings::default();
    /// settings.time_zone = "Asia/Tehran".to_string();
    /// assert_eq!(settings.default_timezone().unwrap(), chrono_tz::Asia::Tehran);
    /// ```
    pub fn default_timezone(&self) -> FilterResult<Tz> {
        self.time_zone
            .trim()
            .parse::<Tz>()
            .map_err(|_| FilterError::UnknownTimeZone(self.time_zone.clone()))
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Until then
/// [`get`](LazySettings::get) returns the defaults.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Configuration`] if settings were already configured.
    pub fn configure(&self, settings: Settings) -> FilterResult<()> {
        self.inner
            .set(settings)
            .map_err(|_| FilterError::Configuration("settings are already configured".into()))
    }

    /// Returns the configured settings, or the defaults if none were configured.
    pub fn get(&self) -> &Settings {
        static DEFAULTS: OnceLock<Settings> = OnceLock::new();
        self.inner
            .get()
            .unwrap_or_else(|| DEFAULTS.get_or_init(Settings::default))
    }

    /// Returns `true` if [`configure`](LazySettings::configure) has been called.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert!(settings.use_tz);
        assert!(!settings.csp_nonce);
        assert_eq!(settings.language_code, "en-us");
        assert_eq!(settings.static_url, "/static/");
        assert_eq!(settings.framework_version, FrameworkVersion::new(5, 0));
    }

    #[test]
    fn test_default_timezone_utc() {
        let settings = Settings::default();
        assert_eq!(settings.default_timezone().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_default_timezone_unknown() {
        let settings = Settings {
            time_zone: "Mars/Olympus_Mons".to_string(),
            ..Settings::default()
        };
        let err = settings.default_timezone().unwrap_err();
        assert!(matches!(err, FilterError::UnknownTimeZone(ref name) if name == "Mars/Olympus_Mons"));
    }

    #[test]
    fn test_framework_version_ordering() {
        assert!(FrameworkVersion::new(1, 8) < FrameworkVersion::new(1, 9));
        assert!(FrameworkVersion::new(1, 11) < FrameworkVersion::new(2, 0));
        assert!(FrameworkVersion::new(1, 8) <= FrameworkVersion::new(1, 8));
    }

    #[test]
    fn test_lazy_settings_configure_once() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());
        lazy.configure(Settings {
            debug: true,
            ..Settings::default()
        })
        .unwrap();
        assert!(lazy.is_configured());
        assert!(lazy.get().debug);
        assert!(lazy.configure(Settings::default()).is_err());
    }

    #[test]
    fn test_lazy_settings_defaults_when_unconfigured() {
        let lazy = LazySettings::new();
        assert_eq!(lazy.get().time_zone, "UTC");
        assert!(!lazy.is_configured());
        lazy.configure(Settings::default()).unwrap();
    }
}
