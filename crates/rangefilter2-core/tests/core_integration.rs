//! Integration tests for settings loading, calendar conversion across the
//! supported range, and timezone-aware Jalali readings.

use chrono::{Datelike, NaiveDate};
use rangefilter2_core::i18n::{self, timezone, CalendarSystem};
use rangefilter2_core::jalali::{self, JalaliDate, JalaliDateTime};
use rangefilter2_core::settings::FrameworkVersion;
use rangefilter2_core::settings_loader;

#[test]
fn test_settings_from_toml_file() {
    let dir = std::env::temp_dir().join("rangefilter2_core_settings_toml");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rangefilter.toml");
    std::fs::write(
        &path,
        r#"
debug = true
language_code = "fa-ir"
time_zone = "Asia/Tehran"
csp_nonce = true

[framework_version]
major = 1
minor = 8
"#,
    )
    .unwrap();

    let settings = settings_loader::from_toml_file(&path).unwrap();
    assert!(settings.debug);
    assert!(settings.csp_nonce);
    assert!(settings.use_tz);
    assert_eq!(settings.static_url, "/static/");
    assert_eq!(settings.framework_version, FrameworkVersion::new(1, 8));
    assert_eq!(settings.default_timezone().unwrap(), chrono_tz::Asia::Tehran);
    assert_eq!(
        CalendarSystem::from_language_code(&settings.language_code),
        CalendarSystem::Persian
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_settings_missing_file_is_configuration_error() {
    let err = settings_loader::from_toml_file("/nonexistent/rangefilter.toml").unwrap_err();
    assert_eq!(err.status_code(), 500);
}

#[test]
fn test_every_day_converts_back_and_forth() {
    let mut day = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2040, 12, 31).unwrap();
    let mut previous: Option<JalaliDate> = None;

    while day <= end {
        let jalali = JalaliDate::from_gregorian(day).unwrap();
        assert_eq!(jalali.to_gregorian(), Some(day), "{day} -> {jalali}");
        assert!(jalali.day() <= jalali::days_in_month(jalali.year(), jalali.month()).unwrap());
        if let Some(prev) = previous {
            assert!(prev < jalali);
        }
        previous = Some(jalali);
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn test_nowruz_falls_around_march_equinox() {
    for year in 1370..=1420 {
        let nowruz = JalaliDate::new(year, 1, 1).unwrap().to_gregorian().unwrap();
        assert_eq!(nowruz.month(), 3);
        assert!((19..=22).contains(&nowruz.day()), "{year}: {nowruz}");
    }
}

#[test]
fn test_timestamp_reading_depends_on_timezone() {
    // 2024-03-19T21:00:00Z
    let secs = 1_710_882_000;
    let utc = JalaliDateTime::from_timestamp(secs, 0, &chrono_tz::UTC).unwrap();
    let tehran = JalaliDateTime::from_timestamp(secs, 0, &chrono_tz::Asia::Tehran).unwrap();
    assert_eq!(utc.format("%Y-%m-%d %H:%M"), "1402-12-29 21:00");
    assert_eq!(tehran.format("%Y-%m-%d %H:%M"), "1403-01-01 00:30");
}

#[test]
fn test_persian_request_round_trip() {
    i18n::activate("fa");
    timezone::activate(chrono_tz::Asia::Tehran);

    let parsed = JalaliDate::parse("۱۴۰۳/۰۱/۰۱").unwrap();
    assert_eq!(parsed.to_gregorian(), NaiveDate::from_ymd_opt(2024, 3, 20));
    assert_eq!(CalendarSystem::current(), CalendarSystem::Persian);
    assert_eq!(i18n::gettext("Enter a valid date."), "یک تاریخ معتبر وارد کنید.");
    assert_eq!(timezone::get_current_timezone(), chrono_tz::Asia::Tehran);

    timezone::deactivate();
    i18n::deactivate();
}
