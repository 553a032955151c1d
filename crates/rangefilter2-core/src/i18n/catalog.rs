//! Translation catalog.
//!
//! A process-wide registry of message translations keyed by language code.
//! The strings the range filters display ship with Persian translations;
//! hosts can register more languages or override entries at startup.
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "messages": {
//!     "From date": "Von",
//!     "To date": "Bis"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Built-in Persian translations of the filter's user-facing strings.
const PERSIAN_MESSAGES: &[(&str, &str)] = &[
    ("From date", "از تاریخ"),
    ("To date", "تا تاریخ"),
    ("Search", "جستجو"),
    ("Reset", "بازنشانی"),
    ("Enter a valid date.", "یک تاریخ معتبر وارد کنید."),
    ("Enter a valid time.", "یک زمان معتبر وارد کنید."),
    ("Enter a valid date/time.", "یک تاریخ/زمان معتبر وارد کنید."),
    ("Date:", "تاریخ:"),
    ("Time:", "زمان:"),
];

type Catalogs = HashMap<String, HashMap<String, String>>;

fn global_catalogs() -> &'static RwLock<Catalogs> {
    static CATALOGS: OnceLock<RwLock<Catalogs>> = OnceLock::new();
    CATALOGS.get_or_init(|| {
        let mut catalogs = Catalogs::new();
        catalogs.insert(
            "fa".to_string(),
            PERSIAN_MESSAGES
                .iter()
                .map(|(msgid, translated)| ((*msgid).to_string(), (*translated).to_string()))
                .collect(),
        );
        RwLock::new(catalogs)
    })
}

/// Registers message translations for a language, overwriting duplicates.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::i18n::catalog;
///
/// catalog::register_translations("de", vec![("From date", "Von"), ("To date", "Bis")]);
/// assert_eq!(catalog::translate("de", "To date"), Some("Bis".to_string()));
/// ```
pub fn register_translations(language: &str, entries: Vec<(&str, &str)>) {
    let mut catalogs = global_catalogs()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let catalog = catalogs.entry(normalize(language)).or_default();
    for (msgid, translated) in entries {
        catalog.insert(msgid.to_string(), translated.to_string());
    }
}

/// Loads message translations for a language from a JSON string.
///
/// # Errors
///
/// Returns `Err` if the JSON is invalid.
pub fn load_from_json(language: &str, json_str: &str) -> Result<(), String> {
    let value: serde_json::Value =
        serde_json::from_str(json_str).map_err(|e| format!("Invalid JSON: {e}"))?;

    let entries: Vec<(String, String)> = value
        .get("messages")
        .and_then(serde_json::Value::as_object)
        .map(|messages| {
            messages
                .iter()
                .filter_map(|(msgid, t)| t.as_str().map(|t| (msgid.clone(), t.to_string())))
                .collect()
        })
        .unwrap_or_default();

    register_translations(
        language,
        entries
            .iter()
            .map(|(m, t)| (m.as_str(), t.as_str()))
            .collect(),
    );
    Ok(())
}

/// Looks up a translation.
///
/// Tries the full language code first (`fa-ir`), then its base language (`fa`).
pub fn translate(language: &str, msgid: &str) -> Option<String> {
    let catalogs = global_catalogs()
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    let language = normalize(language);
    let base = language.split('-').next().unwrap_or(language.as_str());

    [language.as_str(), base]
        .iter()
        .find_map(|code| catalogs.get(*code).and_then(|c| c.get(msgid)).cloned())
}

/// Lowercases a language code and uses `-` as the region separator.
fn normalize(language: &str) -> String {
    language.trim().to_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_persian() {
        assert_eq!(translate("fa", "From date"), Some("از تاریخ".to_string()));
        assert_eq!(translate("fa", "To date"), Some("تا تاریخ".to_string()));
    }

    #[test]
    fn test_region_falls_back_to_base_language() {
        assert_eq!(translate("fa-IR", "To date"), Some("تا تاریخ".to_string()));
        assert_eq!(translate("fa_ir", "To date"), Some("تا تاریخ".to_string()));
    }

    #[test]
    fn test_missing_translation() {
        assert_eq!(translate("fa", "No such message"), None);
        assert_eq!(translate("xx", "From date"), None);
    }

    #[test]
    fn test_region_specific_override() {
        register_translations("es-ar", vec![("From date", "Desde (AR)")]);
        register_translations("es", vec![("From date", "Desde"), ("To date", "Hasta")]);
        assert_eq!(translate("es-ar", "From date"), Some("Desde (AR)".to_string()));
        assert_eq!(translate("es-ar", "To date"), Some("Hasta".to_string()));
    }

    #[test]
    fn test_load_from_json() {
        load_from_json("it", r#"{"messages": {"From date": "Dal", "To date": 3}}"#).unwrap();
        assert_eq!(translate("it", "From date"), Some("Dal".to_string()));
        assert_eq!(translate("it", "To date"), None);
    }

    #[test]
    fn test_load_from_json_invalid() {
        assert!(load_from_json("it", "{not json").is_err());
    }
}
