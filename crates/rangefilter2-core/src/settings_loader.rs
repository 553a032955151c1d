//! Loading [`Settings`] from TOML files and environment variables.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `RANGEFILTER_DEBUG` | `debug` |
//! | `RANGEFILTER_LANGUAGE_CODE` | `language_code` |
//! | `RANGEFILTER_TIME_ZONE` | `time_zone` |
//! | `RANGEFILTER_USE_TZ` | `use_tz` |
//! | `RANGEFILTER_STATIC_URL` | `static_url` |
//! | `RANGEFILTER_CSP_NONCE` | `csp_nonce` |
//! | `RANGEFILTER_LOG_LEVEL` | `log_level` |
//!
//! ```rust,no_run
//! use rangefilter2_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/rangefilter.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FilterError;
use crate::settings::Settings;

/// Loads settings from a TOML string, keeping defaults for anything not given.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FilterError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FilterError::Configuration(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FilterError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        FilterError::Configuration(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FilterError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        FilterError::Configuration(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FilterError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from environment variables only, starting from defaults.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `RANGEFILTER_*` environment variable overrides.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("RANGEFILTER_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("RANGEFILTER_LANGUAGE_CODE") {
        settings.language_code = val;
    }

    if let Ok(val) = std::env::var("RANGEFILTER_TIME_ZONE") {
        settings.time_zone = val;
    }

    if let Ok(val) = std::env::var("RANGEFILTER_USE_TZ") {
        settings.use_tz = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("RANGEFILTER_STATIC_URL") {
        settings.static_url = val;
    }

    if let Ok(val) = std::env::var("RANGEFILTER_CSP_NONCE") {
        settings.csp_nonce = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("RANGEFILTER_LOG_LEVEL") {
        settings.log_level = val;
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values; `override_val` wins.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
