//! # rangefilter2-core
//!
//! Core types for the rangefilter2 admin list filters. This crate has no
//! admin or ORM dependencies and provides the foundation the filter crate
//! builds on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] / [`settings_loader`] - Settings and TOML/env loading
//! - [`logging`] - Tracing-based logging integration
//! - [`i18n`] - Language activation, translations, calendars and timezones
//! - [`jalali`] - Jalali calendar dates and conversion
//! - [`utils`] - Text helpers

pub mod error;
pub mod i18n;
pub mod jalali;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FilterError, FilterResult, ValidationError};
pub use i18n::CalendarSystem;
pub use jalali::{JalaliDate, JalaliDateTime};
pub use settings::{Settings, SETTINGS};
