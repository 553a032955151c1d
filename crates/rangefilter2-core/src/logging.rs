//! Logging integration.
//!
//! Provides [`setup_logging`] for installing a [`tracing`] subscriber from
//! [`Settings`](crate::settings::Settings) and [`filter_span`] for grouping the
//! events a list filter emits while handling one request.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format is used.
/// Installing twice is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one list filter applied to one field.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::logging::filter_span;
///
/// let span = filter_span("DateRangeFilter", "created_at");
/// let _guard = span.enter();
/// tracing::debug!("applying bounds");
/// ```
pub fn filter_span(filter: &'static str, field_path: &str) -> tracing::Span {
    tracing::debug_span!("list_filter", filter, field = field_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_is_idempotent() {
        let settings = Settings {
            log_level: "not a valid directive [".to_string(),
            ..Settings::default()
        };
        setup_logging(&settings);
        setup_logging(&settings);
    }

    #[test]
    fn test_filter_span_enter() {
        let span = filter_span("DateRangeFilter", "published_at");
        let _guard = span.enter();
        tracing::debug!("inside span");
    }
}
