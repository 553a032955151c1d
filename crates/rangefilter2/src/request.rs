//! The slice of an admin request a list filter reads.

use rangefilter2_core::i18n;

/// The language and GET parameters of a changelist request.
///
/// Parameters keep their order and repeats; [`get`](FilterRequest::get)
/// returns the last value for a key, like Django's `QueryDict.__getitem__`.
///
/// # Examples
///
/// ```
/// use rangefilter2::request::FilterRequest;
///
/// let request = FilterRequest::from_query_string("created__gte=1710892800000&o=1")
///     .with_language("fa-ir");
/// assert_eq!(request.get("created__gte"), Some("1710892800000"));
/// assert_eq!(request.language_code(), "fa-ir");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    language_code: String,
    params: Vec<(String, String)>,
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRequest {
    /// Creates a request with no parameters in the active language.
    pub fn new() -> Self {
        Self {
            language_code: i18n::get_language(),
            params: Vec::new(),
        }
    }

    /// Parses a URL-encoded query string, with or without a leading `?`.
    pub fn from_query_string(query_string: &str) -> Self {
        let query_string = query_string.strip_prefix('?').unwrap_or(query_string);
        let params = url::form_urlencoded::parse(query_string.as_bytes())
            .into_owned()
            .collect();
        Self {
            language_code: i18n::get_language(),
            params,
        }
    }

    /// Sets the request's language code.
    #[must_use]
    pub fn with_language(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// The request's language code.
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    /// Returns the last value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in the order they were given.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}
