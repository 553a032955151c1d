//! The admin change list's query-string builder.

use std::collections::BTreeMap;

use crate::request::FilterRequest;

/// The current GET parameters of an admin list view.
///
/// Filters use [`get_query_string`](ChangeList::get_query_string) to build
/// links that keep the rest of the list state (ordering, search, other filters)
/// while replacing their own parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeList {
    params: BTreeMap<String, String>,
}

impl ChangeList {
    /// Creates a change list from raw parameters. Later duplicates win.
    pub fn new<K, V>(params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a change list from a request's GET parameters.
    pub fn from_request(request: &FilterRequest) -> Self {
        Self::new(request.params().iter().cloned())
    }

    /// The current parameters, sorted by key.
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// The current parameters except those whose key starts with one of `remove`.
    pub fn params_without<'a>(&'a self, remove: &'a [String]) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.params
            .iter()
            .filter(move |(key, _)| !remove.iter().any(|r| key.starts_with(r.as_str())))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builds a `?`-prefixed query string from the current parameters.
    ///
    /// Every parameter whose key starts with one of `remove` is dropped first.
    /// Each `(key, Some(value))` in `new_params` then sets a parameter and each
    /// `(key, None)` deletes one. Keys are emitted in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangefilter2::changelist::ChangeList;
    ///
    /// let cl = ChangeList::new([("o", "1"), ("created__gte", "0"), ("created__lte", "9")]);
    /// let remove = vec!["created__gte".to_string(), "created__lte".to_string()];
    /// assert_eq!(cl.get_query_string(&[], &remove), "?o=1");
    /// assert_eq!(cl.get_query_string(&[("q", Some("a b"))], &remove), "?o=1&q=a+b");
    /// ```
    pub fn get_query_string(&self, new_params: &[(&str, Option<&str>)], remove: &[String]) -> String {
        let mut params: BTreeMap<&str, &str> = self.params_without(remove).collect();

        for &(key, value) in new_params {
            match value {
                Some(value) => {
                    params.insert(key, value);
                }
                None => {
                    params.remove(key);
                }
            }
        }

        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("?{encoded}")
    }
}
