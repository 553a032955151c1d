//! Form media: the JS and CSS assets a filter or widget needs.

use std::collections::BTreeMap;
use std::fmt;

use rangefilter2_core::utils::text::escape_html;
use serde::Serialize;

/// An ordered, de-duplicated bundle of script and stylesheet paths.
///
/// Paths are relative to the static URL unless they are absolute
/// (`http://`, `https://` or starting with `/`). CSS paths are grouped by
/// medium (`all`, `screen`, `print`).
///
/// # Examples
///
/// ```
/// use rangefilter2::media::Media;
///
/// let media = Media::new()
///     .with_js("rangefilter2/persian-date.js")
///     .with_css("all", "rangefilter2/persian-datepicker.css");
/// assert_eq!(
///     media.render_js("/static/"),
///     vec![r#"<script src="/static/rangefilter2/persian-date.js"></script>"#.to_string()]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Media {
    js: Vec<String>,
    css: BTreeMap<String, Vec<String>>,
}

impl Media {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script, ignoring duplicates.
    #[must_use]
    pub fn with_js(mut self, path: impl Into<String>) -> Self {
        push_unique(&mut self.js, path.into());
        self
    }

    /// Adds a stylesheet for `medium`, ignoring duplicates.
    #[must_use]
    pub fn with_css(mut self, medium: impl Into<String>, path: impl Into<String>) -> Self {
        push_unique(self.css.entry(medium.into()).or_default(), path.into());
        self
    }

    /// The scripts in order.
    pub fn js(&self) -> &[String] {
        &self.js
    }

    /// The stylesheets for each medium.
    pub fn css(&self) -> &BTreeMap<String, Vec<String>> {
        &self.css
    }

    /// Returns `true` if the bundle has no assets.
    pub fn is_empty(&self) -> bool {
        self.js.is_empty() && self.css.values().all(Vec::is_empty)
    }

    /// Combines two bundles, keeping `self`'s order first.
    #[must_use]
    pub fn merge(mut self, other: &Self) -> Self {
        for path in &other.js {
            push_unique(&mut self.js, path.clone());
        }
        for (medium, paths) in &other.css {
            let target = self.css.entry(medium.clone()).or_default();
            for path in paths {
                push_unique(target, path.clone());
            }
        }
        self
    }

    /// `<script>` tags for every script.
    pub fn render_js(&self, static_url: &str) -> Vec<String> {
        self.js
            .iter()
            .map(|path| {
                format!(
                    r#"<script src="{}"></script>"#,
                    escape_html(&absolute_path(path, static_url))
                )
            })
            .collect()
    }

    /// `<link>` tags for every stylesheet, media in sorted order.
    pub fn render_css(&self, static_url: &str) -> Vec<String> {
        self.css
            .iter()
            .flat_map(|(medium, paths)| {
                paths.iter().map(move |path| {
                    format!(
                        r#"<link href="{}" media="{}" rel="stylesheet">"#,
                        escape_html(&absolute_path(path, static_url)),
                        escape_html(medium)
                    )
                })
            })
            .collect()
    }

    /// Stylesheets then scripts, one tag per line.
    pub fn render(&self, static_url: &str) -> String {
        let mut tags = self.render_css(static_url);
        tags.extend(self.render_js(static_url));
        tags.join("\n")
    }
}

impl fmt::Display for Media {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

/// Prefixes a relative asset path with `static_url`.
pub fn absolute_path(path: &str, static_url: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with('/') {
        return path.to_string();
    }
    if static_url.is_empty() {
        return path.to_string();
    }
    format!("{}/{}", static_url.trim_end_matches('/'), path)
}

fn push_unique(list: &mut Vec<String>, path: String) {
    if !list.contains(&path) {
        list.push(path);
    }
}
