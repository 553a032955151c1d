//! Template selection and rendering for the filter sidebar.
//!
//! The three filter templates are compiled into the crate and rendered with
//! Tera. Hosts with their own template engine can still use
//! [`select_template`] and the [`FilterChoice`](crate::filters::FilterChoice)
//! context directly.

use rangefilter2_core::i18n;
use rangefilter2_core::settings::FrameworkVersion;
use rangefilter2_core::{FilterError, FilterResult};
use tera::{Context, Tera};

use crate::changelist::ChangeList;
use crate::filters::ListFilter;

/// The template for current admin versions.
pub const DATE_FILTER_TEMPLATE: &str = "rangefilter2/date_filter.html";
/// The template for admin versions up to 1.8.
pub const DATE_FILTER_1_8_TEMPLATE: &str = "rangefilter2/date_filter_1_8.html";
/// The template without inline scripts, for pages served with a CSP nonce.
pub const DATE_FILTER_CSP_TEMPLATE: &str = "rangefilter2/date_filter_csp.html";

/// Where hosts serve [`CSP_INIT_SCRIPT`], relative to the static URL.
pub const CSP_INIT_SCRIPT_PATH: &str = "rangefilter2/rangefilter2-init.js";

/// Attaches the datepicker to every filter rendered with
/// [`DATE_FILTER_CSP_TEMPLATE`], in place of the inline script the other
/// templates carry.
pub const CSP_INIT_SCRIPT: &str = include_str!("../static/rangefilter2/rangefilter2-init.js");

const TEMPLATES: [(&str, &str); 3] = [
    (
        DATE_FILTER_TEMPLATE,
        include_str!("../templates/rangefilter2/date_filter.html"),
    ),
    (
        DATE_FILTER_1_8_TEMPLATE,
        include_str!("../templates/rangefilter2/date_filter_1_8.html"),
    ),
    (
        DATE_FILTER_CSP_TEMPLATE,
        include_str!("../templates/rangefilter2/date_filter_csp.html"),
    ),
];

/// Picks the filter template for a host version.
///
/// # Examples
///
/// ```
/// use rangefilter2::templates::select_template;
/// use rangefilter2_core::settings::FrameworkVersion;
///
/// assert_eq!(select_template(FrameworkVersion::new(1, 8), false), "rangefilter2/date_filter_1_8.html");
/// assert_eq!(select_template(FrameworkVersion::new(4, 2), true), "rangefilter2/date_filter_csp.html");
/// assert_eq!(select_template(FrameworkVersion::new(4, 2), false), "rangefilter2/date_filter.html");
/// ```
pub fn select_template(version: FrameworkVersion, csp_nonce: bool) -> &'static str {
    if version <= FrameworkVersion::new(1, 8) {
        DATE_FILTER_1_8_TEMPLATE
    } else if csp_nonce {
        DATE_FILTER_CSP_TEMPLATE
    } else {
        DATE_FILTER_TEMPLATE
    }
}

/// Renders list filters with the bundled templates.
#[derive(Debug)]
pub struct FilterRenderer {
    tera: Tera,
    static_url: String,
}

impl FilterRenderer {
    /// Compiles the bundled templates.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Template`] if a template fails to parse.
    pub fn new(static_url: impl Into<String>) -> FilterResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| FilterError::Template(e.to_string()))?;
        Ok(Self {
            tera,
            static_url: static_url.into(),
        })
    }

    /// Renders `filter`'s sidebar entry against the current change list.
    ///
    /// Labels are translated into the active language. A filter without output
    /// renders as an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Template`] if rendering fails.
    pub fn render<F: ListFilter>(&self, filter: &F, changelist: &ChangeList) -> FilterResult<String> {
        if !filter.has_output() {
            return Ok(String::new());
        }

        let mut context = Context::new();
        context.insert("title", filter.title());
        context.insert("choices", &filter.choices(changelist));
        context.insert("media", &filter.media().render(&self.static_url));
        context.insert("from_label", &i18n::gettext("From date"));
        context.insert("to_label", &i18n::gettext("To date"));
        context.insert("search_label", &i18n::gettext("Search"));
        context.insert("reset_label", &i18n::gettext("Reset"));

        tracing::trace!(template = filter.template(), "rendering list filter");
        self.tera
            .render(filter.template(), &context)
            .map_err(|e| FilterError::Template(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_template_versions() {
        assert_eq!(select_template(FrameworkVersion::new(1, 7), true), DATE_FILTER_1_8_TEMPLATE);
        assert_eq!(select_template(FrameworkVersion::new(1, 9), false), DATE_FILTER_TEMPLATE);
        assert_eq!(select_template(FrameworkVersion::new(2, 0), true), DATE_FILTER_CSP_TEMPLATE);
    }

    #[test]
    fn test_csp_init_script_reads_filter_markup() {
        assert!(CSP_INIT_SCRIPT.contains(r#"[data-rangefilter2="auto"]"#));
        assert!(CSP_INIT_SCRIPT.contains("persianDatepicker"));
        assert!(CSP_INIT_SCRIPT.contains("target.val(unix)"));
    }

    #[test]
    fn test_bundled_templates_compile() {
        let renderer = FilterRenderer::new("/static/").unwrap();
        let names: Vec<&str> = renderer.tera.get_template_names().collect();
        for (name, _) in TEMPLATES {
            assert!(names.contains(&name));
        }
    }
}
