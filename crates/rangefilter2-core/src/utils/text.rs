//! Text utilities used when rendering filters.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Converts a string to an ASCII slug.
///
/// The input is NFKD-normalized so accented letters keep their base letter,
/// then non-ASCII characters are dropped, the rest is lowercased, characters other
/// than letters, digits, underscores, hyphens and spaces are removed, runs of
/// spaces and hyphens become one hyphen, and leading/trailing `-`/`_` are
/// stripped. A title written entirely in Persian therefore slugifies to an
/// empty string.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::utils::text::slugify;
///
/// assert_eq!(slugify("Created at"), "created-at");
/// assert_eq!(slugify("  Publish -- Date! "), "publish-date");
/// assert_eq!(slugify("Café"), "cafe");
/// assert_eq!(slugify("تاریخ ایجاد"), "");
/// ```
pub fn slugify(s: &str) -> String {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();

    let non_word = NON_WORD.get_or_init(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid regex"));
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[-\s]+").expect("valid regex"));

    let ascii = s.nfkd().filter(char::is_ascii).collect::<String>().to_lowercase();
    let s = non_word.replace_all(&ascii, "");
    let s = separators.replace_all(&s, "-");
    s.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("created at"), "Created at");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Derives a human-readable name from a field path.
///
/// The last `__` segment is used and underscores become spaces.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::utils::text::verbose_name;
///
/// assert_eq!(verbose_name("created_at"), "created at");
/// assert_eq!(verbose_name("order__shipped_on"), "shipped on");
/// ```
pub fn verbose_name(field_path: &str) -> String {
    field_path
        .rsplit("__")
        .next()
        .unwrap_or(field_path)
        .replace('_', " ")
        .trim()
        .to_string()
}

/// Escapes `&`, `<`, `>`, `"` and `'` for use in HTML text and attributes.
///
/// # Examples
///
/// ```
/// use rangefilter2_core::utils::text::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">"#), "&lt;a href=&quot;x&quot;&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("created_at"), "created_at");
        assert_eq!(slugify("_private_"), "private");
    }

    #[test]
    fn test_slugify_drops_non_ascii() {
        assert_eq!(slugify("Date تاریخ"), "date");
        assert_eq!(slugify("تاریخ"), "");
    }

    #[test]
    fn test_slugify_strips_accents() {
        assert_eq!(slugify("Café"), "cafe");
        assert_eq!(slugify("Über Straße"), "uber-strae");
        assert_eq!(slugify("ﬁle №5"), "file-no5");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a -- b   c"), "a-b-c");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn test_capfirst() {
        assert_eq!(capfirst("hello"), "Hello");
        assert_eq!(capfirst("HELLO"), "HELLO");
        assert_eq!(capfirst("ßx"), "SSx");
    }

    #[test]
    fn test_verbose_name() {
        assert_eq!(verbose_name("published"), "published");
        assert_eq!(verbose_name("author__date_joined"), "date joined");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("it's"), "it&#x27;s");
        assert_eq!(escape_html("plain"), "plain");
    }
}
