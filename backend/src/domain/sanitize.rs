//! Sanitisation of user-provided free text.
//!
//! Notes and descriptions are stored verbatim in the database and rendered in
//! several clients, so HTML is stripped before anything is written.

use std::sync::OnceLock;

use regex::Regex;

static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_RE.get_or_init(|| {
        Regex::new("<[^>]*>").unwrap_or_else(|error| panic!("tag regex failed to compile: {error}"))
    })
}

/// Strip HTML tags and trim surrounding whitespace.
///
/// Common angle-bracket entities are decoded first so a tag smuggled through
/// `&lt;script&gt;` is stripped as well.
///
/// # Examples
/// ```
/// use fleetgate::domain::sanitize_text;
///
/// assert_eq!(sanitize_text(Some("<b>brakes</b> worn ")), "brakes worn");
/// assert_eq!(sanitize_text(None), "");
/// ```
pub fn sanitize_text(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };
    let stripped = tag_regex().replace_all(input, "");
    let decoded = stripped.replace("&lt;", "<").replace("&gt;", ">");
    tag_regex().replace_all(&decoded, "").trim().to_owned()
}

/// Sanitise and cap a field at `max_chars` characters.
///
/// Returns `None` when nothing survives sanitisation, matching how optional
/// text columns store absence.
pub fn sanitize_field(input: Option<&str>, max_chars: usize) -> Option<String> {
    let cleaned = sanitize_text(input);
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.chars().take(max_chars).collect())
}
