use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Shortest search term the header accepts, counted in characters after trimming.
pub const MIN_SEARCH_CHARS: usize = 2;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes a search term before it is sent to the backend.
///
/// The term is trimmed, runs of whitespace are collapsed to a single space and the
/// result is put into Unicode NFC form, so that Hangul typed as decomposed jamo and
/// precomposed syllables produce the same query.
///
/// # Examples
///
/// ```
/// use vsong::foundation::utils::normalize_query;
///
/// assert_eq!(normalize_query("  hoshimachi   suisei "), "hoshimachi suisei");
/// ```
pub fn normalize_query(input: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(input.trim(), " ");
    collapsed.nfc().collect::<String>()
}

/// Validates a search term typed into the header.
///
/// Returns the normalized term, or a user-facing message when the term is shorter than
/// [`MIN_SEARCH_CHARS`] characters.
pub fn validate_search_term(input: &str) -> Result<String, String> {
    let term = normalize_query(input);
    if term.chars().count() < MIN_SEARCH_CHARS {
        return Err(format!(
            "Search terms need at least {} characters.",
            MIN_SEARCH_CHARS
        ));
    }
    Ok(term)
}

/// Formats a count with thousands separators, e.g. `1234567` becomes `1,234,567`.
///
/// # Examples
///
/// ```
/// use vsong::foundation::utils::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(999), "999");
/// ```
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a publish timestamp as a calendar date, or a dash when it is unknown.
pub fn format_date(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
