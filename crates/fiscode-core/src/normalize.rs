//! Text normalization shared by letter extraction and municipality lookup.
//!
//! Diacritics are removed by canonical decomposition (NFD) followed by
//! dropping every combining mark, so `È` becomes `E` and `Ñ` becomes `N`.
//! Letters with no decomposition (`Ø`, `Ł`, `ß`) pass through unchanged.
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Removes diacritical marks from `text`, leaving base characters intact.
///
/// ```
/// use fiscode_core::normalize::strip_diacritics;
///
/// assert_eq!(strip_diacritics("Nicolò"), "Nicolo");
/// assert_eq!(strip_diacritics("Forlì-Cesena"), "Forli-Cesena");
/// ```
pub fn strip_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Builds the lookup key for a municipality name.
///
/// Upper-cases first (some upper-case mappings introduce combining marks),
/// strips diacritics, trims, and collapses internal whitespace runs to a
/// single space.
///
/// ```
/// use fiscode_core::normalize::normalize_key;
///
/// assert_eq!(normalize_key("  San  Donà di Piave "), "SAN DONA DI PIAVE");
/// ```
pub fn normalize_key(text: &str) -> String {
    let stripped = strip_diacritics(&text.to_uppercase());
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
