use std::ops::RangeInclusive;
use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block; other combining marks count as separators
const DIACRITICS: RangeInclusive<char> = '\u{0300}'..='\u{036f}';

/// Derive the canonical, URL-safe identifier for a display name.
///
/// Diacritics are dropped, the text is lower-cased and every run of
/// characters outside `[a-z0-9]` becomes a single `-`. Separators never lead
/// or trail, so blank input gives an empty slug.
pub fn slugify(value: &str) -> String {
    let folded = value
        .nfd()
        .filter(|c| !DIACRITICS.contains(c))
        .collect::<String>()
        .to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_separator = false;

    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}
