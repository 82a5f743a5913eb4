//! Text normalization used as the fuzzy matching fallback.

/// Normalizes text for fuzzy matching: lowercases, strips everything that is
/// not alphanumeric, and collapses the remaining tokens with single spaces.
///
/// Two texts that differ only in case, punctuation, or whitespace layout
/// normalize to the same string.
///
/// # Examples
/// ```
/// use catmerge::matching::simplify;
///
/// assert_eq!(simplify("Hello, World!"), simplify("hello world"));
/// assert_eq!(simplify("  Save\tfile "), "save file");
/// ```
#[must_use]
pub fn simplify(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
