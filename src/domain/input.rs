//! Gate applied before a preview request is issued.

/// Pattern removed from the editor text before the length check.
///
/// The page removes the first occurrence of this literal, not every
/// whitespace character. Kept as-is until the intended rule is confirmed.
pub const GUARD_STRIP_PATTERN: &str = "s";

/// Editor text as measured by the guard.
pub fn stripped_for_guard(text: &str) -> String {
    text.replacen(GUARD_STRIP_PATTERN, "", 1)
}

/// Whether the editor contents and title allow a render request.
pub fn is_renderable(text: &str, title: &str) -> bool {
    !stripped_for_guard(text).is_empty() && !title.is_empty()
}
