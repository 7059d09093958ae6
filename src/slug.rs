use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Turn a display string into a lowercase, hyphen separated URL path segment.
///
/// Input is NFC normalized first so composed and decomposed spellings of the same name produce
/// the same slug. Every run of characters that is neither a letter, a digit, nor a combining mark
/// collapses into a single `-`, and leading/trailing hyphens are dropped. Empty input yields an
/// empty slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.nfc() {
        if c.is_alphanumeric() || is_combining_mark(c) {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}
