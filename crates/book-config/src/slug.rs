//! Heading slug generation.
//!
//! Slugs become permanent anchor URLs, so every style here is a pure,
//! deterministic and idempotent function of its input.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Bytes left unescaped by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Slug function used for heading anchors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugStyle {
    /// Percent-encoded slug that keeps non-ASCII headings addressable.
    #[default]
    Encoded,
    /// ASCII-only slug; everything but alphanumerics and separators is dropped.
    Ascii,
}

impl SlugStyle {
    /// Apply this slug style to heading text.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Encoded => slugify(text),
            Self::Ascii => slugify_ascii(text),
        }
    }
}

/// Convert heading text to a percent-encoded slug.
///
/// Trims, lowercases, collapses whitespace runs into a single `-` and
/// percent-encodes everything outside the `encodeURIComponent` unreserved set.
/// Existing `%XX` escapes are kept as-is (hex digits uppercased), which makes
/// the function idempotent.
///
/// ```
/// use book_config::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("環境構築"), "%E7%92%B0%E5%A2%83%E6%A7%8B%E7%AF%89");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();

    let mut dashed = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                dashed.push('-');
            }
            in_whitespace = true;
        } else {
            dashed.push(c);
            in_whitespace = false;
        }
    }

    let mut result = String::with_capacity(dashed.len() * 3);
    encode_component(&dashed, &mut result);
    result
}

/// Percent-encode `text` into `out`, passing through valid `%XX` escapes.
fn encode_component(text: &str, out: &mut String) {
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && is_escape(&bytes[i + 1..]) {
            out.extend(utf8_percent_encode(&text[start..i], URI_COMPONENT));
            out.push('%');
            out.push(char::from(bytes[i + 1].to_ascii_uppercase()));
            out.push(char::from(bytes[i + 2].to_ascii_uppercase()));
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }

    out.extend(utf8_percent_encode(&text[start..], URI_COMPONENT));
}

fn is_escape(rest: &[u8]) -> bool {
    matches!(rest, [hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
}

/// Convert text to an ASCII slug.
///
/// Lowercases, replaces whitespace/dashes/underscores with single dashes and
/// removes other characters.
#[must_use]
pub fn slugify_ascii(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}
