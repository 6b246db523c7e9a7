//! Fenced code block interception.
//!
//! Extensions hook into rendering by registering a [`CodeBlockProcessor`].
//! Processors are asked in registration order; the first one that does not
//! return [`ProcessResult::PassThrough`] wins.

use std::collections::HashMap;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the code block with this HTML.
    Inline(String),
    /// Not handled here; render as a regular code block.
    PassThrough,
}

/// Processor for special fenced code blocks.
pub trait CodeBlockProcessor {
    /// Process a code block.
    ///
    /// * `language` - first word of the fence info string
    /// * `attrs` - `key=value` pairs following the language
    /// * `source` - raw block content
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
    ) -> ProcessResult;

    /// Drain warnings collected since the last call.
    fn take_warnings(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Parse a fence info string into language and attributes.
///
/// Format: `language [key=value ...]`. Values may be wrapped in single or
/// double quotes to include spaces. Words without `=` are ignored.
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let info = info.trim();
    let (language, mut rest) = info
        .split_once(char::is_whitespace)
        .unwrap_or((info, ""));

    let mut attrs = HashMap::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let Some(eq) = rest[..word_end].find('=') else {
            rest = &rest[word_end..];
            continue;
        };

        let key = &rest[..eq];
        let after = &rest[eq + 1..];
        let (value, remaining) = match after.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after[1..];
                match body.find(quote) {
                    Some(close) => (&body[..close], &body[close + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };

        if !key.is_empty() {
            attrs.insert(key.to_owned(), value.to_owned());
        }
        rest = remaining;
    }

    (language.to_owned(), attrs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_only() {
        let (lang, attrs) = parse_fence_info("php");
        assert_eq!(lang, "php");
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_with_attrs() {
        let (lang, attrs) = parse_fence_info("playground lang=css height=400");
        assert_eq!(lang, "playground");
        assert_eq!(attrs.get("lang").map(String::as_str), Some("css"));
        assert_eq!(attrs.get("height").map(String::as_str), Some("400"));
    }

    #[test]
    fn test_quoted_value_with_spaces() {
        let (lang, attrs) = parse_fence_info(r#"playground title="Blade の例" lang='html'"#);
        assert_eq!(lang, "playground");
        assert_eq!(attrs.get("title").map(String::as_str), Some("Blade の例"));
        assert_eq!(attrs.get("lang").map(String::as_str), Some("html"));
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        let (_, attrs) = parse_fence_info(r#"playground title="open ended"#);
        assert_eq!(attrs.get("title").map(String::as_str), Some("open ended"));
    }

    #[test]
    fn test_words_without_equals_ignored() {
        let (lang, attrs) = parse_fence_info("php {1,3} startinline=true");
        assert_eq!(lang, "php");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("startinline").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_empty_info() {
        let (lang, attrs) = parse_fence_info("   ");
        assert_eq!(lang, "");
        assert!(attrs.is_empty());
    }
}
