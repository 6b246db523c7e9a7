//! Automatic linking of bare URLs in text.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::util::escape_html;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>\x22'`]+").expect("valid URL regex")
});

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', ')', ']', '、', '。', '」', '）'];

/// Escape `text` as HTML, wrapping bare URLs in links.
#[must_use]
pub(crate) fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in URL_RE.find_iter(text) {
        let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if url.ends_with("://") || url.eq_ignore_ascii_case("www.") {
            continue;
        }
        let end = m.start() + url.len();

        out.push_str(&escape_html(&text[last..m.start()]));
        let href = if url.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url)
        )
        .unwrap();
        last = end;
    }

    out.push_str(&escape_html(&text[last..]));
    out
}
