//! `playground` fenced blocks.
//!
//! A block such as
//!
//! ````markdown
//! ```playground lang=html height=400 title="Blade の例"
//! <h1>Hello</h1>
//! ```
//! ````
//!
//! becomes a CodePen prefill embed. The `ei.js` script injected into the page
//! head turns it into a live, editable playground.

use std::collections::HashMap;
use std::fmt::Write;

use crate::code_block::{CodeBlockProcessor, ProcessResult};
use crate::util::escape_html;

/// Fence language handled by [`PlaygroundProcessor`].
pub const PLAYGROUND_LANGUAGE: &str = "playground";

const DEFAULT_LANG: &str = "html";
const DEFAULT_HEIGHT: u32 = 300;
const MAX_HEIGHT: u32 = 2000;

/// Languages CodePen accepts in prefill embeds.
const SUPPORTED_LANGS: &[&str] = &[
    "html", "pug", "markdown", "css", "scss", "sass", "less", "stylus", "js", "babel",
    "typescript", "coffeescript",
];

/// Renders `playground` fences as CodePen prefill embeds.
#[derive(Debug, Default)]
pub struct PlaygroundProcessor {
    warnings: Vec<String>,
}

impl PlaygroundProcessor {
    /// Create a processor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn height(&mut self, attrs: &HashMap<String, String>) -> u32 {
        let Some(raw) = attrs.get("height") else {
            return DEFAULT_HEIGHT;
        };
        match raw.parse::<u32>() {
            Ok(h) if (1..=MAX_HEIGHT).contains(&h) => h,
            _ => {
                self.warnings.push(format!(
                    "playground: invalid height '{raw}', using {DEFAULT_HEIGHT}"
                ));
                DEFAULT_HEIGHT
            }
        }
    }
}

impl CodeBlockProcessor for PlaygroundProcessor {
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
    ) -> ProcessResult {
        if language != PLAYGROUND_LANGUAGE {
            return ProcessResult::PassThrough;
        }

        let lang = attrs.get("lang").map_or(DEFAULT_LANG, String::as_str);
        if !SUPPORTED_LANGS.contains(&lang) {
            self.warnings.push(format!(
                "playground: unsupported lang '{lang}', rendered as plain code"
            ));
            return ProcessResult::PassThrough;
        }

        let height = self.height(attrs);
        let default_tab = attrs
            .get("tab")
            .cloned()
            .unwrap_or_else(|| format!("{lang},result"));

        let mut html = String::from(r#"<div class="codepen" data-prefill"#);
        if let Some(title) = attrs.get("title") {
            let prefill = serde_json::json!({ "title": title });
            write!(html, r#"="{}""#, escape_html(&prefill.to_string())).unwrap();
        }
        write!(
            html,
            r#" data-height="{height}" data-default-tab="{}"><pre data-lang="{lang}">{}</pre></div>"#,
            escape_html(&default_tab),
            escape_html(source.trim_end_matches('\n')),
        )
        .unwrap();

        ProcessResult::Inline(html)
    }

    fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
