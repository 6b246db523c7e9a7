//! Heading anchors, permalinks and table of contents.

use std::collections::HashSet;
use std::fmt::Write;

use book_config::AnchorConfig;
use serde::Serialize;

use crate::util::escape_html;

/// Id used when a heading slugs to nothing (e.g. ASCII slugs of Japanese text).
const EMPTY_SLUG_FALLBACK: &str = "section";

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor id.
    pub id: String,
}

/// Tracks the heading being rendered and the ids already handed out.
pub(crate) struct HeadingState {
    anchor: AnchorConfig,
    /// Level of the heading being rendered, if any.
    current_level: Option<u8>,
    /// Plain text of the current heading (slug and ToC source).
    text: String,
    /// HTML of the current heading (inline formatting kept).
    html: String,
    /// First H1 text.
    title: Option<String>,
    toc: Vec<TocEntry>,
    used_ids: HashSet<String>,
}

impl HeadingState {
    pub(crate) fn new(anchor: AnchorConfig) -> Self {
        Self {
            anchor,
            current_level: None,
            text: String::new(),
            html: String::new(),
            title: None,
            toc: Vec::new(),
            used_ids: HashSet::new(),
        }
    }

    /// Forget everything collected for the previous document.
    pub(crate) fn reset(&mut self) {
        self.current_level = None;
        self.text.clear();
        self.html.clear();
        self.title = None;
        self.toc.clear();
        self.used_ids.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start(&mut self, level: u8) {
        self.current_level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    /// Finish the current heading and write it to `out`.
    pub(crate) fn finish(&mut self, out: &mut String) {
        let Some(level) = self.current_level.take() else {
            return;
        };
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let title = text.trim();

        if level == 1 && self.title.is_none() {
            self.title = Some(title.to_owned());
        }

        if !self.anchor.anchors(level) {
            write!(out, "<h{level}>{}</h{level}>", html.trim()).unwrap();
            return;
        }

        let id = self.unique_id(title);
        let id_attr = escape_html(&id);
        write!(out, r#"<h{level} id="{id_attr}">"#).unwrap();
        if self.anchor.permalink {
            let link = format!(
                r##"<a class="header-anchor" href="#{id_attr}" aria-hidden="true">{}</a>"##,
                escape_html(&self.anchor.permalink_symbol)
            );
            if self.anchor.permalink_before {
                write!(out, "{link} {}", html.trim()).unwrap();
            } else {
                write!(out, "{} {link}", html.trim()).unwrap();
            }
        } else {
            out.push_str(html.trim());
        }
        write!(out, "</h{level}>").unwrap();

        self.toc.push(TocEntry {
            level,
            title: title.to_owned(),
            id,
        });
    }

    /// Slug `text` and make it unique within the document: `a`, `a-2`, `a-3`.
    fn unique_id(&mut self, text: &str) -> String {
        let mut base = self.anchor.slugify(text);
        if base.is_empty() {
            EMPTY_SLUG_FALLBACK.clone_into(&mut base);
        }

        let mut id = base.clone();
        let mut n = 2;
        while self.used_ids.contains(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }
        self.used_ids.insert(id.clone());
        id
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}
