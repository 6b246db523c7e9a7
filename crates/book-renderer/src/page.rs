//! Full page rendering: `<head>` injection, locale and edit link.

use std::fmt::Write;

use book_config::{HeadTag, SiteConfig};

use crate::heading::TocEntry;
use crate::renderer::MarkdownRenderer;
use crate::util::escape_html;

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &["base", "link", "meta"];

/// A rendered documentation page.
#[derive(Clone, Debug)]
pub struct Page {
    /// Complete HTML document.
    pub html: String,
    /// Page title (first H1, falling back to the site title).
    pub title: String,
    /// Anchored headings.
    pub toc: Vec<TocEntry>,
    /// "Edit this page" URL, if edit links are enabled.
    pub edit_link: Option<String>,
    /// Warnings from markdown extensions.
    pub warnings: Vec<String>,
}

/// Render injected head tags, one per line.
#[must_use]
pub fn render_head(tags: &[HeadTag]) -> String {
    let mut out = String::new();
    for tag in tags {
        write!(out, "<{}", tag.tag).unwrap();
        for (name, value) in &tag.attrs {
            write!(out, r#" {name}="{}""#, escape_html(value)).unwrap();
        }
        out.push('>');
        if !VOID_ELEMENTS.contains(&tag.tag.as_str()) {
            write!(out, "</{}>", tag.tag).unwrap();
        }
        out.push('\n');
    }
    out
}

/// Language of the locale whose prefix is the longest match for `page_path`.
#[must_use]
pub fn locale_lang<'a>(config: &'a SiteConfig, page_path: &str) -> Option<&'a str> {
    let path = format!("/{}", page_path.trim_start_matches('/'));
    config
        .locales
        .iter()
        .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, locale)| locale.lang.as_str())
}

/// Render a markdown page into a standalone HTML document.
///
/// `page_path` is relative to the documentation directory
/// (e.g. `1.環境構築/README.md`).
pub fn render_page(
    config: &SiteConfig,
    renderer: &mut MarkdownRenderer,
    page_path: &str,
    markdown: &str,
) -> Page {
    let result = renderer.render(markdown);
    let title = result.title.unwrap_or_else(|| config.title.clone());
    let edit_link = config.theme.edit_link(page_path);

    let mut html = String::from("<!DOCTYPE html>\n");
    match locale_lang(config, page_path) {
        Some(lang) => writeln!(html, r#"<html lang="{}">"#, escape_html(lang)).unwrap(),
        None => html.push_str("<html>\n"),
    }
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    writeln!(
        html,
        "<title>{} | {}</title>",
        escape_html(&title),
        escape_html(&config.title)
    )
    .unwrap();
    if !config.description.is_empty() {
        writeln!(
            html,
            r#"<meta name="description" content="{}">"#,
            escape_html(&config.description)
        )
        .unwrap();
    }
    html.push_str(&render_head(&config.head));
    html.push_str("</head>\n<body>\n<main class=\"page\">\n");
    html.push_str(&result.html);
    html.push('\n');
    if let Some(link) = &edit_link {
        writeln!(
            html,
            r#"<footer class="page-edit"><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></footer>"#,
            escape_html(link),
            escape_html(&config.theme.edit_link_text)
        )
        .unwrap();
    }
    html.push_str("</main>\n</body>\n</html>\n");

    Page {
        html,
        title,
        toc: result.toc,
        edit_link,
        warnings: result.warnings,
    }
}
