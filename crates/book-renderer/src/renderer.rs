//! Markdown to HTML renderer configured from [`MarkdownConfig`].

use std::collections::HashMap;
use std::fmt::Write;

use book_config::MarkdownConfig;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::capability::{ProcessorCapability, apply_extensions};
use crate::code_block::{CodeBlockProcessor, ProcessResult, parse_fence_info};
use crate::heading::{HeadingState, TocEntry};
use crate::linkify::linkify;
use crate::util::{escape_html, heading_level_to_num};

/// Result of rendering one markdown document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Text of the first H1 heading.
    pub title: Option<String>,
    /// Anchored headings in document order.
    pub toc: Vec<TocEntry>,
    /// Warnings from extensions (bad attributes, unsupported languages).
    pub warnings: Vec<String>,
}

/// Markdown renderer.
///
/// Build it once from the site configuration and render any number of pages;
/// per-document state (heading ids, ToC) is reset on every call to
/// [`render`](Self::render).
pub struct MarkdownRenderer {
    output: String,
    heading: HeadingState,
    processors: Vec<Box<dyn CodeBlockProcessor>>,
    linkify: bool,
    /// Adjacent text events, merged so URLs are not split.
    pending_text: String,
    code: Option<CodeBlock>,
    link_depth: usize,
    /// Open images, innermost last. Nested image text joins the outer alt.
    images: Vec<PendingImage>,
    table_alignments: Vec<Alignment>,
    table_cell: usize,
    in_table_head: bool,
}

struct CodeBlock {
    language: Option<String>,
    attrs: HashMap<String, String>,
    source: String,
}

struct PendingImage {
    src: String,
    title: String,
    alt: String,
}

impl MarkdownRenderer {
    /// Create a renderer with anchors, linkify and extensions from `config`.
    #[must_use]
    pub fn from_config(config: &MarkdownConfig) -> Self {
        let mut renderer = Self {
            output: String::new(),
            heading: HeadingState::new(config.anchor.clone()),
            processors: Vec::new(),
            linkify: config.linkify,
            pending_text: String::new(),
            code: None,
            link_depth: 0,
            images: Vec::new(),
            table_alignments: Vec::new(),
            table_cell: 0,
            in_table_head: false,
        };
        apply_extensions(config, &mut renderer);
        renderer
    }

    /// Number of registered code block processors.
    #[must_use]
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Render a markdown document.
    pub fn render(&mut self, markdown: &str) -> RenderResult {
        self.reset();

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        for event in Parser::new_ext(markdown, options) {
            self.process_event(event);
        }
        self.flush_text();

        let warnings: Vec<String> = self
            .processors
            .iter_mut()
            .flat_map(|p| p.take_warnings())
            .collect();
        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
            warnings,
        }
    }

    fn reset(&mut self) {
        self.output.clear();
        self.heading.reset();
        self.pending_text.clear();
        self.code = None;
        self.link_depth = 0;
        self.images.clear();
        self.table_alignments.clear();
        self.table_cell = 0;
        self.in_table_head = false;
    }

    fn process_event(&mut self, event: Event<'_>) {
        if let Event::Text(text) = &event {
            if let Some(code) = self.code.as_mut() {
                code.source.push_str(text);
            } else {
                self.pending_text.push_str(text);
            }
            return;
        }
        self.flush_text();

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.output.push_str(&html),
            Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => self.push_inline("\n"),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.push_inline(if checked {
                r#"<input type="checkbox" checked disabled> "#
            } else {
                r#"<input type="checkbox" disabled> "#
            }),
            Event::Text(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    /// Push inline HTML to the heading buffer or the output.
    ///
    /// Dropped inside image descriptions, where only text reaches the alt.
    fn push_inline(&mut self, html: &str) {
        if !self.images.is_empty() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(html);
        } else {
            self.output.push_str(html);
        }
    }

    /// Write merged text, linkified unless inside a link.
    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);

        if let Some(image) = self.images.last_mut() {
            image.alt.push_str(&text);
            return;
        }

        let html = if self.linkify && self.link_depth == 0 {
            linkify(&text)
        } else {
            escape_html(&text)
        };

        if self.heading.is_active() {
            self.heading.push_text(&text);
            self.heading.push_html(&html);
        } else {
            self.output.push_str(&html);
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => self.heading.start(heading_level_to_num(level)),
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>"),
            Tag::CodeBlock(kind) => {
                let (language, attrs) = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let (language, attrs) = parse_fence_info(&info);
                        ((!language.is_empty()).then_some(language), attrs)
                    }
                    CodeBlockKind::Indented => (None, HashMap::new()),
                };
                self.code = Some(CodeBlock {
                    language,
                    attrs,
                    source: String::new(),
                });
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => write!(self.output, r#"<ol start="{start}">"#).unwrap(),
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.table_cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table_cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let cell = if self.in_table_head { "th" } else { "td" };
                let style = match self.table_alignments.get(self.table_cell) {
                    Some(Alignment::Left) => r#" style="text-align:left""#,
                    Some(Alignment::Center) => r#" style="text-align:center""#,
                    Some(Alignment::Right) => r#" style="text-align:right""#,
                    Some(Alignment::None) | None => "",
                };
                write!(self.output, "<{cell}{style}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                self.link_depth += 1;
                let title_attr = if title.is_empty() {
                    String::new()
                } else {
                    format!(r#" title="{}""#, escape_html(&title))
                };
                let open = format!(r#"<a href="{}"{title_attr}>"#, escape_html(&dest_url));
                self.push_inline(&open);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.images.push(PendingImage {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                });
            }
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::HtmlBlock | Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => self.heading.finish(&mut self.output),
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "</th>" } else { "</td>" });
                self.table_cell += 1;
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                self.link_depth = self.link_depth.saturating_sub(1);
                self.push_inline("</a>");
            }
            TagEnd::Image => {
                if let Some(image) = self.images.pop() {
                    if let Some(outer) = self.images.last_mut() {
                        outer.alt.push_str(&image.alt);
                        return;
                    }
                    let title_attr = if image.title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&image.title))
                    };
                    let img = format!(
                        r#"<img src="{}"{title_attr} alt="{}">"#,
                        escape_html(&image.src),
                        escape_html(&image.alt)
                    );
                    self.push_inline(&img);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::HtmlBlock | TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => {}
        }
    }

    /// Offer the block to processors, falling back to `<pre><code>`.
    fn finish_code_block(&mut self) {
        let Some(block) = self.code.take() else {
            return;
        };

        if let Some(language) = &block.language {
            for processor in &mut self.processors {
                if let ProcessResult::Inline(html) =
                    processor.process(language, &block.attrs, &block.source)
                {
                    self.output.push_str(&html);
                    return;
                }
            }
        }

        match &block.language {
            Some(language) => write!(
                self.output,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(language),
                escape_html(&block.source)
            ),
            None => write!(
                self.output,
                "<pre><code>{}</code></pre>",
                escape_html(&block.source)
            ),
        }
        .unwrap();
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(image) = self.images.last_mut() {
            image.alt.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
    }
}

impl ProcessorCapability for MarkdownRenderer {
    fn register(&mut self, processor: Box<dyn CodeBlockProcessor>) {
        self.processors.push(processor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn book_renderer() -> MarkdownRenderer {
        MarkdownRenderer::from_config(&book_config::load_config().unwrap().markdown)
    }

    fn plain_renderer() -> MarkdownRenderer {
        let mut config = book_config::load_config().unwrap().markdown;
        config.anchor.permalink = false;
        config.extensions.clear();
        config.linkify = false;
        MarkdownRenderer::from_config(&config)
    }

    #[test]
    fn test_paragraph() {
        let result = plain_renderer().render("Hello, world!");
        assert_eq!(result.html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_permalink() {
        let result = book_renderer().render("## Hello World");
        assert_eq!(
            result.html,
            r##"<h2 id="hello-world"><a class="header-anchor" href="#hello-world" aria-hidden="true">#</a> Hello World</h2>"##
        );
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 2,
                title: "Hello World".to_owned(),
                id: "hello-world".to_owned(),
            }]
        );
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = plain_renderer().render("## `php artisan` の使い方");
        assert_eq!(
            result.html,
            r#"<h2 id="php-artisan-%E3%81%AE%E4%BD%BF%E3%81%84%E6%96%B9"><code>php artisan</code> の使い方</h2>"#
        );
    }

    #[test]
    fn test_title_from_first_h1() {
        let result = book_renderer().render("# 環境構築\n\n## Docker\n\n# Other");
        assert_eq!(result.title.as_deref(), Some("環境構築"));
        assert_eq!(result.toc.len(), 3);
    }

    #[test]
    fn test_heading_outside_levels() {
        let result = book_renderer().render("#### Note");
        assert_eq!(result.html, "<h4>Note</h4>");
        assert!(result.toc.is_empty());
    }

    #[test]
    fn test_ids_reset_between_documents() {
        let mut renderer = plain_renderer();
        let first = renderer.render("## Setup\n\n## Setup");
        assert_eq!(first.toc[1].id, "setup-2");
        let second = renderer.render("## Setup");
        assert_eq!(second.toc[0].id, "setup");
    }

    #[test]
    fn test_linkify_text() {
        let result = book_renderer().render("詳しくは https://laravel.com/docs を参照。");
        assert_eq!(
            result.html,
            r#"<p>詳しくは <a href="https://laravel.com/docs">https://laravel.com/docs</a> を参照。</p>"#
        );
    }

    #[test]
    fn test_linkify_skips_links_and_code() {
        let result =
            book_renderer().render("[https://a.example](https://a.example) `https://b.example`");
        assert_eq!(result.html.matches("<a href=").count(), 1);
        assert!(result.html.contains("<code>https://b.example</code>"));
    }

    #[test]
    fn test_linkify_disabled() {
        let result = plain_renderer().render("https://laravel.com");
        assert_eq!(result.html, "<p>https://laravel.com</p>");
    }

    #[test]
    fn test_code_block() {
        let result = book_renderer().render("```php\n<?php echo 'hi';\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-php\">&lt;?php echo &#x27;hi&#x27;;\n</code></pre>"
        );
    }

    #[test]
    fn test_indented_code_block() {
        let result = plain_renderer().render("    composer install\n");
        assert_eq!(result.html, "<pre><code>composer install\n</code></pre>");
    }

    #[test]
    fn test_playground_block() {
        let result = book_renderer().render("```playground lang=css\nh1 { color: red; }\n```");
        assert!(result.html.starts_with(r#"<div class="codepen" data-prefill"#));
        assert!(result.html.contains(r#"<pre data-lang="css">h1 { color: red; }</pre>"#));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_playground_without_extension() {
        let result = plain_renderer().render("```playground\n<p>x</p>\n```");
        assert!(result.html.contains(r#"class="language-playground""#));
    }

    #[test]
    fn test_playground_warnings_reported() {
        let mut renderer = book_renderer();
        let result = renderer.render("```playground height=0\nx\n```");
        assert_eq!(result.warnings.len(), 1);
        let next = renderer.render("plain");
        assert!(next.warnings.is_empty());
    }

    #[test]
    fn test_custom_processor_registration() {
        struct Upper;
        impl CodeBlockProcessor for Upper {
            fn process(
                &mut self,
                language: &str,
                _attrs: &HashMap<String, String>,
                source: &str,
            ) -> ProcessResult {
                if language == "upper" {
                    ProcessResult::Inline(source.to_uppercase())
                } else {
                    ProcessResult::PassThrough
                }
            }
        }

        let mut renderer = plain_renderer();
        renderer.register(Box::new(Upper));
        assert_eq!(renderer.processor_count(), 1);
        let result = renderer.render("```upper\nabc\n```");
        assert_eq!(result.html, "ABC\n");
    }

    #[test]
    fn test_from_config_registers_extensions() {
        assert_eq!(book_renderer().processor_count(), 1);
        assert_eq!(plain_renderer().processor_count(), 0);
    }

    #[test]
    fn test_lists_and_tasks() {
        let result = plain_renderer().render("- [x] done\n- [ ] todo\n\n3. three\n4. four");
        assert!(result.html.contains(r#"<ul><li><input type="checkbox" checked disabled> done</li>"#));
        assert!(result.html.contains(r#"<ol start="3"><li>three</li>"#));
    }

    #[test]
    fn test_table() {
        let result = plain_renderer().render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            concat!(
                r#"<table><thead><tr><th style="text-align:left">a</th><th style="text-align:right">b</th></tr></thead>"#,
                r#"<tbody><tr><td style="text-align:left">1</td><td style="text-align:right">2</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_image_and_link() {
        let result =
            plain_renderer().render(r#"![ロゴ](logo.png "Laravel") [公式](https://laravel.com)"#);
        assert_eq!(
            result.html,
            r#"<p><img src="logo.png" title="Laravel" alt="ロゴ"> <a href="https://laravel.com">公式</a></p>"#
        );
    }

    #[test]
    fn test_inline_html_stays_in_heading() {
        let result = book_renderer().render("## Hello <span>World</span>");
        assert_eq!(
            result.html,
            r##"<h2 id="hello-world"><a class="header-anchor" href="#hello-world" aria-hidden="true">#</a> Hello <span>World</span></h2>"##
        );
        assert_eq!(result.toc[0].title, "Hello World");
    }

    #[test]
    fn test_nested_image_joins_outer_alt() {
        let result = plain_renderer().render("![outer ![inner](i.png) text](o.png)");
        assert_eq!(result.html, r#"<p><img src="o.png" alt="outer inner text"></p>"#);
    }

    #[test]
    fn test_inline_code_in_image_alt() {
        let result = plain_renderer().render("![`artisan` の出力](out.png)");
        assert_eq!(result.html, r#"<p><img src="out.png" alt="artisan の出力"></p>"#);
    }

    #[test]
    fn test_emphasis_and_strikethrough() {
        let result = plain_renderer().render("*a* **b** ~~c~~");
        assert_eq!(result.html, "<p><em>a</em> <strong>b</strong> <s>c</s></p>");
    }
}
