//! Markdown rendering driven by the book's [`SiteConfig`](book_config::SiteConfig).
//!
//! [`MarkdownRenderer::from_config`] applies the markdown section of the
//! configuration: heading anchors and permalinks built with the configured
//! slug function, linkify, and the registered extensions.
//!
//! Extensions are attached through [`ProcessorCapability`], which exposes only
//! code block processor registration. Each configured
//! [`Extension`](book_config::Extension) maps to a [`ConfigHook`].
//!
//! # Example
//!
//! ```
//! use book_renderer::MarkdownRenderer;
//!
//! let config = book_config::load_config().unwrap();
//! let mut renderer = MarkdownRenderer::from_config(&config.markdown);
//! let result = renderer.render("## Hello World");
//! assert_eq!(result.toc[0].id, "hello-world");
//! ```

mod capability;
mod code_block;
mod heading;
mod linkify;
mod page;
mod playground;
mod renderer;
mod util;

pub use capability::{ConfigHook, ProcessorCapability, apply_extensions, hook_for};
pub use code_block::{CodeBlockProcessor, ProcessResult};
pub use heading::TocEntry;
pub use page::{Page, locale_lang, render_head, render_page};
pub use playground::{PLAYGROUND_LANGUAGE, PlaygroundProcessor};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use util::escape_html;
