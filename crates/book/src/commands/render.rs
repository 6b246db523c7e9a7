//! `book render` command implementation.

use std::path::{Component, Path, PathBuf};

use book_renderer::{MarkdownRenderer, render_page};
use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Page path relative to the docs directory, used for the edit link
    /// (default: derived from FILE).
    #[arg(long)]
    page: Option<String>,

    /// Print only the rendered markdown body instead of a full document.
    #[arg(long)]
    body_only: bool,
}

impl RenderArgs {
    /// Render the markdown file to stdout.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        let markdown = std::fs::read_to_string(&self.file).map_err(|source| CliError::ReadPage {
            path: self.file.display().to_string(),
            source,
        })?;

        let page_path = self
            .page
            .unwrap_or_else(|| page_path(&self.file, &config.theme.docs_dir));
        tracing::info!(page = %page_path, "Rendering page");

        let mut renderer = MarkdownRenderer::from_config(&config.markdown);
        let (html, warnings) = if self.body_only {
            let result = renderer.render(&markdown);
            (result.html, result.warnings)
        } else {
            let page = render_page(&config, &mut renderer, &page_path, &markdown);
            (page.html, page.warnings)
        };

        for warning in &warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.data(&html)?;
        Ok(())
    }
}

/// Page path of `file` relative to the docs directory.
///
/// Uses the part after the last `docs_dir` component when present, otherwise
/// the path as given.
fn page_path(file: &Path, docs_dir: &str) -> String {
    let parts: Vec<String> = file
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let docs_dir = docs_dir.trim_matches('/');
    let start = if docs_dir.is_empty() {
        0
    } else {
        parts
            .iter()
            .rposition(|part| part == docs_dir)
            .map_or(0, |i| i + 1)
    };

    parts[start..].join("/")
}
