//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod nav;
pub(crate) mod render;
pub(crate) mod show;

use std::path::PathBuf;

use book_config::{CliSettings, SiteConfig};
use clap::Args;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use render::RenderArgs;
pub(crate) use show::ShowArgs;

/// Configuration options shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover book.toml, else built-in).
    #[arg(short, long, env = "BOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Documentation directory for edit links (overrides config).
    #[arg(long)]
    docs_dir: Option<String>,

    /// Disable "edit this page" links.
    #[arg(long)]
    no_edit_links: bool,
}

impl ConfigArgs {
    /// Load and validate the site configuration.
    pub(crate) fn load(&self) -> Result<SiteConfig, CliError> {
        let settings = CliSettings {
            docs_dir: self.docs_dir.clone(),
            edit_links: self.no_edit_links.then_some(false),
        };
        let config = SiteConfig::load(self.config.as_deref(), Some(&settings))?;
        tracing::info!(title = %config.title, "Configuration loaded");
        Ok(config)
    }
}
