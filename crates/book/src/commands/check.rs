//! `book check` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Repository root; verifies every enabled sidebar entry has a directory
    /// under the docs directory.
    #[arg(long)]
    root: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;

        if let Some(root) = &self.root {
            config.check_sources(root)?;
            output.info(&format!(
                "Sidebar sources found under {}",
                root.join(&config.theme.docs_dir).display()
            ));
        }

        output.success(&format!("Configuration OK: {}", config.title));

        let locales: Vec<String> = config
            .locales
            .iter()
            .map(|(prefix, locale)| format!("{prefix} ({})", locale.lang))
            .collect();
        output.info(&format!("Locales: {}", locales.join(", ")));

        let active = config.theme.active_sidebar().count();
        let disabled = config.theme.sidebar.len() - active;
        output.info(&format!(
            "Sidebar: {active} chapters ({disabled} disabled)"
        ));

        let extensions: Vec<&str> = config
            .markdown
            .extensions
            .iter()
            .map(|ext| ext.name())
            .collect();
        if extensions.is_empty() {
            output.info("Markdown extensions: none");
        } else {
            output.info(&format!("Markdown extensions: {}", extensions.join(", ")));
        }

        Ok(())
    }
}
