//! `book nav` command implementation.

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Page file used for a sidebar chapter's edit link.
const CHAPTER_INDEX: &str = "README.md";

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Also list disabled sidebar entries.
    #[arg(long)]
    all: bool,
}

impl NavArgs {
    /// Print navigation links, sidebar order and edit links.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load()?;
        let theme = &config.theme;

        output.highlight(&config.title);
        for link in &theme.nav {
            output.info(&format!("  {} -> {}", link.text, link.link));
        }
        if let (Some(label), Some(url)) = (&theme.repo_label, theme.repo_url()) {
            output.info(&format!("  {label} -> {url}"));
        }

        output.highlight("Sidebar");
        let mut position = 0;
        for entry in &theme.sidebar {
            if entry.enabled {
                position += 1;
                output.info(&format!("  {position}. {}", entry.path));
                let page = format!("{}{CHAPTER_INDEX}", entry.path);
                if let Some(edit) = theme.edit_link(&page) {
                    output.muted(&format!("     {edit}"));
                }
            } else if self.all {
                output.warning(&format!("  -  {} (disabled)", entry.path));
            }
        }

        Ok(())
    }
}
