//! `book show` command implementation.

use clap::Args;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    #[command(flatten)]
    config: ConfigArgs,
}

impl ShowArgs {
    /// Print the resolved configuration as JSON.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.config.load()?;
        let json = serde_json::to_string_pretty(&config)?;
        Output::new().data(&format!("{json}\n"))?;
        Ok(())
    }
}
