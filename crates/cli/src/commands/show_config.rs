//! Show-config CLI command.

use anyhow::Result;
use clap::Args;

use super::load_config;

/// Arguments for the show-config command.
#[derive(Args, Debug, Clone)]
pub struct ShowConfigArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Profile overlay (reads Config.<profile>.toml next to the config file)
    #[arg(long)]
    pub profile: Option<String>,
}

/// Prints the effective configuration as JSON.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded.
pub fn run_show_config(args: &ShowConfigArgs) -> Result<()> {
    let config = load_config(&args.config, args.profile.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
