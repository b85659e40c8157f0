//! CLI commands for the fixed SL/TP manager.

pub mod once;
pub mod preview;
pub mod run;
pub mod show_config;

pub use once::{run_once, OnceArgs};
pub use preview::{run_preview, PreviewArgs};
pub use run::{run_manager, RunArgs};
pub use show_config::{run_show_config, ShowConfigArgs};

use anyhow::Result;
use sltp_core::{AppConfig, ConfigLoader};

/// Load the config file, layering the named profile on top when given.
pub(crate) fn load_config(path: &str, profile: Option<&str>) -> Result<AppConfig> {
    match profile {
        Some(profile) => ConfigLoader::load_with_profile(path, profile),
        None => ConfigLoader::load(path),
    }
}
