use crate::config::AppConfig;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Environment prefix for overrides, e.g. `SLTP_EXECUTION__ENABLED=true`.
pub const ENV_PREFIX: &str = "SLTP_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by layering defaults, the TOML file at `path`
    /// and `SLTP_`-prefixed environment variables.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the wrong type.
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
        let path = path.as_ref();
        let config: AppConfig = Self::base(path)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Loads configuration with a profile overlay (`Config.<profile>.toml`
    /// next to `path`) merged on top of the base file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        let path = path.as_ref();
        let profile_path = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("Config.{profile}.toml"));

        let config: AppConfig = Self::base(path)
            .merge(Toml::file(&profile_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| {
                format!(
                    "Failed to load config from {} with profile {profile}",
                    path.display()
                )
            })?;

        tracing::debug!(path = %path.display(), profile, "Configuration loaded");
        Ok(config)
    }

    fn base(path: &Path) -> Figment {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if path.extension().is_some_and(|ext| ext == "json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        }
    }
}
