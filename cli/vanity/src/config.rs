use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config as HierarchicalConfig, Environment};
use serde::{Deserialize, Serialize};
use tracing::debug;
use xdg::BaseDirectories;

/// Name of vanity managed directories (config, cache)
const VANITY_DIR_NAME: &str = "vanity";
pub const VANITY_CONFIG_FILE: &str = "vanity.toml";

/// Default base URL of the product catalog service.
pub const DEFAULT_CATALOG_URL: &str = "https://makeup-api.herokuapp.com";

#[derive(Clone, Debug, Deserialize, Default, Serialize)]
pub struct Config {
    /// vanity configuration options
    #[serde(default, flatten)]
    pub vanity: VanityConfig,
}

/// Describes the configuration for the vanity CLI
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VanityConfig {
    /// The URL of the catalog instance to use
    // Using a URL here adds an extra trailing slash,
    // so just use a String.
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Fetch the unfiltered catalog as soon as a session starts,
    /// instead of waiting for the first explicit search
    #[serde(default)]
    pub eager_fetch: bool,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

impl Default for VanityConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            eager_fetch: false,
        }
    }
}

impl Config {
    /// Creates a [Config] from defaults, the user's config file and
    /// `VANITY_*` environment variables, in increasing precedence.
    pub fn parse() -> Result<Config> {
        let builder = HierarchicalConfig::builder();

        let builder = match config_file() {
            Some(path) => {
                debug!(path = %path.display(), "reading config file");
                builder.add_source(config::File::from(path).required(false))
            },
            None => builder,
        };

        let final_config = builder
            .add_source(Environment::with_prefix("VANITY").try_parsing(true))
            .build()
            .context("could not read configuration")?;

        let config: Config = final_config
            .try_deserialize()
            .context("could not parse configuration")?;
        debug!(?config, "parsed configuration");
        Ok(config)
    }
}

/// Path of the user's config file, if one exists.
fn config_file() -> Option<PathBuf> {
    BaseDirectories::with_prefix(VANITY_DIR_NAME).find_config_file(VANITY_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_apply_without_file_or_environment() {
        let config = temp_env::with_vars_unset(
            ["VANITY_CATALOG_URL", "VANITY_EAGER_FETCH"],
            || Config::parse().unwrap(),
        );
        assert_eq!(config.vanity.catalog_url, DEFAULT_CATALOG_URL);
        assert!(!config.vanity.eager_fetch);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = temp_env::with_vars(
            [
                ("VANITY_CATALOG_URL", Some("http://localhost:8123")),
                ("VANITY_EAGER_FETCH", Some("true")),
            ],
            || Config::parse().unwrap(),
        );
        assert_eq!(config.vanity.catalog_url, "http://localhost:8123");
        assert!(config.vanity.eager_fetch);
    }
}
