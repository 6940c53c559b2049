use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tinvest_rest::RestConfig;

/// Environment variables with this prefix override file values,
/// e.g. `TINVEST__API__TOKEN` or `TINVEST__LOGGING__LEVEL`.
pub const ENV_PREFIX: &str = "TINVEST__";

/// Top-level configuration of the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api: RestConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when neither `RUST_LOG` nor `-v` is given
    #[serde(default = "default_level")]
    pub level: String,

    /// Colored output on stderr
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

fn default_level() -> String {
    "warn".to_owned()
}

fn default_ansi() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            ansi: default_ansi(),
        }
    }
}

impl AppConfig {
    /// Layered load: defaults, then the YAML file (if any), then `TINVEST__*` env.
    ///
    /// # Errors
    /// Returns an error if a layer cannot be read or the merged result does
    /// not match the schema.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid configuration")
    }

    /// Effective configuration as pretty JSON. The token is never included.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
