mod basic;
mod client;

pub use basic::BasicConfig;
pub use client::ClientConfig;

use crate::error::CardexError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Process-level settings (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// REST backend and controller settings (see `client` table in config.toml).
    #[serde(default)]
    pub client: ClientConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "CARDEX_CONFIG";
const ENV_PREFIX: &str = "CARDEX_";

impl Config {
    /// Builds a Figment that merges defaults, the config TOML file (if present) and
    /// `CARDEX_`-prefixed environment variables, in that order.
    pub fn figment() -> Figment {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::figment_from(path)
    }

    /// Same as [`Config::figment`] but reads the TOML file from `path`.
    ///
    /// Nested keys use `__` in env var names, e.g. `CARDEX_CLIENT__BASE_URL`.
    pub fn figment_from(path: impl AsRef<Path>) -> Figment {
        let path = path.as_ref();
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = if path.is_file() {
            figment.merge(Toml::file(path))
        } else {
            figment
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, CardexError> {
        Self::from_figment(&Self::figment())
    }

    /// Extracts and validates; the base URL comes back normalized.
    pub fn from_figment(figment: &Figment) -> Result<Self, CardexError> {
        let mut cfg: Self = figment.extract().map_err(Box::new)?;
        cfg.client.validate()?;
        Ok(cfg)
    }
}
