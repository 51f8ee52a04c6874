use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Basic (process) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Directory the terminal view writes rendered grids into.
    /// TOML: `basic.output_dir`. Default: `cardex-out`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: default_loglevel(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("cardex-out")
}
