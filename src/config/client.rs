use crate::error::CardexError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Settings for talking to the catalog REST API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Root the `/api/{backend}/cards` paths are resolved against.
    /// TOML: `client.base_url`. Default: `http://127.0.0.1:5000/`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Whole-request timeout in seconds.
    /// TOML: `client.request_timeout_secs`. Default: `10`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TCP connect timeout in seconds.
    /// TOML: `client.connect_timeout_secs`. Default: `5`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Quiet period before a search keystroke triggers a reload.
    /// TOML: `client.search_debounce_ms`. Default: `350`.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Drop list responses that were overtaken by a newer load of the same backend.
    /// TOML: `client.discard_stale_loads`. Default: `true`.
    #[serde(default = "default_discard_stale_loads")]
    pub discard_stale_loads: bool,

    /// Optional HTTP proxy for the reqwest client.
    /// TOML: `client.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            discard_stale_loads: default_discard_stale_loads(),
            proxy: None,
        }
    }
}

impl ClientConfig {
    /// Convenience for tests and embedding: defaults pointed at `base_url`.
    pub fn with_base_url(base_url: Url) -> Result<Self, CardexError> {
        let mut cfg = Self {
            base_url,
            ..Self::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Requires an http(s) base URL and makes its path end with `/` so relative
    /// joins keep any path prefix.
    pub fn validate(&mut self) -> Result<(), CardexError> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(CardexError::Validation(format!(
                    "client.base_url must use http or https, got `{other}`"
                )));
            }
        }
        if !self.base_url.path().ends_with('/') {
            let path = format!("{}/", self.base_url.path());
            self.base_url.set_path(&path);
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn build_http_client(&self) -> Result<reqwest::Client, CardexError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("cardex/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .timeout(Duration::from_secs(self.request_timeout_secs));

        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        Ok(builder.build()?)
    }
}

fn default_base_url() -> Url {
    Url::parse("http://127.0.0.1:5000/").expect("valid default base url")
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_search_debounce_ms() -> u64 {
    350
}

fn default_discard_stale_loads() -> bool {
    true
}
