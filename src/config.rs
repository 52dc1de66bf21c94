use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::Result;

/// Application configuration, derived from `Engine.toml` and `ENGINE_*`
/// environment variables, or built directly with [`Config::new`] when the
/// engine is embedded.
#[derive(Clone, Deserialize)]
pub struct Config {
    // secrets
    hmac_secret: String,
}

impl Config {
    /// Build a config directly, without touching the filesystem.
    pub fn new(hmac_secret: impl Into<String>) -> Self {
        Self {
            hmac_secret: hmac_secret.into(),
        }
    }

    /// Load the config from `Engine.toml`, with `ENGINE_*` environment
    /// variables taking precedence.
    pub fn load() -> Result<Self> {
        let config = Figment::new()
            .merge(Toml::file("Engine.toml"))
            .merge(Env::prefixed("ENGINE_"))
            .extract()?;
        Ok(config)
    }

    /// Secret key used to sign vote receipts.
    pub fn hmac_secret(&self) -> &[u8] {
        self.hmac_secret.as_bytes()
    }
}
