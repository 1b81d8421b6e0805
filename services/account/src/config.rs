//! HTTP server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration
///
/// Defaults can be overridden with `SERVER_HOST` and `SERVER_PORT`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .add_source(config::Environment::with_prefix("SERVER").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
