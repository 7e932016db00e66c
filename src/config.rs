use anyhow::Context;
use serde::Deserialize;

use crate::http::parser::DEFAULT_BUFFER_SIZE;

/// Env var naming a YAML config file.
pub const CONFIG_PATH_ENV: &str = "HTTPFRAME_CONFIG";
/// Env var overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Starting size of each connection's read buffer
    pub initial_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 42069,
            initial_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Loads the file named by `HTTPFRAME_CONFIG` (or defaults), then applies
    /// a `PORT` override.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {path}"))?;
                Self::from_yaml(&raw).with_context(|| format!("invalid config file {path}"))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(port) = std::env::var(PORT_ENV) {
            match port.parse() {
                Ok(port) => cfg.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid {} override", PORT_ENV),
            }
        }

        Ok(cfg)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        anyhow::ensure!(
            cfg.server.initial_buffer_size > 0,
            "server.initial_buffer_size must be positive"
        );
        Ok(cfg)
    }
}
