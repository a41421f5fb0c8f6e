use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:5000";
pub const DEFAULT_SERVICE_NAME: &str = "doris-analytics-backend";
pub const DEFAULT_SOURCE: &str = "doris_pando";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WarehouseConfig {
    pub host: String,
    // Doris FE serves the MySQL protocol on 9030 by default
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 9030,
            user: "root".into(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub listen: Option<String>,
    // Name reported by the health endpoint.
    // Defaults to `doris-analytics-backend`.
    pub service_name: Option<String>,
    // Label written into `meta.source` of every data response.
    // Defaults to `doris_pando`.
    pub source: Option<String>,
    #[serde(default)]
    pub warehouse: WarehouseConfig,
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let cfg_str = fs::read_to_string(path)?;
        Ok(toml::from_str(&cfg_str)?)
    }

    /// Reads `path` if it exists, otherwise starts from defaults, then applies
    /// the `DORIS_*` environment overrides.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut cfg = if Path::new(path).exists() {
            info!("Loading configuration from {}", path);
            Self::from_file(path)?
        } else {
            info!("No configuration file at {}, using defaults", path);
            Self::default()
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("DORIS_HOST") {
            self.warehouse.host = host;
        }
        if let Some(port) = lookup("DORIS_PORT") {
            self.warehouse.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid DORIS_PORT '{}': {}", port, e))?;
        }
        if let Some(user) = lookup("DORIS_USER") {
            self.warehouse.user = user;
        }
        if let Some(password) = lookup("DORIS_PASSWORD") {
            self.warehouse.password = password;
        }
        Ok(())
    }
}
