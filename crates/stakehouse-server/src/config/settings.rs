use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use stakehouse_core::{LedgerConfig, SessionConfig, SweeperConfig};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub sweeper: SweeperConfig,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Settings {
    /// `.env`, then `config/settings.toml` (optional), then `STAKEHOUSE__*`
    /// environment variables. Missing keys fall back to defaults.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("STAKEHOUSE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.ttl_ms == 0 {
            bail!("session.ttl_ms must be greater than zero");
        }
        if self.sweeper.interval_ms == 0 {
            bail!("sweeper.interval_ms must be greater than zero");
        }
        if self.ledger.top_k == 0 {
            bail!("ledger.top_k must be greater than zero");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self.server.host.parse::<IpAddr>()?;
        Ok(SocketAddr::from((ip, self.server.port)))
    }
}
