use std::path::{Path, PathBuf};
use std::time::Duration;

use config::Config;
use serde::Deserialize;

use crate::core::error::ConfigError;

const ENV_PREFIX: &str = "PORTAL";

#[derive(Debug, Deserialize, Clone)]
pub struct Args {
    pub api_url: String,
    pub storage_path: Option<PathBuf>,
    pub log_level: String,
    pub login_timeout_secs: u64,
    pub home_route: String,
    pub login_route: String,
}

impl Args {
    /// Defaults, then an optional TOML file, then `PORTAL_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_url", "http://localhost:8080/api")?
            .set_default("log_level", "info")?
            .set_default("login_timeout_secs", 10)?
            .set_default("home_route", "/home")?
            .set_default("login_route", "/login")?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(config.try_deserialize::<Args>()?)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn storage_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage_path {
            Some(path) => Ok(path.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("warehouse-portal").join("storage.json"))
                .ok_or(ConfigError::NoDataDir),
        }
    }
}
