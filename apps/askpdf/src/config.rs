use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context};
use client_core::{
    config::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL},
    ClientConfig,
};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub api_prefix: String,
    pub session_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_attempts: u32,
}

/// Defaults, then `askpdf.toml` (or an explicit file), then `ASKPDF__*` env vars.
pub fn load_settings(config_file: Option<&Path>) -> anyhow::Result<Settings> {
    let mut builder = Config::builder()
        .set_default("server_url", DEFAULT_BASE_URL)?
        .set_default("api_prefix", DEFAULT_API_PREFIX)?
        .set_default("request_timeout_secs", 60_i64)?
        .set_default("poll_interval_secs", 3_i64)?
        .set_default("poll_attempts", 40_i64)?;

    builder = match config_file {
        Some(path) => builder.add_source(File::from(path.to_path_buf()).required(true)),
        None => builder.add_source(File::with_name("askpdf").required(false)),
    };

    let settings = builder
        .add_source(
            Environment::with_prefix("ASKPDF")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read askpdf settings")?
        .try_deserialize::<Settings>()
        .context("invalid askpdf settings")?;

    Ok(settings)
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.server_url.clone(),
            api_prefix: self.api_prefix.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ingestion_poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            ingestion_poll_attempts: self.poll_attempts,
        }
    }

    pub fn session_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("unable to resolve local app data dir"))?;
        Ok(base.join("askpdf").join("session.json"))
    }
}
