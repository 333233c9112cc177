use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::core::PollOptions;
use crate::prelude::*;

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    /// Name of the environment variable holding the bot token
    pub token_var: String,
    pub api_root: String,
    /// Long-poll timeout handed to getUpdates, in seconds
    pub poll_timeout_secs: i64,
    /// Maximum updates per batch; 0 leaves the server default
    pub batch_limit: i64,
    /// Update kinds to subscribe to; empty means no restriction
    pub allowed_updates: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str::<Config>(
            r#"
            token_var = 'POLLIGRAM_TG_TOKEN'
            api_root = 'https://api.telegram.org'
            poll_timeout_secs = 30
            batch_limit = 0
            allowed_updates = []
            "#,
        )
        .unwrap()
    }
}

impl Config {
    pub fn poll_options(&self) -> PollOptions {
        PollOptions {
            timeout_secs: self.poll_timeout_secs,
            limit: (self.batch_limit > 0).then_some(self.batch_limit),
            allowed_updates: if self.allowed_updates.is_empty() {
                None
            } else {
                Some(self.allowed_updates.clone())
            },
        }
    }
}

pub const PACKAGE_VERSION: &str = std::env!("CARGO_PKG_VERSION");

pub fn create<T>(cfg_path: &str) -> UResult<T>
where
    T: Default + Serialize,
{
    let default_config = T::default();
    let serialized = toml::to_string(&default_config)?;
    let mut file = std::fs::File::create(cfg_path)?;
    write!(file, "{}", serialized)?;
    Ok(default_config)
}

pub fn read<T>(cfg_path: &str) -> UResult<T>
where
    T: DeserializeOwned,
{
    let contents = std::fs::read_to_string(cfg_path)?;
    let config = toml::from_str::<T>(&contents)?;
    Ok(config)
}

pub fn read_or_create<T>(cfg_path: &str) -> UResult<T>
where
    T: Default + DeserializeOwned + Serialize,
{
    match read::<T>(cfg_path) {
        Ok(v) => Ok(v),
        Err(_) => create(cfg_path),
    }
}
