use crate::application_impl::NotifyPolicy;
use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log: Log,
    pub database: Database,
    pub friendships: Friendships,
    pub events: Events,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub migrate: bool,
}

#[derive(Debug, Deserialize)]
pub struct Friendships {
    #[serde(default)]
    pub tables: Tables,
    #[serde(default)]
    pub groups: HashMap<String, u32>,
    #[serde(default)]
    pub notify: NotifyPolicy,
}

#[derive(Debug, Deserialize)]
pub struct Tables {
    pub friendships: String,
    pub groups: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            friendships: "friendships".to_string(),
            groups: "user_friendship_groups".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Events {
    pub backend: String, // "log" or "kafka"
    #[serde(default)]
    pub bootstrap_servers: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    pub topic: String,
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_delivery_timeout_ms() -> u64 {
    10_000
}

fn default_client_id() -> String {
    "friendships".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
