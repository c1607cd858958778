/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub transport: TransportConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Deserialize, Clone)]
pub struct ClientConfig {
    pub username: String,
    pub plan: String,
    pub registration_url: String,
}

#[derive(Deserialize, Clone)]
pub struct TransportConfig {
    pub request_timeout_ms: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

#[derive(Deserialize, Clone)]
pub struct DispatchConfig {
    /// When set, the handle pass ignores the busy flag and may overwrite a
    /// pickup command issued earlier in the same turn. Off by default.
    #[serde(default)]
    pub legacy_handle_overwrite: bool,
    /// Direction stamped on drop-off stop commands and used as the arrival
    /// direction in the handle pass.
    #[serde(default = "default_door_open_direction")]
    pub door_open_direction: i8,
}

fn default_door_open_direction() -> i8 {
    crate::shared::structs::DIRN_UP
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    Ok(toml::from_str(&config_str)?)
}

impl Default for DispatchConfig {
    fn default() -> DispatchConfig {
        DispatchConfig {
            legacy_handle_overwrite: false,
            door_open_direction: default_door_open_direction(),
        }
    }
}
