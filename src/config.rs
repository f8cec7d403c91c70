//! # Configuration Module
//!
//! This module loads the bot configuration from the process environment.
//! The bot token and the weather API key are secrets and must be present;
//! everything else has a default.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

// Environment variable names
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const WEATHER_TOKEN_VAR: &str = "OWM_TOKEN";
pub const STORE_PATH_VAR: &str = "PROFILE_STORE_PATH";
pub const FOOD_API_URL_VAR: &str = "FOOD_API_URL";
pub const WEATHER_API_URL_VAR: &str = "WEATHER_API_URL";

// Defaults for the optional settings
pub const DEFAULT_STORE_PATH: &str = "user_infos.json";
pub const DEFAULT_FOOD_API_URL: &str = "https://world.openfoodfacts.org";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org";

/// Startup-time misconfiguration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Runtime configuration for the tracker bot
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot access token
    pub bot_token: String,
    /// OpenWeatherMap API key
    pub weather_api_key: String,
    /// Location of the shared profile file
    pub store_path: PathBuf,
    /// Base URL of the Open Food Facts service
    pub food_api_url: String,
    /// Base URL of the OpenWeatherMap service
    pub weather_api_url: String,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// Empty values count as absent, so `BOT_TOKEN=` in a `.env` file is
    /// reported the same way as a missing variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = get(BOT_TOKEN_VAR).ok_or(ConfigError::Missing(BOT_TOKEN_VAR))?;
        let weather_api_key =
            get(WEATHER_TOKEN_VAR).ok_or(ConfigError::Missing(WEATHER_TOKEN_VAR))?;

        Ok(Self {
            bot_token,
            weather_api_key,
            store_path: get(STORE_PATH_VAR)
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string())
                .into(),
            food_api_url: get(FOOD_API_URL_VAR).unwrap_or_else(|| DEFAULT_FOOD_API_URL.to_string()),
            weather_api_url: get(WEATHER_API_URL_VAR)
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
        })
    }
}
