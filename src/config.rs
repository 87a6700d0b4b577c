//! User configuration stored in ~/.todofast/config.json
//!
//! View preferences and locale settings used to live in ambient browser
//! storage; here they are one explicit object, loaded once and passed to
//! the components that need it.

use std::fs;
use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::types::ViewMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// IANA timezone name for wall-clock conversion.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// View the calendar opens in.
    #[serde(default)]
    pub default_view: ViewMode,
    /// First hour shown in the week/day time gutter.
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u8,
    /// Last hour shown in the week/day time gutter.
    #[serde(default = "default_day_end_hour")]
    pub day_end_hour: u8,
    /// UI language tag.
    #[serde(default = "default_language")]
    pub language: String,
    /// Base URL of the TodoFast backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_timezone() -> String {
    "Asia/Jerusalem".to_string()
}

fn default_day_start_hour() -> u8 {
    8
}

fn default_day_end_hour() -> u8 {
    22
}

fn default_language() -> String {
    "he".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_view: ViewMode::default(),
            day_start_hour: default_day_start_hour(),
            day_end_hour: default_day_end_hour(),
            language: default_language(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl Config {
    /// Parse the configured timezone, falling back to Asia/Jerusalem on a
    /// bad IANA name.
    pub fn tz(&self) -> Tz {
        self.timezone.parse::<Tz>().unwrap_or_else(|_| {
            log::warn!("unknown timezone '{}', using Asia/Jerusalem", self.timezone);
            chrono_tz::Asia::Jerusalem
        })
    }
}

/// Get the canonical config file path (~/.todofast/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".todofast").join("config.json"))
}

/// Load configuration from ~/.todofast/config.json.
///
/// A missing file is not an error: first run gets the defaults.
pub fn load_config() -> Result<Config, String> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Write the config to disk, creating ~/.todofast/ if needed.
pub fn save_config(config: &Config) -> Result<(), String> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))
}
