//! Configuration management for wadash.
//!
//! Settings live in a JSON file inside the per-user data directory (see
//! [`DataStorage`]). Every section is optional; a missing file means the
//! default configuration. Environment variables (optionally loaded from a
//! `.env` file) override file values, which is how the dashboard is usually
//! pointed at a backend on kiosk machines.
//!
//! ## Sections
//!
//! - **Server**: backend URL and API key/secret pair
//! - **Dashboard**: refresh interval and per-refresh record limits
//!
//! ## Environment Overrides
//!
//! | Variable              | Field                          |
//! |-----------------------|--------------------------------|
//! | `WADASH_API_URL`      | `server.api_url`               |
//! | `WADASH_API_KEY`      | `server.api_key`               |
//! | `WADASH_API_SECRET`   | `server.api_secret`            |
//! | `WADASH_REFRESH_SECS` | `dashboard.refresh_interval`   |
//!
//! `WADASH_DATA_DIR` moves the configuration file itself, see [`DataStorage`].
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use wadash::libs::config::Config;
//!
//! let config = Config::read()?.with_env();
//! let dashboard = config.dashboard();
//! println!("refreshing every {}s", dashboard.refresh_interval);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Password};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_API_URL: &str = "WADASH_API_URL";
pub const ENV_API_KEY: &str = "WADASH_API_KEY";
pub const ENV_API_SECRET: &str = "WADASH_API_SECRET";
pub const ENV_REFRESH_SECS: &str = "WADASH_REFRESH_SECS";

/// A configurable section offered by `wadash init`.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Connection settings for the attendance backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the host framework, e.g. `https://erp.example.com`.
    pub api_url: String,

    /// API key of the integration user.
    pub api_key: String,

    /// API secret paired with `api_key`.
    pub api_secret: String,
}

/// Refresh behaviour of the dashboard views.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    /// Seconds between automatic refreshes in `wadash watch`.
    pub refresh_interval: u64,

    /// Maximum attendance logs fetched per presence refresh.
    ///
    /// Only the newest log per staff member is shown, so the limit bounds how
    /// far back the dashboard can see people who have not clocked recently.
    pub log_limit: usize,

    /// Maximum daily working-hours records fetched per analytics refresh.
    pub analytics_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            refresh_interval: 30,
            log_limit: 50,
            analytics_limit: 100,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardConfig>,
}

impl Config {
    /// Reads the configuration file, returning the default when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().file(CONFIG_FILE_NAME);

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().writable_file(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Applies `WADASH_*` environment overrides.
    pub fn with_env(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// A server section is created from overrides alone only when the URL is
    /// provided; key and secret without a URL are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty());
        let key = lookup(ENV_API_KEY);
        let secret = lookup(ENV_API_SECRET);

        if self.server.is_none() && url.is_some() {
            self.server = Some(ServerConfig {
                api_url: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
            });
        }

        if let Some(server) = self.server.as_mut() {
            if let Some(url) = url {
                server.api_url = url;
            }
            if let Some(key) = key {
                server.api_key = key;
            }
            if let Some(secret) = secret {
                server.api_secret = secret;
            }
        }

        if let Some(secs) = lookup(ENV_REFRESH_SECS).and_then(|v| v.trim().parse::<u64>().ok()).filter(|secs| *secs > 0) {
            let mut dashboard = self.dashboard.take().unwrap_or_default();
            dashboard.refresh_interval = secs;
            self.dashboard = Some(dashboard);
        }

        self
    }

    /// Dashboard settings with defaults filled in.
    pub fn dashboard(&self) -> DashboardConfig {
        self.dashboard.clone().unwrap_or_default()
    }

    /// Runs the interactive setup for the selected sections.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "server".to_string(),
                name: "Server".to_string(),
            },
            ConfigModule {
                key: "dashboard".to_string(),
                name: "Dashboard".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "server" => {
                    let default = config.server.clone().unwrap_or(ServerConfig {
                        api_url: "".to_string(),
                        api_key: "".to_string(),
                        api_secret: "".to_string(),
                    });
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        api_url: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiUrl.to_string())
                            .default(default.api_url)
                            .interact_text()?,

                        api_key: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiKey.to_string())
                            .default(default.api_key)
                            .interact_text()?,

                        api_secret: Password::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptServerApiSecret.to_string())
                            .allow_empty_password(true)
                            .interact()
                            .map(|secret| if secret.is_empty() { default.api_secret.clone() } else { secret })?,
                    });
                }

                "dashboard" => {
                    let default = config.dashboard();
                    msg_print!(Message::ConfigModuleDashboard);
                    config.dashboard = Some(DashboardConfig {
                        refresh_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptRefreshInterval.to_string())
                            .default(default.refresh_interval)
                            .interact_text()?,

                        log_limit: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptLogLimit.to_string())
                            .default(default.log_limit)
                            .interact_text()?,

                        analytics_limit: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptAnalyticsLimit.to_string())
                            .default(default.analytics_limit)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
