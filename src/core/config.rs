use crate::core::error::AppError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExchangeRateProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchangerate: ExchangeRateProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub api_key_path: Option<String>,
    pub settings_path: Option<String>,
    pub catalog_path: Option<String>,
    pub history_path: Option<String>,
    pub data_path: Option<String>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("in", "xrate", "xrate").context("Could not determine project directories")
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when it does
    /// not exist yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.yaml"))
    }

    pub fn default_config_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().to_path_buf())
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn config_file_or_default(custom: &Option<String>, file_name: &str) -> Result<PathBuf> {
        match custom {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(Self::default_config_dir()?.join(file_name)),
        }
    }

    pub fn settings_path(&self) -> Result<PathBuf> {
        Self::config_file_or_default(&self.settings_path, "settings.json")
    }

    pub fn catalog_path(&self) -> Result<PathBuf> {
        Self::config_file_or_default(&self.catalog_path, "currencies.json")
    }

    pub fn api_key_path(&self) -> Result<PathBuf> {
        Self::config_file_or_default(&self.api_key_path, "api.txt")
    }

    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(self
                .default_data_path()?
                .join("history")
                .join("conversion_history.csv")),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.exchangerate.timeout_secs)
    }

    /// Reads the API key once. A missing, unreadable or blank key file is
    /// fatal.
    pub fn load_api_key(&self) -> Result<String> {
        let path = self.api_key_path()?;
        let key = fs::read_to_string(&path)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        if key.is_empty() {
            return Err(AppError::MissingCredential(path).into());
        }
        debug!("Loaded API key from {}", path.display());
        Ok(key)
    }
}
