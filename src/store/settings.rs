use crate::core::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_CURRENCY: &str = "USD";
pub const DEFAULT_TARGET_CURRENCIES: [&str; 4] = ["USD", "JOD", "ILS", "USDT"];

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub target_currencies: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            target_currencies: DEFAULT_TARGET_CURRENCIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl Settings {
    /// Uppercases codes and drops repeated targets, keeping the first one.
    fn normalized(self) -> Self {
        let mut target_currencies: Vec<String> = Vec::with_capacity(self.target_currencies.len());
        for code in self.target_currencies {
            let code = code.trim().to_uppercase();
            if !target_currencies.contains(&code) {
                target_currencies.push(code);
            }
        }
        Self {
            base_currency: self.base_currency.trim().to_uppercase(),
            target_currencies,
        }
    }
}

/// Sole owner of the settings document. Every mutation rewrites the file.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Reads the settings document, creating it with defaults when absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!("No settings at {}, writing defaults", path.display());
            let store = Self {
                path,
                settings: Settings::default(),
            };
            store.save()?;
            return Ok(store);
        }

        let content = fs::read_to_string(&path).map_err(|e| AppError::persistence(&path, e))?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|e| AppError::persistence(&path, e))?;
        let settings = settings.normalized();

        if settings.base_currency.chars().count() < 3 {
            return Err(AppError::persistence(
                &path,
                format!("invalid base currency '{}'", settings.base_currency),
            ));
        }

        debug!(?settings, "Loaded settings");
        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn base_currency(&self) -> &str {
        &self.settings.base_currency
    }

    pub fn target_currencies(&self) -> &[String] {
        &self.settings.target_currencies
    }

    pub fn set_base_currency(&mut self, code: &str) -> Result<(), AppError> {
        let mut next = self.settings.clone();
        next.base_currency = code.to_uppercase();
        self.commit(next)
    }

    /// Returns `false` without touching the file when `code` is already
    /// tracked.
    pub fn add_currency(&mut self, code: &str) -> Result<bool, AppError> {
        let code = code.to_uppercase();
        if self.settings.target_currencies.contains(&code) {
            return Ok(false);
        }
        let mut next = self.settings.clone();
        next.target_currencies.push(code);
        self.commit(next)?;
        Ok(true)
    }

    pub fn remove_currency(&mut self, code: &str) -> Result<bool, AppError> {
        let code = code.to_uppercase();
        let Some(index) = self
            .settings
            .target_currencies
            .iter()
            .position(|c| *c == code)
        else {
            return Ok(false);
        };
        let mut next = self.settings.clone();
        next.target_currencies.remove(index);
        self.commit(next)?;
        Ok(true)
    }

    /// Persists `next` and only then makes it the in-memory state.
    fn commit(&mut self, next: Settings) -> Result<(), AppError> {
        Self::write(&self.path, &next)?;
        self.settings = next;
        Ok(())
    }

    fn save(&self) -> Result<(), AppError> {
        Self::write(&self.path, &self.settings)
    }

    /// Writes the whole document to a sibling temp file, then renames it over
    /// the target.
    fn write(path: &Path, settings: &Settings) -> Result<(), AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::persistence(path, e))?;
        }

        let content =
            serde_json::to_string_pretty(settings).map_err(|e| AppError::persistence(path, e))?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| AppError::persistence(path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| AppError::persistence(path, e))?;

        debug!("Saved settings to {}", path.display());
        Ok(())
    }
}
