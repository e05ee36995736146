//! Static list of known currencies used to validate user input.

use crate::core::error::AppError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    currencies: BTreeMap<String, String>,
}

/// Currency display name to ISO code, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct CurrencyCatalog {
    currencies: BTreeMap<String, String>,
}

impl CurrencyCatalog {
    pub fn new(currencies: BTreeMap<String, String>) -> Self {
        Self { currencies }
    }

    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| AppError::catalog(path, e))?;
        let document: CatalogDocument =
            serde_json::from_str(&content).map_err(|e| AppError::catalog(path, e))?;
        debug!(
            count = document.currencies.len(),
            "Loaded currency catalog from {}",
            path.display()
        );
        Ok(Self::new(document.currencies))
    }

    /// Loads the catalog, degrading to an empty one on failure. Every code
    /// check against an empty catalog fails.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "Continuing with an empty currency catalog");
                Self::default()
            }
        }
    }

    /// Case-sensitive match against the catalog codes.
    pub fn is_valid_code(&self, code: &str) -> bool {
        self.currencies.values().any(|c| c == code)
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.currencies
            .iter()
            .map(|(name, code)| (name.as_str(), code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}
