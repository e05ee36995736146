//! Error taxonomy shared by the stores, the rate service and the controller.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Settings or history file could not be read, parsed or written.
    #[error("Persistence error for {}: {message}", .path.display())]
    Persistence { path: PathBuf, message: String },

    /// Currency catalog missing or malformed. Callers usually degrade to an
    /// empty catalog.
    #[error("Failed to load currency catalog from {}: {message}", .path.display())]
    CatalogLoad { path: PathBuf, message: String },

    /// User input rejected before reaching a store or the network.
    #[error("{0}")]
    Validation(String),

    #[error("Failed to fetch rates: {0}")]
    RateFetch(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("API key not found at {}", .0.display())]
    MissingCredential(PathBuf),
}

impl AppError {
    pub fn persistence(path: &Path, message: impl ToString) -> Self {
        AppError::Persistence {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn catalog(path: &Path, message: impl ToString) -> Self {
        AppError::CatalogLoad {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}
