//! File-backed persistence: the settings document and the conversion log.

pub mod history;
pub mod settings;

pub use history::ConversionLog;
pub use settings::{Settings, SettingsStore};
