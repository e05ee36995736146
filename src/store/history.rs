use crate::core::error::AppError;
use crate::core::rate::ConversionRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One CSV row. Numbers are kept as their 4-decimal text form.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    #[serde(rename = "DateTime")]
    date_time: String,
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To")]
    to: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Result")]
    result: String,
    #[serde(rename = "Rate")]
    rate: String,
}

impl From<&ConversionRecord> for HistoryRow {
    fn from(record: &ConversionRecord) -> Self {
        Self {
            date_time: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            from: record.from.clone(),
            to: record.to.clone(),
            amount: format!("{:.4}", record.amount),
            result: format!("{:.4}", record.result),
            rate: format!("{:.4}", record.rate),
        }
    }
}

impl HistoryRow {
    fn into_record(self) -> Result<ConversionRecord, String> {
        let number = |field: &str, value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid {field} '{value}': {e}"))
        };
        Ok(ConversionRecord {
            timestamp: NaiveDateTime::parse_from_str(self.date_time.trim(), TIMESTAMP_FORMAT)
                .map_err(|e| format!("invalid DateTime '{}': {e}", self.date_time))?,
            amount: number("Amount", &self.amount)?,
            result: number("Result", &self.result)?,
            rate: number("Rate", &self.rate)?,
            from: self.from,
            to: self.to,
        })
    }
}

/// Append-only CSV log of completed conversions.
#[derive(Debug, Clone)]
pub struct ConversionLog {
    path: PathBuf,
}

impl ConversionLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first when the log is new or
    /// empty.
    pub fn append(&self, record: &ConversionRecord) -> Result<(), AppError> {
        let path = &self.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::persistence(path, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::persistence(path, e))?;
        let needs_header = file
            .metadata()
            .map_err(|e| AppError::persistence(path, e))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer
            .serialize(HistoryRow::from(record))
            .map_err(|e| AppError::persistence(path, e))?;
        writer.flush().map_err(|e| AppError::persistence(path, e))?;

        debug!(header = needs_header, "Appended conversion to {}", path.display());
        Ok(())
    }

    /// All records in file order. A missing log is an empty history.
    pub fn read_all(&self) -> Result<Vec<ConversionRecord>, AppError> {
        let path = &self.path;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(path).map_err(|e| AppError::persistence(path, e))?;
        reader
            .deserialize::<HistoryRow>()
            .map(|row| {
                row.map_err(|e| AppError::persistence(path, e))?
                    .into_record()
                    .map_err(|e| AppError::persistence(path, e))
            })
            .collect()
    }
}
