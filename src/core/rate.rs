//! Exchange rate abstractions and core types

use crate::core::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rate of `target` expressed in units per one `base`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub base: String,
    pub target: String,
    pub rate: f64,
}

impl RateQuote {
    pub fn as_tuple(&self) -> (&str, &str, f64) {
        (&self.base, &self.target, self.rate)
    }
}

/// Outcome of a direct pair conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub amount: f64,
    pub result: f64,
}

/// A conversion as stored in the history log.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRecord {
    pub timestamp: NaiveDateTime,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
}

impl ConversionRecord {
    pub fn new(conversion: Conversion, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            from: conversion.from,
            to: conversion.to,
            amount: conversion.amount,
            result: conversion.result,
            rate: conversion.rate,
        }
    }
}

/// Amounts must be positive and finite before any conversion is attempted.
pub fn validate_amount(amount: f64) -> Result<f64, AppError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(AppError::Validation(format!(
            "Amount must be a positive number, got {amount}"
        )))
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Full table of latest rates relative to `base`.
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>, AppError>;

    async fn convert_pair(&self, from: &str, to: &str, amount: f64)
    -> Result<Conversion, AppError>;
}
