//! Core business logic abstractions

pub mod catalog;
pub mod config;
pub mod error;
pub mod log;
pub mod rate;
pub mod service;

// Re-export main types for cleaner imports
pub use catalog::CurrencyCatalog;
pub use error::AppError;
pub use rate::{Conversion, ConversionRecord, RateProvider, RateQuote};
pub use service::RateService;
