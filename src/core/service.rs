use crate::core::error::AppError;
use crate::core::rate::{Conversion, RateProvider, RateQuote, validate_amount};
use chrono::{DateTime, Local};
use tracing::debug;

/// Tracks the base currency and last refresh time on top of a
/// [`RateProvider`].
pub struct RateService<P: RateProvider> {
    provider: P,
    base_currency: String,
    last_update: Option<DateTime<Local>>,
}

impl<P: RateProvider> RateService<P> {
    pub fn new(provider: P, base_currency: &str) -> Self {
        Self {
            provider,
            base_currency: base_currency.to_string(),
            last_update: None,
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// In-memory only. Persisting the base currency is the settings store's
    /// job.
    pub fn set_base_currency(&mut self, code: &str) {
        self.base_currency = code.to_string();
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    /// Quotes for `targets` in the order given. Targets the upstream table
    /// does not know are dropped.
    pub async fn fetch_rates(&mut self, targets: &[String]) -> Result<Vec<RateQuote>, AppError> {
        let table = self.provider.latest_rates(&self.base_currency).await?;
        self.last_update = Some(Local::now());

        let quotes: Vec<RateQuote> = targets
            .iter()
            .filter_map(|target| {
                table.get(target).map(|rate| RateQuote {
                    base: self.base_currency.clone(),
                    target: target.clone(),
                    rate: *rate,
                })
            })
            .collect();

        if quotes.len() < targets.len() {
            debug!(
                requested = targets.len(),
                returned = quotes.len(),
                "Some target currencies are missing upstream"
            );
        }
        Ok(quotes)
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> Result<Conversion, AppError> {
        let amount = validate_amount(amount)?;
        self.provider.convert_pair(from, to, amount).await
    }
}
