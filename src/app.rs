//! Application controller: validates input against the catalog and wires the
//! settings store, rate service and conversion log together.

use crate::core::rate::validate_amount;
use crate::core::{AppError, ConversionRecord, CurrencyCatalog, RateProvider, RateQuote, RateService};
use crate::store::{ConversionLog, SettingsStore};
use chrono::{DateTime, Local, Timelike};
use tracing::{debug, info};

pub struct CurrencyApp<P: RateProvider> {
    settings: SettingsStore,
    catalog: CurrencyCatalog,
    rates: RateService<P>,
    log: ConversionLog,
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl<P: RateProvider> CurrencyApp<P> {
    pub fn new(
        settings: SettingsStore,
        catalog: CurrencyCatalog,
        provider: P,
        log: ConversionLog,
    ) -> Self {
        let rates = RateService::new(provider, settings.base_currency());
        Self {
            settings,
            catalog,
            rates,
            log,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    pub fn base_currency(&self) -> &str {
        self.rates.base_currency()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.rates.last_update()
    }

    /// Uppercases `code` and checks it against the catalog.
    pub fn validate_code(&self, code: &str) -> Result<String, AppError> {
        let code = normalize_code(code);
        if self.catalog.is_valid_code(&code) {
            Ok(code)
        } else {
            Err(AppError::Validation(format!(
                "Currency code '{code}' is not in available currencies list."
            )))
        }
    }

    pub async fn rates(&mut self) -> Result<Vec<RateQuote>, AppError> {
        let targets = self.settings.target_currencies().to_vec();
        self.rates.fetch_rates(&targets).await
    }

    pub fn add_currency(&mut self, code: &str) -> Result<bool, AppError> {
        let code = self.validate_code(code)?;
        let added = self.settings.add_currency(&code)?;
        debug!(%code, added, "Add currency");
        Ok(added)
    }

    /// Tracked codes can be removed even when the catalog does not know them.
    pub fn remove_currency(&mut self, code: &str) -> Result<bool, AppError> {
        let code = normalize_code(code);
        let removed = self.settings.remove_currency(&code)?;
        debug!(%code, removed, "Remove currency");
        Ok(removed)
    }

    /// Persists the new base and switches the rate service to it.
    pub fn change_base_currency(&mut self, code: &str) -> Result<String, AppError> {
        let code = self.validate_code(code)?;
        self.settings.set_base_currency(&code)?;
        self.rates.set_base_currency(&code);
        info!(%code, "Base currency changed");
        Ok(code)
    }

    /// Converts and logs. Nothing is logged when any step before the write
    /// fails.
    pub async fn convert(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ConversionRecord, AppError> {
        let from = self.validate_code(from)?;
        let to = self.validate_code(to)?;
        let amount = validate_amount(amount)?;

        let conversion = self.rates.convert(&from, &to, amount).await?;
        let now = Local::now().naive_local();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        let record = ConversionRecord::new(conversion, timestamp);
        self.log.append(&record)?;
        Ok(record)
    }

    pub fn history(&self) -> Result<Vec<ConversionRecord>, AppError> {
        self.log.read_all()
    }

    pub fn currencies(&self) -> impl Iterator<Item = (&str, &str)> + Clone + '_ {
        self.catalog.list()
    }
}
