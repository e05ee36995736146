pub mod app;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::app::CurrencyApp;
use crate::core::CurrencyCatalog;
use crate::core::config::AppConfig;
use crate::providers::ExchangeRateApiProvider;
use crate::store::{ConversionLog, SettingsStore};
use anyhow::{Context, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Menu,
    Rates,
    Convert { from: String, to: String, amount: f64 },
    History,
    Currencies,
}

/// Loads config, credential, settings and catalog, then runs `command`.
/// A missing API key or an unreadable settings document stops here.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api_key = config.load_api_key()?;
    let settings = SettingsStore::load(config.settings_path()?)
        .context("Failed to load settings")?;
    let catalog = CurrencyCatalog::load_or_empty(config.catalog_path()?);
    let log = ConversionLog::new(config.history_path()?);

    let provider = ExchangeRateApiProvider::new(
        &config.providers.exchangerate.base_url,
        &api_key,
        config.request_timeout(),
    )?;
    let mut app = CurrencyApp::new(settings, catalog, provider, log);

    match command {
        AppCommand::Menu => {
            if app.catalog().is_empty() {
                println!(
                    "{}",
                    cli::ui::style_text(
                        "Error: currency catalog not found, every currency code will be rejected.",
                        cli::ui::StyleType::Error
                    )
                );
            }
            let stdin = std::io::stdin();
            cli::menu::run(&mut app, &mut stdin.lock()).await
        }
        AppCommand::Rates => Ok(cli::menu::show_rates(&mut app).await?),
        AppCommand::Convert { from, to, amount } => {
            Ok(cli::menu::convert(&mut app, &from, &to, amount).await?)
        }
        AppCommand::History => {
            cli::menu::show_history(&app);
            Ok(())
        }
        AppCommand::Currencies => {
            cli::menu::show_currencies(&app);
            Ok(())
        }
    }
}
