//! Interactive numbered menu driving the application controller.

use super::ui::{self, StyleType};
use super::views;
use crate::app::CurrencyApp;
use crate::core::{AppError, RateProvider};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowRates,
    AddCurrency,
    RemoveCurrency,
    ChangeBase,
    Convert,
    History,
    AllCurrencies,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MenuChoice::ShowRates),
            "2" => Ok(MenuChoice::AddCurrency),
            "3" => Ok(MenuChoice::RemoveCurrency),
            "4" => Ok(MenuChoice::ChangeBase),
            "5" => Ok(MenuChoice::Convert),
            "6" => Ok(MenuChoice::History),
            "7" => Ok(MenuChoice::AllCurrencies),
            "8" => Ok(MenuChoice::Quit),
            _ => Err(anyhow::anyhow!("Invalid menu choice: {}", s.trim())),
        }
    }
}

const MENU_ITEMS: [&str; 8] = [
    "Show Exchange Rates",
    "Add Currency",
    "Remove Currency",
    "Change Base Currency",
    "Convert Currency",
    "Show Conversion History",
    "Show All Available Currencies",
    "Quit",
];

fn print_menu() {
    println!("\n{}", ui::style_text("--- Currency App ---", StyleType::Title));
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }
}

/// Prints `label` and reads one line. `None` means the input is exhausted.
/// Bytes that are not UTF-8 are replaced, so the line is rejected by the
/// caller's parsing instead of failing the read.
fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<Option<String>> {
    print!("{}: ", ui::style_text(label, StyleType::Prompt));
    std::io::stdout().flush()?;

    let mut line = Vec::new();
    if input.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
}

/// Re-prompts until a choice in 1..=8 is entered.
pub fn read_choice<R: BufRead>(input: &mut R) -> Result<Option<MenuChoice>> {
    loop {
        let Some(line) = prompt(input, "Choose an option [1-8]")? else {
            return Ok(None);
        };
        match line.parse::<MenuChoice>() {
            Ok(choice) => return Ok(Some(choice)),
            Err(e) => {
                debug!(error = %e, "Rejected menu input");
                println!(
                    "{}",
                    ui::style_text("Please select one of the available options", StyleType::Error)
                );
            }
        }
    }
}

/// Re-prompts until a number is entered. Sign and range are checked by the
/// controller.
fn read_amount<R: BufRead>(input: &mut R) -> Result<Option<f64>> {
    loop {
        let Some(line) = prompt(input, "Amount to convert")? else {
            return Ok(None);
        };
        match line.parse::<f64>() {
            Ok(amount) => return Ok(Some(amount)),
            Err(_) => println!(
                "{}",
                ui::style_text("Please enter a valid number", StyleType::Error)
            ),
        }
    }
}

fn print_error(e: &anyhow::Error) {
    println!("{}", ui::style_text(&format!("Error: {e}"), StyleType::Error));
}

/// Runs the menu until the user quits or the input ends. Action failures are
/// printed and never end the loop.
pub async fn run<P: RateProvider, R: BufRead>(app: &mut CurrencyApp<P>, input: &mut R) -> Result<()> {
    loop {
        print_menu();
        let Some(choice) = read_choice(input)? else {
            break;
        };
        if choice == MenuChoice::Quit {
            println!("{}", ui::style_text("Goodbye!", StyleType::Success));
            break;
        }
        if let Err(e) = handle(app, input, choice).await {
            print_error(&e);
        }
    }
    Ok(())
}

async fn handle<P: RateProvider, R: BufRead>(
    app: &mut CurrencyApp<P>,
    input: &mut R,
    choice: MenuChoice,
) -> Result<()> {
    match choice {
        MenuChoice::ShowRates => show_rates(app).await?,
        MenuChoice::AddCurrency => {
            let Some(code) = prompt(input, "Enter currency code to add (e.g., EUR)")? else {
                return Ok(());
            };
            if app.add_currency(&code)? {
                println!(
                    "{}",
                    ui::style_text(&format!("{} added.", code.to_uppercase()), StyleType::Success)
                );
            } else {
                println!(
                    "{}",
                    ui::style_text(
                        &format!("{} already exists.", code.to_uppercase()),
                        StyleType::Error
                    )
                );
            }
        }
        MenuChoice::RemoveCurrency => {
            println!(
                "Current currencies: {}",
                app.settings().target_currencies().join(", ")
            );
            let Some(code) = prompt(input, "Enter currency code to remove")? else {
                return Ok(());
            };
            let code = code.to_uppercase();
            if app.remove_currency(&code)? {
                println!("{}", ui::style_text(&format!("{code} removed."), StyleType::Success));
            } else {
                println!("{}", ui::style_text(&format!("{code} not found."), StyleType::Error));
            }
        }
        MenuChoice::ChangeBase => {
            let Some(code) = prompt(input, "Enter new base currency code")? else {
                return Ok(());
            };
            let code = app.change_base_currency(&code)?;
            println!(
                "{}",
                ui::style_text(&format!("Base currency changed to {code}"), StyleType::Success)
            );
        }
        MenuChoice::Convert => {
            let Some(from) = prompt(input, "From Currency (e.g., USD)")? else {
                return Ok(());
            };
            let from = app.validate_code(&from)?;
            let Some(to) = prompt(input, "To Currency (e.g., EUR)")? else {
                return Ok(());
            };
            let to = app.validate_code(&to)?;
            let Some(amount) = read_amount(input)? else {
                return Ok(());
            };
            convert(app, &from, &to, amount).await?;
        }
        MenuChoice::History => show_history(app),
        MenuChoice::AllCurrencies => show_currencies(app),
        MenuChoice::Quit => {}
    }
    Ok(())
}

pub async fn show_rates<P: RateProvider>(app: &mut CurrencyApp<P>) -> Result<(), AppError> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let result = app.rates().await;
    spinner.finish_and_clear();

    let quotes = result?;
    println!(
        "{}",
        views::rates_table(app.base_currency(), &quotes, app.last_update())
    );
    Ok(())
}

pub async fn convert<P: RateProvider>(
    app: &mut CurrencyApp<P>,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<(), AppError> {
    let spinner = ui::new_spinner("Converting...");
    let result = app.convert(from, to, amount).await;
    spinner.finish_and_clear();

    let record = result?;
    println!("\n{}", ui::style_text("Conversion Result:", StyleType::Title));
    println!(
        "{}",
        ui::style_text(&views::conversion_line(&record), StyleType::Success)
    );
    Ok(())
}

/// An unreadable log is shown as an empty history.
pub fn show_history<P: RateProvider>(app: &CurrencyApp<P>) {
    let records = match app.history() {
        Ok(records) => records,
        Err(e) => {
            println!("{}", ui::style_text(&format!("Warning: {e}"), StyleType::Warning));
            Vec::new()
        }
    };

    if records.is_empty() {
        println!(
            "{}",
            ui::style_text("No conversion history found.", StyleType::Warning)
        );
        return;
    }
    println!("{}", views::history_table(&records));
}

pub fn show_currencies<P: RateProvider>(app: &CurrencyApp<P>) {
    if app.catalog().is_empty() {
        println!("{}", ui::style_text("No currencies loaded.", StyleType::Error));
        return;
    }
    println!("{}", views::currencies_table(app.currencies()));
}
