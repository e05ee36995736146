use super::ui::{self, StyleType};
use crate::core::{ConversionRecord, RateQuote};
use crate::store::history::TIMESTAMP_FORMAT;
use chrono::{DateTime, Local};
use comfy_table::Cell;

pub fn rates_table(base: &str, quotes: &[RateQuote], last_update: Option<DateTime<Local>>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
    ]);
    for quote in quotes {
        table.add_row(vec![
            ui::code_cell(&quote.base),
            ui::code_cell(&quote.target),
            ui::rate_cell(quote.rate),
        ]);
    }

    let mut output = format!(
        "{}\n",
        ui::style_text(&format!("Exchange Rates (Base: {base})"), StyleType::Title)
    );
    output.push_str(&table.to_string());
    if let Some(updated) = last_update {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!("Last update: {}", updated.format(TIMESTAMP_FORMAT)),
                StyleType::Subtle
            )
        ));
    }
    output
}

pub fn conversion_line(record: &ConversionRecord) -> String {
    format!(
        "{} {} = {:.4} {} (Rate: {:.4})",
        record.amount, record.from, record.result, record.to, record.rate
    )
}

pub fn history_table(records: &[ConversionRecord]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date & Time"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Amount"),
        ui::header_cell("Result"),
        ui::header_cell("Rate"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.timestamp.format(TIMESTAMP_FORMAT)),
            ui::code_cell(&record.from),
            ui::code_cell(&record.to),
            ui::number_cell(record.amount),
            ui::number_cell(record.result),
            ui::number_cell(record.rate),
        ]);
    }
    format!(
        "{}\n{}",
        ui::style_text("Conversion History", StyleType::Title),
        table
    )
}

pub fn currencies_table<'a>(currencies: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency Name"),
        ui::header_cell("Currency Code"),
    ]);
    for (name, code) in currencies {
        table.add_row(vec![Cell::new(name), ui::code_cell(code)]);
    }
    format!(
        "{}\n{}",
        ui::style_text("Available Currencies", StyleType::Title),
        table
    )
}
