use anyhow::Result;
use clap::{Parser, Subcommand};
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Menu => xrate::AppCommand::Menu,
            Commands::Rates => xrate::AppCommand::Rates,
            Commands::Convert { from, to, amount } => xrate::AppCommand::Convert {
                from,
                to,
                amount,
            },
            Commands::History => xrate::AppCommand::History,
            Commands::Currencies => xrate::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration and currency catalog
    Setup,
    /// Interactive menu (default)
    Menu,
    /// Display exchange rates for the tracked currencies
    Rates,
    /// Convert an amount and record it in the history
    Convert {
        /// Source currency code
        from: String,
        /// Target currency code
        to: String,
        /// Amount to convert
        amount: f64,
    },
    /// Display conversion history
    History,
    /// List all available currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrate::cli::setup::setup(),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => xrate::run_command(xrate::AppCommand::Menu, cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
