use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fxr::cli::setup::{setup, setup_at_path};
use fxr::core::log::init_logging;
use rust_decimal::Decimal;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the latest rates for a base currency
    Latest {
        #[arg(short, long, default_value = "EUR")]
        base: String,
    },
    /// Convert an amount between two currencies
    Convert {
        #[arg(short, long)]
        from: String,
        #[arg(short, long)]
        to: String,
        #[arg(short, long, default_value = "1")]
        amount: Decimal,
    },
    /// Show paged historical rates from a start date
    Historical {
        #[arg(short, long, default_value = "EUR")]
        base: String,
        /// First date, YYYY-MM-DD
        #[arg(short, long)]
        start: NaiveDate,
        /// Last date, YYYY-MM-DD. Open-ended when omitted
        #[arg(short, long)]
        end: Option<NaiveDate>,
        /// Dates per page (1-100)
        #[arg(long)]
        page_size: Option<usize>,
        /// One-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

impl From<Commands> for fxr::AppCommand {
    fn from(cmd: Commands) -> fxr::AppCommand {
        match cmd {
            Commands::Latest { base } => fxr::AppCommand::Latest { base },
            Commands::Convert { from, to, amount } => fxr::AppCommand::Convert { from, to, amount },
            Commands::Historical {
                base,
                start,
                end,
                page_size,
                page,
            } => fxr::AppCommand::Historical {
                base,
                start_date: start,
                end_date: end,
                page_size,
                page_number: page,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let result: Result<()> = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => setup_at_path(path),
            None => setup(),
        },
        Some(cmd) => fxr::run_command(cmd.into(), cli.config_path.as_deref(), cli.json).await,
        None => Cli::command().print_help().map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", fxr::failure_message(&e));
            ExitCode::from(fxr::exit_code(&e))
        }
    }
}
