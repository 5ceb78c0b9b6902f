pub mod cli;
pub mod core;
pub mod providers;
pub mod service;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::error::RateError;
use crate::core::pagination::PageRequest;
use crate::providers::DefaultProviderFactory;
use crate::service::{ConversionRequest, HistoricalRequest, RateService};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Latest {
        base: String,
    },
    Convert {
        from: String,
        to: String,
        amount: Decimal,
    },
    Historical {
        base: String,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        /// Falls back to the configured default when absent.
        page_size: Option<usize>,
        page_number: usize,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>, json: bool) -> Result<()> {
    info!("fxr starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    run_with_config(command, &config, json).await
}

pub async fn run_with_config(command: AppCommand, config: &AppConfig, json: bool) -> Result<()> {
    let factory = DefaultProviderFactory::from_config(config)?;
    let service = RateService::new(Arc::new(factory));

    match command {
        AppCommand::Latest { base } => cli::latest::run(&service, &base, json).await,
        AppCommand::Convert { from, to, amount } => {
            let request = ConversionRequest { from, to, amount };
            cli::convert::run(&service, &request, json).await
        }
        AppCommand::Historical {
            base,
            start_date,
            end_date,
            page_size,
            page_number,
        } => {
            let page_size = page_size.unwrap_or(config.pagination.default_page_size);
            let request = HistoricalRequest {
                base,
                start_date,
                end_date,
                page: PageRequest::new(page_size, page_number)?,
            };
            cli::historical::run(&service, &request, json).await
        }
    }
}

/// The one line shown to the user for a failed command. The failure is
/// traced at debug only, so default logging never repeats it.
pub fn failure_message(error: &anyhow::Error) -> String {
    debug!(error = ?error, "Application failed");
    format!(
        "{} {error:#}",
        cli::ui::style_text("Error:", cli::ui::StyleType::Error)
    )
}

/// Process exit status for a failed command. Rejected requests and an
/// unavailable upstream get distinct codes so scripts can tell them apart.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<RateError>() {
        Some(e) if e.is_client_error() => 2,
        Some(_) => 3,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::UnavailableCause;

    #[test]
    fn test_exit_code_distinguishes_failures() {
        let client: anyhow::Error = RateError::InvalidCurrency {
            code: "TRY".to_string(),
        }
        .into();
        let upstream: anyhow::Error =
            RateError::unavailable(UnavailableCause::Status(500)).into();
        let other = anyhow::anyhow!("Failed to read config file");

        assert_eq!(exit_code(&client), 2);
        assert_eq!(exit_code(&upstream), 3);
        assert_eq!(exit_code(&other), 1);
    }

    #[test]
    fn test_failure_message_reports_error_once() {
        let error: anyhow::Error = RateError::InvalidCurrency {
            code: "XYZ".to_string(),
        }
        .into();

        let message = console::strip_ansi_codes(&failure_message(&error)).to_string();

        assert_eq!(message, "Error: Currency XYZ is not supported");
    }

    #[tokio::test]
    async fn test_invalid_page_rejected_before_any_fetch() {
        let mut config = AppConfig::default();
        // Unroutable, so a fetch would fail with a different error
        config.provider.base_url = "http://127.0.0.1:9".to_string();

        let result = run_with_config(
            AppCommand::Historical {
                base: "EUR".to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: None,
                page_size: Some(0),
                page_number: 1,
            },
            &config,
            false,
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RateError>(),
            Some(RateError::InvalidPage { .. })
        ));
        assert_eq!(exit_code(&err), 2);
    }
}
