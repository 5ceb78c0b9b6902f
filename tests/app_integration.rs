use chrono::{Days, NaiveDate};
use fxr::core::circuit_breaker::CircuitState;
use fxr::core::config::AppConfig;
use fxr::core::error::{RateError, UnavailableCause};
use fxr::core::pagination::PageRequest;
use fxr::providers::DefaultProviderFactory;
use fxr::service::{ConversionRequest, HistoricalRequest, RateService};
use rust_decimal_macros::dec;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tracing::info;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod test_utils {
    use super::*;

    pub fn config_for(server: &MockServer) -> AppConfig {
        let mut config = AppConfig::default();
        config.provider.base_url = server.uri();
        config.resilience.retry_delay_ms = 10;
        config
    }

    pub fn service_for(config: &AppConfig) -> (RateService, Arc<DefaultProviderFactory>) {
        let factory = Arc::new(DefaultProviderFactory::from_config(config).unwrap());
        (RateService::new(factory.clone()), factory)
    }

    /// `days` consecutive dates from 2024-01-01, each quoting a denied
    /// currency alongside two supported ones.
    pub fn historical_body(days: u64) -> serde_json::Value {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rates: serde_json::Map<String, serde_json::Value> = (0..days)
            .map(|offset| {
                let date = start + Days::new(offset);
                (
                    date.to_string(),
                    json!({"USD": 1.1, "GBP": 0.86, "TRY": 32.5}),
                )
            })
            .collect();
        json!({
            "amount": 1.0,
            "base": "EUR",
            "start_date": start.to_string(),
            "end_date": (start + Days::new(days - 1)).to_string(),
            "rates": rates,
        })
    }
}

#[test_log::test(tokio::test)]
async fn test_latest_strips_denied_and_caches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount": 1.0,
            "base": "EUR",
            "date": "2024-03-15",
            "rates": {"USD": 1.0890, "PLN": 4.30, "MXN": 18.4, "GBP": 0.8556}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _) = test_utils::service_for(&test_utils::config_for(&server));

    let first = service.get_latest("eur").await.unwrap();
    let second = service.get_latest("EUR").await.unwrap();

    info!(?first, "Latest snapshot");
    assert_eq!(first.base.as_str(), "EUR");
    assert_eq!(
        first.rates.keys().cloned().collect::<Vec<_>>(),
        vec!["GBP", "USD"]
    );
    assert_eq!(first, second);
}

#[test_log::test(tokio::test)]
async fn test_conversion_goes_upstream_every_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "EUR"))
        .and(query_param("to", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount": 100.0,
            "base": "EUR",
            "date": "2024-03-15",
            "rates": {"USD": 108.92}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let (service, _) = test_utils::service_for(&test_utils::config_for(&server));
    let request = ConversionRequest {
        from: "EUR".to_string(),
        to: "USD".to_string(),
        amount: dec!(100),
    };

    for _ in 0..2 {
        let result = service.convert(&request).await.unwrap();
        assert_eq!(result.rates.get("USD"), Some(&dec!(108.92)));
    }
}

#[test_log::test(tokio::test)]
async fn test_denied_currency_rejected_without_upstream_call() {
    let server = MockServer::start().await;
    let (service, _) = test_utils::service_for(&test_utils::config_for(&server));

    let latest = service.get_latest("TRY").await;
    let convert = service
        .convert(&ConversionRequest {
            from: "EUR".to_string(),
            to: "thb".to_string(),
            amount: dec!(10),
        })
        .await;

    assert!(matches!(latest, Err(RateError::InvalidCurrency { .. })));
    assert!(matches!(convert, Err(RateError::InvalidCurrency { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_leaves_circuit_closed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let (service, factory) = test_utils::service_for(&test_utils::config_for(&server));

    for _ in 0..2 {
        let result = service.get_latest("XYZ").await;
        assert!(matches!(result, Err(RateError::InvalidCurrency { .. })));
    }

    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(factory.policy().circuit_state(), CircuitState::Closed);
    assert_eq!(factory.policy().consecutive_failures(), 0);
}

#[test_log::test(tokio::test)]
async fn test_historical_pages_over_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024-01-01.."))
        .and(query_param("from", "EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_utils::historical_body(25)))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _) = test_utils::service_for(&test_utils::config_for(&server));
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let request = |page_number| HistoricalRequest {
        base: "EUR".to_string(),
        start_date: start,
        end_date: None,
        page: PageRequest::new(10, page_number).unwrap(),
    };

    let second = service.get_historical(&request(2)).await.unwrap();
    assert_eq!(second.rates.total_count, 25);
    assert_eq!(second.rates.total_pages, 3);
    assert_eq!(second.rates.current_page, 2);
    let dates: Vec<_> = second.rates.items.iter().map(|(date, _)| *date).collect();
    assert_eq!(dates.first(), Some(&(start + Days::new(10))));
    assert_eq!(dates.last(), Some(&(start + Days::new(19))));
    for (_, rates) in &second.rates.items {
        assert!(!rates.contains_key("TRY"));
        assert_eq!(rates.len(), 2);
    }

    // Served from cache, so the mock still sees a single request
    let fourth = service.get_historical(&request(4)).await.unwrap();
    assert!(fourth.rates.items.is_empty());
    assert_eq!(fourth.rates.total_pages, 3);
    assert_eq!(fourth.rates.total_count, 25);
}

#[test_log::test(tokio::test)]
async fn test_circuit_opens_after_repeated_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (service, factory) = test_utils::service_for(&test_utils::config_for(&server));

    let first = service.get_latest("EUR").await;
    assert_eq!(
        first,
        Err(RateError::unavailable(UnavailableCause::Status(500)))
    );
    // The fifth failed attempt trips the breaker, so the third retry never runs
    let second = service.get_latest("USD").await;
    assert_eq!(
        second,
        Err(RateError::unavailable(UnavailableCause::CircuitOpen))
    );
    assert_eq!(factory.policy().circuit_state(), CircuitState::Open);
    assert_eq!(server.received_requests().await.unwrap().len(), 5);

    let rejected = service.get_latest("GBP").await;
    assert_eq!(
        rejected,
        Err(RateError::unavailable(UnavailableCause::CircuitOpen))
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[test_log::test(tokio::test)]
async fn test_run_command_with_config_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("from", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "amount": 1.0,
            "base": "USD",
            "date": "2024-03-15",
            "rates": {"EUR": 0.918}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(
        &config_path,
        format!(
            "provider:\n  base_url: \"{}\"\nresilience:\n  retry_delay_ms: 10\n",
            server.uri()
        ),
    )
    .unwrap();

    let result = fxr::run_command(
        fxr::AppCommand::Latest {
            base: "usd".to_string(),
        },
        config_path.to_str(),
        true,
    )
    .await;

    assert!(result.is_ok(), "run_command failed: {result:?}");
}

#[test_log::test(tokio::test)]
async fn test_run_command_reports_client_error_exit_code() {
    let server = MockServer::start().await;
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(
        &config_path,
        format!("provider:\n  base_url: \"{}\"\n", server.uri()),
    )
    .unwrap();

    let result = fxr::run_command(
        fxr::AppCommand::Convert {
            from: "EUR".to_string(),
            to: "USD".to_string(),
            amount: dec!(0.001),
        },
        config_path.to_str(),
        false,
    )
    .await;

    let err = result.unwrap_err();
    assert_eq!(fxr::exit_code(&err), 2);
    assert!(server.received_requests().await.unwrap().is_empty());
}
