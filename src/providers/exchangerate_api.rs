use crate::core::error::AppError;
use crate::core::rate::{Conversion, RateProvider};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const SUCCESS: &str = "success";

// ExchangeRateApiProvider implementation for RateProvider (exchangerate-api.com v6)
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("xrate/0.1")
            .timeout(timeout)
            .build()?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Fetches `endpoint` and decodes the body, mapping transport, status
    /// and decoding failures through `to_error`.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        to_error: fn(String) -> AppError,
    ) -> Result<T, AppError> {
        let url = format!("{}/v6/{}/{}", self.base_url, self.api_key, endpoint);
        debug!("Requesting {}", endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| to_error(format!("Request error: {} for {}", e.without_url(), endpoint)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| to_error(format!("Failed to read response for {endpoint}: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiStatus>(&text)
                .ok()
                .and_then(|s| s.error_type)
                .map(|t| format!(" ({t})"))
                .unwrap_or_default();
            return Err(to_error(format!("HTTP error: {status} for {endpoint}{detail}")));
        }

        serde_json::from_str(&text)
            .map_err(|e| to_error(format!("Failed to parse JSON response for {endpoint}: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rate: Option<f64>,
    conversion_result: Option<f64>,
}

fn api_failure(error_type: Option<String>) -> String {
    format!(
        "API reported failure: {}",
        error_type.as_deref().unwrap_or("unknown-error")
    )
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>, AppError> {
        let endpoint = format!("latest/{base}");
        let data: LatestResponse = self.get_json(&endpoint, AppError::RateFetch).await?;

        if data.result != SUCCESS {
            return Err(AppError::RateFetch(api_failure(data.error_type)));
        }

        debug!(count = data.conversion_rates.len(), "Received rate table");
        Ok(data.conversion_rates)
    }

    #[instrument(name = "PairConversion", skip(self), fields(from = %from, to = %to))]
    async fn convert_pair(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Conversion, AppError> {
        let endpoint = format!("pair/{from}/{to}/{amount}");
        let data: PairResponse = self.get_json(&endpoint, AppError::Conversion).await?;

        if data.result != SUCCESS {
            return Err(AppError::Conversion(api_failure(data.error_type)));
        }

        let (rate, result) = data
            .conversion_rate
            .zip(data.conversion_result)
            .ok_or_else(|| {
                AppError::Conversion(format!("No conversion data found for {from}/{to}"))
            })?;

        Ok(Conversion {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            amount,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-key";

    async fn create_mock_server(
        request_path: &str,
        status: u16,
        mock_response: &str,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider(mock_server: &MockServer) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(&mock_server.uri(), API_KEY, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_latest_rates() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": {
                "USD": 1,
                "EUR": 0.9123,
                "JOD": 0.709
            }
        }"#;
        let mock_server = create_mock_server("/v6/test-key/latest/USD", 200, mock_response).await;

        let rates = provider(&mock_server).latest_rates("USD").await.unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates["EUR"], 0.9123);
        assert_eq!(rates["USD"], 1.0);
    }

    #[tokio::test]
    async fn test_latest_rates_api_failure() {
        let mock_response = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let mock_server = create_mock_server("/v6/test-key/latest/ZZZ", 200, mock_response).await;

        let result = provider(&mock_server).latest_rates("ZZZ").await;
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::RateFetch(_)));
        assert_eq!(
            err.to_string(),
            "Failed to fetch rates: API reported failure: unsupported-code"
        );
    }

    #[tokio::test]
    async fn test_latest_rates_http_error() {
        let mock_response = r#"{"result": "error", "error-type": "invalid-key"}"#;
        let mock_server = create_mock_server("/v6/test-key/latest/USD", 403, mock_response).await;

        let err = provider(&mock_server).latest_rates("USD").await.unwrap_err();
        assert!(matches!(err, AppError::RateFetch(_)));
        assert_eq!(
            err.to_string(),
            "Failed to fetch rates: HTTP error: 403 Forbidden for latest/USD (invalid-key)"
        );
    }

    #[tokio::test]
    async fn test_latest_rates_server_error_without_body() {
        let mock_server = create_mock_server("/v6/test-key/latest/USD", 500, "").await;

        let err = provider(&mock_server).latest_rates("USD").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch rates: HTTP error: 500 Internal Server Error for latest/USD"
        );
    }

    #[tokio::test]
    async fn test_latest_rates_malformed_response() {
        let mock_server =
            create_mock_server("/v6/test-key/latest/USD", 200, r#"{"rates": []}"#).await;

        let err = provider(&mock_server).latest_rates("USD").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Failed to parse JSON response for latest/USD")
        );
    }

    #[tokio::test]
    async fn test_successful_pair_conversion() {
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "target_code": "EUR",
            "conversion_rate": 0.91,
            "conversion_result": 91.0
        }"#;
        let mock_server =
            create_mock_server("/v6/test-key/pair/USD/EUR/100", 200, mock_response).await;

        let conversion = provider(&mock_server)
            .convert_pair("USD", "EUR", 100.0)
            .await
            .unwrap();
        assert_eq!(
            conversion,
            Conversion {
                from: "USD".to_string(),
                to: "EUR".to_string(),
                rate: 0.91,
                amount: 100.0,
                result: 91.0,
            }
        );
    }

    #[tokio::test]
    async fn test_pair_conversion_api_failure() {
        let mock_response = r#"{"result": "error", "error-type": "malformed-request"}"#;
        let mock_server =
            create_mock_server("/v6/test-key/pair/USD/EUR/2.5", 200, mock_response).await;

        let err = provider(&mock_server)
            .convert_pair("USD", "EUR", 2.5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conversion(_)));
        assert_eq!(
            err.to_string(),
            "Conversion failed: API reported failure: malformed-request"
        );
    }

    #[tokio::test]
    async fn test_pair_conversion_http_error() {
        let mock_server = create_mock_server("/v6/test-key/pair/USD/EUR/100", 404, "").await;

        let err = provider(&mock_server)
            .convert_pair("USD", "EUR", 100.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conversion(_)));
        assert!(err.to_string().contains("HTTP error: 404 Not Found"));
    }

    #[tokio::test]
    async fn test_pair_conversion_missing_fields() {
        let mock_server = create_mock_server(
            "/v6/test-key/pair/USD/EUR/100",
            200,
            r#"{"result": "success"}"#,
        )
        .await;

        let err = provider(&mock_server)
            .convert_pair("USD", "EUR", 100.0)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Conversion failed: No conversion data found for USD/EUR"
        );
    }
}
