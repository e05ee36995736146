use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "integration-key";

mod test_utils {
    use super::*;

    pub async fn create_mock_server(request_path: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Writes config, API key, settings and catalog into `dir` and returns
    /// the config path.
    pub fn write_environment(dir: &Path, base_url: &str, with_key: bool) -> String {
        let key_path = dir.join("api.txt");
        if with_key {
            fs::write(&key_path, format!("{API_KEY}\n")).unwrap();
        }
        fs::write(
            dir.join("settings.json"),
            r#"{"base_currency": "USD", "target_currencies": ["EUR", "ZZZ"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("currencies.json"),
            r#"{"currencies": {"Euro": "EUR", "United States Dollar": "USD"}}"#,
        )
        .unwrap();

        let config_path = dir.join("config.yaml");
        let config_content = format!(
            r#"
providers:
  exchangerate:
    base_url: "{base_url}"
    timeout_secs: 5
api_key_path: "{}"
settings_path: "{}"
catalog_path: "{}"
history_path: "{}"
"#,
            key_path.display(),
            dir.join("settings.json").display(),
            dir.join("currencies.json").display(),
            dir.join("history").join("conversion_history.csv").display(),
        );
        fs::write(&config_path, config_content).unwrap();
        config_path.to_string_lossy().into_owned()
    }
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_response = r#"{
        "result": "success",
        "base_code": "USD",
        "conversion_rates": {"USD": 1, "EUR": 0.9123}
    }"#;
    let mock_server =
        test_utils::create_mock_server(&format!("/v6/{API_KEY}/latest/USD"), mock_response).await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = test_utils::write_environment(temp_dir.path(), &mock_server.uri(), true);

    let result = xrate::run_command(xrate::AppCommand::Rates, Some(&config_path)).await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), format!("/v6/{API_KEY}/latest/USD"));

    // ZZZ is absent upstream; it is dropped from the table, not from settings
    let settings = fs::read_to_string(temp_dir.path().join("settings.json")).unwrap();
    assert!(settings.contains("ZZZ"));
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_writes_history() {
    let mock_response = r#"{
        "result": "success",
        "base_code": "USD",
        "target_code": "EUR",
        "conversion_rate": 0.91,
        "conversion_result": 91.0
    }"#;
    let mock_server =
        test_utils::create_mock_server(&format!("/v6/{API_KEY}/pair/USD/EUR/100"), mock_response)
            .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = test_utils::write_environment(temp_dir.path(), &mock_server.uri(), true);

    let command = xrate::AppCommand::Convert {
        from: "usd".to_string(),
        to: "eur".to_string(),
        amount: 100.0,
    };
    let result = xrate::run_command(command, Some(&config_path)).await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let history =
        fs::read_to_string(temp_dir.path().join("history").join("conversion_history.csv"))
            .unwrap();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "DateTime,From,To,Amount,Result,Rate");
    assert!(lines[1].ends_with(",USD,EUR,100.0000,91.0000,0.9100"));
}

#[test_log::test(tokio::test)]
async fn test_api_failure_is_reported_and_not_logged() {
    let mock_response = r#"{"result": "error", "error-type": "invalid-key"}"#;
    let mock_server =
        test_utils::create_mock_server(&format!("/v6/{API_KEY}/pair/USD/EUR/5"), mock_response)
            .await;

    let temp_dir = TempDir::new().unwrap();
    let config_path = test_utils::write_environment(temp_dir.path(), &mock_server.uri(), true);

    let command = xrate::AppCommand::Convert {
        from: "USD".to_string(),
        to: "EUR".to_string(),
        amount: 5.0,
    };
    let err = xrate::run_command(command, Some(&config_path))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("invalid-key"));
    assert!(
        !temp_dir
            .path()
            .join("history")
            .join("conversion_history.csv")
            .exists()
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_api_key_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = test_utils::write_environment(temp_dir.path(), "http://127.0.0.1:9", false);

    let err = xrate::run_command(xrate::AppCommand::History, Some(&config_path))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("API key not found"));
}

#[test_log::test(tokio::test)]
async fn test_malformed_settings_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = test_utils::write_environment(temp_dir.path(), "http://127.0.0.1:9", true);
    fs::write(temp_dir.path().join("settings.json"), "{ broken").unwrap();

    let err = xrate::run_command(xrate::AppCommand::Currencies, Some(&config_path))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to load settings"));
}

#[test_log::test(tokio::test)]
async fn test_missing_catalog_is_tolerated() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = test_utils::write_environment(temp_dir.path(), "http://127.0.0.1:9", true);
    fs::remove_file(temp_dir.path().join("currencies.json")).unwrap();

    let result = xrate::run_command(xrate::AppCommand::Currencies, Some(&config_path)).await;
    assert!(result.is_ok());

    let command = xrate::AppCommand::Convert {
        from: "USD".to_string(),
        to: "EUR".to_string(),
        amount: 1.0,
    };
    let err = xrate::run_command(command, Some(&config_path))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not in available currencies list"));
}
