//! WireMock-based thermostat API mocking infrastructure
//!
//! Simulates the cloud API on plain HTTP: data responses, 307 redirects to
//! another mock server, resets (404) and rate limits (429).

use serde_json::Value;
use thermostat_telemetry::client::Endpoint;
use thermostat_telemetry::config::ApiConfig;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "c.test-token";

/// Mock thermostat API server
pub struct MockThermostatApi {
    pub server: MockServer,
}

impl MockThermostatApi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Host/port of this server as the poller sees it
    pub fn endpoint(&self) -> Endpoint {
        let address = self.server.address();
        Endpoint::new(address.ip().to_string(), address.port())
    }

    /// `Location` value pointing at this server
    pub fn location(&self) -> String {
        format!("{}/", self.server.uri())
    }

    /// API config with this server as the default endpoint
    pub fn api_config(&self) -> ApiConfig {
        let endpoint = self.endpoint();
        ApiConfig {
            token: TEST_TOKEN.to_string(),
            default_host: endpoint.host,
            default_port: endpoint.port,
            scheme: "http".to_string(),
            ..ApiConfig::default()
        }
    }

    /// Answer authenticated requests with `payload`
    pub async fn mock_data(&self, payload: Value) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload))
            .mount(&self.server)
            .await;
    }

    /// Redirect every request to `location`
    pub async fn mock_redirect(&self, location: &str) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(307).insert_header("Location", location))
            .mount(&self.server)
            .await;
    }

    /// Answer the next `times` requests with `status` and an empty body
    pub async fn mock_status_times(&self, status: u16, times: u64) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Answer every request with `status` and a raw body
    pub async fn mock_raw(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received so far
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
