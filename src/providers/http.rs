use crate::core::transport::{HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_USER_AGENT: &str = concat!("nbpx/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(name = "HttpGet", skip(self))]
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TransportError(format!("Request error: {e} URL: {url}")))?;

        let status = response.status().as_u16();
        debug!(status, "Received response");

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("Failed to read response body: {e}")))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exchangerates/rates/a/eur/"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/exchangerates/rates/a/eur/", mock_server.uri());
        let response = transport().get(&url).await.unwrap();

        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert_eq!(response.body, br#"{"ok":true}"#.to_vec());
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404 NotFound"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/exchangerates/rates/a/eur/2020-01-01", mock_server.uri());
        let response = transport().get(&url).await.unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_connection_failure() {
        // Nothing listens on the discard port.
        let result = transport().get("http://127.0.0.1:9/unreachable").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().starts_with("Request error"));
    }
}
