use async_trait::async_trait;
use tracing::debug;

use super::config::GatewayConfig;
use super::error::{GatewayError, Result};
use super::wire::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

/// Sends one `generateContent` call to the remote model service
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// HTTPS transport for the Gemini REST API
///
/// No request timeout is set; the client's defaults apply.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ModelTransport for HttpTransport {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model);
        debug!(model = %model, "POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream(describe_failure(status.as_u16(), &body)));
        }

        // An undecodable envelope is a transport fault, not a model format error.
        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Failed to decode response envelope: {}", e)))
    }
}

fn describe_failure(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(api) => {
            let label = api.error.status.unwrap_or_else(|| "UNKNOWN".to_string());
            format!("Gemini API error ({} {}): {}", status, label, api.error.message)
        }
        Err(_) => format!("Gemini API error ({}): {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve_once;

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = GatewayConfig::new("key").with_base_url("http://localhost:8089/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.endpoint("gemini-2.5-flash"),
            "http://localhost:8089/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_failure_uses_api_error_message() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            describe_failure(429, body),
            "Gemini API error (429 RESOURCE_EXHAUSTED): Quota exceeded"
        );
        assert_eq!(
            describe_failure(502, "Bad Gateway\n"),
            "Gemini API error (502): Bad Gateway"
        );
    }

    fn transport_for(base_url: &str) -> HttpTransport {
        let config = GatewayConfig::new("test-key").with_base_url(base_url);
        HttpTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope_decodes_and_sends_key_header() {
        let (base_url, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "ok"}]}}]}"#,
        )
        .await;
        let transport = transport_for(&base_url);

        let response = transport
            .generate_content("gemini-2.5-flash", &GenerateContentRequest::from_prompt("hi"))
            .await
            .unwrap();

        assert_eq!(response.text().as_deref(), Some("ok"));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent "));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""contents""#));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_upstream_with_api_message() {
        let (base_url, _server) = serve_once(
            "429 Too Many Requests",
            "application/json",
            r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#,
        )
        .await;

        let err = transport_for(&base_url)
            .generate_content("gemini-2.5-flash", &GenerateContentRequest::from_prompt("hi"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::Upstream(
                "Gemini API error (429 RESOURCE_EXHAUSTED): Quota exceeded".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_undecodable_body_is_upstream() {
        let (base_url, _server) =
            serve_once("200 OK", "text/html", "<html>captive portal</html>").await;

        let err = transport_for(&base_url)
            .generate_content("gemini-2.5-flash", &GenerateContentRequest::from_prompt("hi"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "upstream");
    }
}
