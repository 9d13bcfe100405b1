//! Test doubles shared by the unit tests of this crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::gateway::{
    GatewayConfig, GatewayError, GeminiGateway, ModelTransport,
    wire::{GenerateContentRequest, GenerateContentResponse},
};

/// Transport that always answers with the same canned reply and records every call
pub struct StubTransport {
    reply: Result<GenerateContentResponse, GatewayError>,
    calls: Mutex<Vec<(String, GenerateContentRequest)>>,
}

impl StubTransport {
    /// Reply with one candidate whose text is `text`
    pub fn text(text: &str) -> Arc<Self> {
        Self::envelope(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        }))
    }

    /// Reply with a raw `generateContent` envelope
    pub fn envelope(value: Value) -> Arc<Self> {
        let response = serde_json::from_value(value).expect("valid response envelope");
        Arc::new(Self {
            reply: Ok(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: GatewayError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, GenerateContentRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> (String, GenerateContentRequest) {
        self.calls().pop().expect("transport was called")
    }
}

#[async_trait]
impl ModelTransport for StubTransport {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));
        self.reply.clone()
    }
}

pub fn gateway_with(transport: Arc<StubTransport>) -> GeminiGateway {
    GeminiGateway::with_transport(GatewayConfig::new("test-key"), transport)
}

pub const MIGRAINE_PAYLOAD: &str = r#"{
    "analysis": [{
        "condition": "Migraine",
        "probability": "High",
        "description": "Throbbing headache with photophobia and nausea.",
        "urgency": "High",
        "advice": "Rest in a dark, quiet room; seek care if symptoms escalate."
    }],
    "disclaimer": "This is not a medical diagnosis. Consult a healthcare professional."
}"#;

pub const RISK_PAYLOAD: &str = r#"{
    "riskScore": 72,
    "riskLevel": "High",
    "summary": "Smoking and inactivity raise cardiovascular risk.",
    "recommendations": ["Quit smoking", "Add 150 minutes of weekly exercise"]
}"#;

/// Answer exactly one HTTP request on a local port with a canned response.
///
/// Returns the base URL to point the transport at and a handle yielding the
/// raw request that was received.
pub async fn serve_once(
    status: &str,
    content_type: &str,
    body: &str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
            if request_complete(&received) {
                break;
            }
        }
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&received).into_owned()
    });

    (format!("http://{}", addr), handle)
}

/// Headers finished and the declared body fully read
fn request_complete(received: &[u8]) -> bool {
    let Some(head_end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&received[..head_end]).to_ascii_lowercase();
    let length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    received.len() >= head_end + 4 + length
}
