use crate::Transport;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use sdkwire_core::{EffectiveConfig, HttpMethod, SdkError, SdkHttpError};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Per-request timeout override, in milliseconds, read from the config extras
pub const TIMEOUT_MS_KEY: &str = "timeout_ms";

/// Default HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Value of the `User-Agent` header
    pub user_agent: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            user_agent: Some(concat!("sdkwire/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// reqwest-backed transport used when a module does not bring its own.
///
/// Body-bearing requests carry the params as a JSON array; GET and HEAD
/// requests go out without a body since the params already sit in the URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = HttpClient::builder().timeout(Duration::from_millis(config.timeout_ms));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http_client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Reuse an already configured reqwest client
    pub fn with_client(http_client: HttpClient) -> Self {
        Self {
            config: HttpTransportConfig::default(),
            http_client,
        }
    }

    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        url: String,
        params: Vec<Value>,
        config: EffectiveConfig,
    ) -> Result<Value, SdkError> {
        debug!("Sending {} request to {}", config.method, url);

        let mut request = self.http_client.request(to_reqwest_method(config.method), &url);
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(timeout_ms) = config.extra.get(TIMEOUT_MS_KEY).and_then(Value::as_u64) {
            request = request.timeout(Duration::from_millis(timeout_ms));
        }
        if config.method.has_body() {
            let body = serde_json::to_vec(&params)?;
            trace!("Request body: {}", String::from_utf8_lossy(&body));
            request = request.body(body);
        }

        let response = request.send().await.map_err(SdkError::transport)?;
        let status = response.status();
        let text = response.text().await.map_err(SdkError::transport)?;

        if !status.is_success() {
            warn!("HTTP error {} from {}", status, url);
            return Err(http_error(status, &text).into());
        }

        trace!("Response body: {}", text);
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

/// Build the error for a non-2xx response. The message comes from a JSON
/// `message` field, then the raw body, then the reason phrase.
fn http_error(status: StatusCode, body: &str) -> SdkHttpError {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let message = from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("HTTP error")
                .to_string()
        });

    SdkHttpError::new(status.as_u16(), message)
}
