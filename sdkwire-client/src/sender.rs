// Request sender
// Turns a method name plus params into one transport call:
// - merges default, per-method and per-call config
// - builds the URL for the current execution context
// - moves params into the query for body-less methods
// - hands transport failures to the error handler, or returns them as-is

use crate::handler::ErrorContext;
use crate::options::ModuleOptions;
use anyhow::Result;
use sdkwire_core::{build_url, merge, shape_request, EffectiveConfig, RequestConfig, SdkError, ShapedRequest};
use sdkwire_transport::SharedTransport;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Stateless request pipeline shared by every method of a module.
///
/// Cloning is cheap; all clones read the same options and transport.
#[derive(Clone)]
pub struct RequestSender {
    options: Arc<ModuleOptions>,
    transport: SharedTransport,
}

impl RequestSender {
    /// Create a sender, falling back to the default HTTP transport when the
    /// options do not name one.
    pub fn new(options: Arc<ModuleOptions>) -> Result<Self> {
        let transport = match &options.http_client {
            Some(transport) => Arc::clone(transport),
            None => default_transport()?,
        };
        Ok(Self::with_transport(options, transport))
    }

    pub fn with_transport(options: Arc<ModuleOptions>, transport: SharedTransport) -> Self {
        Self { options, transport }
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    pub fn effective_config(
        &self,
        method_name: &str,
        per_call: Option<&RequestConfig>,
    ) -> EffectiveConfig {
        let empty = RequestConfig::default();
        merge(
            &self.options.default_request_config,
            self.options
                .method_request_config(method_name)
                .unwrap_or(&empty),
            per_call.unwrap_or(&empty),
        )
    }

    pub fn url_for(&self, method_name: &str) -> String {
        build_url(
            &self.options.api_url,
            self.options.ssr_api_url.as_deref(),
            self.options.context,
            method_name,
        )
    }

    /// Call `method_name` with `params`.
    ///
    /// `params` always reaches the transport wrapped in a one-element array,
    /// scalars included. The transport result is returned untouched.
    pub async fn send(
        &self,
        method_name: &str,
        params: Value,
        per_call: Option<RequestConfig>,
    ) -> Result<Value, SdkError> {
        let config = self.effective_config(method_name, per_call.as_ref());
        let ShapedRequest { url, params } =
            shape_request(self.url_for(method_name), config.method, vec![params])?;

        debug!("Sending {} {} for {}", config.method, url, method_name);
        trace!("Params: {:?}, headers: {:?}", params, loggable_headers(&config));

        let Some(handler) = &self.options.error_handler else {
            return self
                .transport
                .send(url, params, config)
                .await
                .inspect_err(|error| warn!("Request {} failed: {}", method_name, error));
        };

        match self
            .transport
            .send(url.clone(), params.clone(), config.clone())
            .await
        {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(
                    "Request {} failed, passing to error handler: {}",
                    method_name, error
                );
                handler
                    .handle(ErrorContext {
                        error,
                        method_name: method_name.to_string(),
                        url,
                        params,
                        config,
                        http_client: Arc::clone(&self.transport),
                    })
                    .await
            }
        }
    }

    /// Typed variant of [`send`](Self::send)
    pub async fn send_typed<P, R>(
        &self,
        method_name: &str,
        params: &P,
        per_call: Option<RequestConfig>,
    ) -> Result<R, SdkError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = serde_json::to_value(params)?;
        let value = self.send(method_name, params, per_call).await?;
        Ok(serde_json::from_value(value)?)
    }
}

impl fmt::Debug for RequestSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSender")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
];

/// Effective headers with credential values masked, for logging
fn loggable_headers(config: &EffectiveConfig) -> BTreeMap<&str, &str> {
    config
        .headers
        .iter()
        .map(|(name, value)| {
            let sensitive = SENSITIVE_HEADERS
                .iter()
                .any(|s| name.eq_ignore_ascii_case(s));
            (name.as_str(), if sensitive { "<redacted>" } else { value.as_str() })
        })
        .collect()
}

#[cfg(feature = "http")]
fn default_transport() -> Result<SharedTransport> {
    use sdkwire_transport::{HttpTransport, HttpTransportConfig};
    Ok(Arc::new(HttpTransport::new(HttpTransportConfig::default())?))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<SharedTransport> {
    anyhow::bail!("No transport configured and the `http` feature is disabled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkwire_core::{ExecutionContext, HttpMethod};
    use sdkwire_transport::transport_fn;
    use serde_json::json;

    fn echo_sender(options: ModuleOptions) -> RequestSender {
        let transport: SharedTransport =
            Arc::new(transport_fn(|url, params, config: EffectiveConfig| async move {
                Ok(json!({ "url": url, "params": params, "method": config.method }))
            }));
        RequestSender::with_transport(Arc::new(options), transport)
    }

    #[test]
    fn test_effective_config_uses_method_level() {
        let sender = echo_sender(
            ModuleOptions::new("/api")
                .with_method_request_config("getProducts", RequestConfig::new().with_method(HttpMethod::Get)),
        );
        assert_eq!(sender.effective_config("getProducts", None).method, HttpMethod::Get);
        assert_eq!(sender.effective_config("getProduct", None).method, HttpMethod::Post);

        let call = RequestConfig::new().with_method(HttpMethod::Put);
        assert_eq!(
            sender.effective_config("getProducts", Some(&call)).method,
            HttpMethod::Put
        );
    }

    #[test]
    fn test_url_for_respects_context() {
        let options = ModuleOptions::new("http://public/api/")
            .with_ssr_api_url("http://internal/api//");
        let server = echo_sender(options.clone().with_context(ExecutionContext::Server));
        let client = echo_sender(options.with_context(ExecutionContext::Client));

        assert_eq!(server.url_for("getCart"), "http://internal/api/getCart");
        assert_eq!(client.url_for("getCart"), "http://public/api/getCart");
    }

    #[tokio::test]
    async fn test_scalar_params_are_wrapped() {
        let sender = echo_sender(ModuleOptions::new("/api"));
        let value = sender.send("getProduct", json!(7), None).await.unwrap();
        assert_eq!(value["params"], json!([7]));
        assert_eq!(value["method"], json!("POST"));
    }

    #[tokio::test]
    async fn test_send_typed_round_trip() {
        #[derive(serde::Serialize)]
        struct Query {
            limit: u32,
        }

        let sender = echo_sender(ModuleOptions::new("/api"));
        let value: Value = sender
            .send_typed("getProducts", &Query { limit: 2 }, None)
            .await
            .unwrap();
        assert_eq!(value["params"], json!([{"limit": 2}]));
    }

    #[test]
    fn test_loggable_headers_mask_credentials() {
        let sender = echo_sender(
            ModuleOptions::new("/api")
                .with_default_request_config(RequestConfig::new().with_header("X-Api-Key", "k1")),
        );
        let call = RequestConfig::new()
            .with_header("Authorization", "Bearer secret")
            .with_header("X-Trace", "abc");
        let config = sender.effective_config("getCart", Some(&call));

        let logged = loggable_headers(&config);
        assert_eq!(logged["Authorization"], "<redacted>");
        assert_eq!(logged["X-Api-Key"], "<redacted>");
        assert_eq!(logged["X-Trace"], "abc");
        assert_eq!(logged["Content-Type"], "application/json");
        assert!(!format!("{:?}", logged).contains("secret"));
        assert_eq!(config.header("authorization"), Some("Bearer secret"));
    }

    #[test]
    fn test_new_uses_configured_transport() {
        let options = ModuleOptions::new("/api")
            .with_http_client(transport_fn(|_, _, _| async { Ok(Value::Null) }));
        assert!(RequestSender::new(Arc::new(options)).is_ok());
    }
}
