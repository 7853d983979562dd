use crate::handler::{ErrorHandler, SharedErrorHandler};
use sdkwire_core::{ExecutionContext, RequestConfig};
use sdkwire_transport::{SharedTransport, Transport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Settings for one SDK module, fixed once the module is built.
#[derive(Clone)]
pub struct ModuleOptions {
    /// Base URL used by clients, and by servers when no SSR URL is set
    pub api_url: String,
    /// Base URL used when running server-side
    pub ssr_api_url: Option<String>,
    /// Transport override; the default HTTP transport is used when unset
    pub http_client: Option<SharedTransport>,
    /// Called with the failure context whenever the transport fails
    pub error_handler: Option<SharedErrorHandler>,
    pub default_request_config: RequestConfig,
    pub methods_request_config: HashMap<String, RequestConfig>,
    pub context: ExecutionContext,
}

impl ModuleOptions {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ssr_api_url: None,
            http_client: None,
            error_handler: None,
            default_request_config: RequestConfig::default(),
            methods_request_config: HashMap::new(),
            context: ExecutionContext::detect(),
        }
    }

    pub fn from_config(config: ModuleConfig) -> Self {
        Self {
            ssr_api_url: config.ssr_api_url,
            default_request_config: config.default_request_config,
            methods_request_config: config.methods_request_config,
            ..Self::new(config.api_url)
        }
    }

    pub fn with_ssr_api_url(mut self, ssr_api_url: impl Into<String>) -> Self {
        self.ssr_api_url = Some(ssr_api_url.into());
        self
    }

    pub fn with_http_client(mut self, transport: impl Transport + 'static) -> Self {
        self.http_client = Some(Arc::new(transport));
        self
    }

    pub fn with_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_default_request_config(mut self, config: RequestConfig) -> Self {
        self.default_request_config = config;
        self
    }

    pub fn with_method_request_config(
        mut self,
        method_name: impl Into<String>,
        config: RequestConfig,
    ) -> Self {
        self.methods_request_config.insert(method_name.into(), config);
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    /// Per-method config for `method_name`, if one was registered
    pub fn method_request_config(&self, method_name: &str) -> Option<&RequestConfig> {
        self.methods_request_config.get(method_name)
    }
}

impl fmt::Debug for ModuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleOptions")
            .field("api_url", &self.api_url)
            .field("ssr_api_url", &self.ssr_api_url)
            .field("http_client", &self.http_client.as_ref().map(|_| "custom"))
            .field("error_handler", &self.error_handler.is_some())
            .field("default_request_config", &self.default_request_config)
            .field("methods_request_config", &self.methods_request_config)
            .field("context", &self.context)
            .finish()
    }
}

/// Serializable part of [`ModuleOptions`], for modules configured from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssr_api_url: Option<String>,
    #[serde(default)]
    pub default_request_config: RequestConfig,
    #[serde(default)]
    pub methods_request_config: HashMap<String, RequestConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdkwire_core::HttpMethod;
    use serde_json::json;

    #[test]
    fn test_options_builder() {
        let options = ModuleOptions::new("http://localhost:8181/commerce")
            .with_ssr_api_url("http://commerce:8181/commerce")
            .with_default_request_config(RequestConfig::new().with_header("X-Store", "eu"))
            .with_method_request_config(
                "getProducts",
                RequestConfig::new().with_method(HttpMethod::Get),
            )
            .with_context(ExecutionContext::Client);

        assert_eq!(options.api_url, "http://localhost:8181/commerce");
        assert_eq!(options.ssr_api_url.as_deref(), Some("http://commerce:8181/commerce"));
        assert_eq!(
            options.method_request_config("getProducts").unwrap().method,
            Some(HttpMethod::Get)
        );
        assert!(options.method_request_config("getProduct").is_none());
        assert_eq!(options.context, ExecutionContext::Client);
        assert!(options.http_client.is_none());
        assert!(options.error_handler.is_none());
    }

    #[test]
    fn test_options_from_json_config() {
        let config: ModuleConfig = serde_json::from_value(json!({
            "api_url": "/api/commerce",
            "default_request_config": { "headers": { "X-Channel": "web" } },
            "methods_request_config": {
                "getProducts": { "method": "GET" },
                "search": { "headers": { "X-Tags": ["a", "b"] }, "timeout_ms": 500 }
            }
        }))
        .unwrap();

        let options = ModuleOptions::from_config(config);
        assert_eq!(options.api_url, "/api/commerce");
        assert!(options.ssr_api_url.is_none());
        assert_eq!(options.methods_request_config.len(), 2);
        assert_eq!(
            options.method_request_config("search").unwrap().extra["timeout_ms"],
            json!(500)
        );
    }

    #[test]
    fn test_debug_hides_handlers() {
        let options = ModuleOptions::new("/api");
        let debug = format!("{:?}", options);
        assert!(debug.contains("api_url"));
        assert!(debug.contains("error_handler: false"));
    }
}
