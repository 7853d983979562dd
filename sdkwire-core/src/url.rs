use crate::config::HttpMethod;
use crate::error::SdkError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use tracing::trace;

/// Characters left alone by `encodeURIComponent`; everything else is escaped.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query parameter carrying the JSON-encoded params of body-less requests
pub const BODY_QUERY_PARAM: &str = "body";

/// Where the module is running, which decides between the public and the
/// server-side base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Browser or other end-user runtime
    Client,
    /// Server-side rendering or any backend process
    Server,
}

impl ExecutionContext {
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            ExecutionContext::Client
        } else {
            ExecutionContext::Server
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, ExecutionContext::Server)
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::detect()
    }
}

/// Pick the base URL for the current execution context.
pub fn select_base<'a>(
    api_url: &'a str,
    ssr_api_url: Option<&'a str>,
    context: ExecutionContext,
) -> &'a str {
    match ssr_api_url {
        Some(ssr) if context.is_server() => ssr,
        _ => api_url,
    }
}

/// Append `method_name` to `base`, collapsing any run of trailing slashes.
pub fn join_method(base: &str, method_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), method_name)
}

pub fn build_url(
    api_url: &str,
    ssr_api_url: Option<&str>,
    context: ExecutionContext,
    method_name: &str,
) -> String {
    join_method(select_base(api_url, ssr_api_url, context), method_name)
}

/// URL and params as the transport should receive them
#[derive(Debug, Clone, PartialEq)]
pub struct ShapedRequest {
    pub url: String,
    pub params: Vec<Value>,
}

/// Fit the params to the request method.
///
/// Body-less methods move the params into a `body` query parameter holding
/// the percent-encoded JSON array and leave the transport with no params.
/// Every other method keeps both URL and params as they are.
pub fn shape_request(
    url: String,
    method: HttpMethod,
    params: Vec<Value>,
) -> Result<ShapedRequest, SdkError> {
    if method.has_body() {
        return Ok(ShapedRequest { url, params });
    }

    let json = serde_json::to_string(&params)?;
    let separator = if url.contains('?') { '&' } else { '?' };
    let url = format!(
        "{url}{separator}{BODY_QUERY_PARAM}={}",
        utf8_percent_encode(&json, QUERY_COMPONENT)
    );
    trace!("Encoded {} params into query for {}", params.len(), method);

    Ok(ShapedRequest {
        url,
        params: Vec::new(),
    })
}
