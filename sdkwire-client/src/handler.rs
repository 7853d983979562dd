use async_trait::async_trait;
use sdkwire_core::{EffectiveConfig, SdkError, SdkRequestError};
use sdkwire_transport::SharedTransport;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Everything known about a failed transport call.
///
/// `url` and `params` are exactly what the transport received, so
/// [`ErrorContext::resend`] repeats the same request.
#[derive(Clone)]
pub struct ErrorContext {
    pub error: SdkError,
    pub method_name: String,
    pub url: String,
    pub params: Vec<Value>,
    pub config: EffectiveConfig,
    pub http_client: SharedTransport,
}

impl ErrorContext {
    /// Send the failed request again through the same transport
    pub async fn resend(&self) -> Result<Value, SdkError> {
        self.http_client
            .send(self.url.clone(), self.params.clone(), self.config.clone())
            .await
    }

    /// Wrap the failure in a request error carrying the call context
    pub fn into_request_error(self) -> SdkError {
        SdkRequestError::new(self.method_name, self.url, self.params, self.config)
            .with_cause(self.error)
            .into()
    }
}

impl fmt::Debug for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorContext")
            .field("error", &self.error)
            .field("method_name", &self.method_name)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Decides the outcome of a call whose transport failed. Whatever it
/// returns, success or error, is what the caller gets.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, context: ErrorContext) -> Result<Value, SdkError>;
}

pub type SharedErrorHandler = Arc<dyn ErrorHandler>;

pub struct FnErrorHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnErrorHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnErrorHandler").finish_non_exhaustive()
    }
}

pub fn error_handler_fn<F, Fut>(f: F) -> FnErrorHandler<F>
where
    F: Fn(ErrorContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SdkError>> + Send,
{
    FnErrorHandler { f }
}

#[async_trait]
impl<F, Fut> ErrorHandler for FnErrorHandler<F>
where
    F: Fn(ErrorContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SdkError>> + Send,
{
    async fn handle(&self, context: ErrorContext) -> Result<Value, SdkError> {
        (self.f)(context).await
    }
}
