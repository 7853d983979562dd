use async_trait::async_trait;
use sdkwire_core::{EffectiveConfig, SdkError};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Performs the actual remote call for a module method.
///
/// `url` is fully built, including the `body` query for GET-shaped requests,
/// in which case `params` is empty. Any error is passed on to the module's
/// error handler or straight back to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        url: String,
        params: Vec<Value>,
        config: EffectiveConfig,
    ) -> Result<Value, SdkError>;
}

pub type SharedTransport = Arc<dyn Transport>;

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        url: String,
        params: Vec<Value>,
        config: EffectiveConfig,
    ) -> Result<Value, SdkError> {
        (**self).send(url, params, config).await
    }
}

/// Transport backed by an async closure, see [`transport_fn`].
#[derive(Clone)]
pub struct FnTransport<F> {
    f: F,
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}

/// Wrap an async closure as a [`Transport`].
///
/// ```rust
/// use sdkwire_transport::{transport_fn, Transport};
/// use serde_json::json;
///
/// let transport = transport_fn(|url, params, _config| async move {
///     Ok(json!({ "url": url, "count": params.len() }))
/// });
/// # let _ = &transport as &dyn Transport;
/// ```
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(String, Vec<Value>, EffectiveConfig) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SdkError>> + Send,
{
    FnTransport { f }
}

#[async_trait]
impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(String, Vec<Value>, EffectiveConfig) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SdkError>> + Send,
{
    async fn send(
        &self,
        url: String,
        params: Vec<Value>,
        config: EffectiveConfig,
    ) -> Result<Value, SdkError> {
        (self.f)(url, params, config).await
    }
}
