//! Build SDK modules from a declared set of endpoint names.
//!
//! Every endpoint becomes a method `(params, config) -> Result<Value, SdkError>`
//! that merges request configuration, builds the URL, and dispatches through a
//! pluggable [`Transport`]. Methods can be overridden or added at build time.
//!
//! ```rust,no_run
//! use sdkwire_client::{HttpMethod, Module, ModuleOptions, RequestConfig};
//! use serde_json::json;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let commerce = Module::builder(ModuleOptions::new("http://localhost:8181/commerce"))
//!     .endpoints(["getProduct", "getProducts"])
//!     .build()?;
//!
//! let product = commerce.call("getProduct", json!({ "id": 1 }), None).await?;
//! let products = commerce
//!     .call(
//!         "getProducts",
//!         json!({ "limit": 10 }),
//!         Some(RequestConfig::new().with_method(HttpMethod::Get)),
//!     )
//!     .await?;
//! # let _ = (product, products);
//! # Ok(())
//! # }
//! ```

pub mod handler;
pub mod logging;
pub mod macros;
pub mod module;
pub mod options;
pub mod sdk;
pub mod sender;

pub use handler::{error_handler_fn, ErrorContext, ErrorHandler, FnErrorHandler, SharedErrorHandler};
pub use module::{
    method_fn, BoundMethod, EndpointMethod, FnMethod, Method, MethodHandle, Module, ModuleBuilder,
    ModuleContext,
};
pub use options::{ModuleConfig, ModuleOptions};
pub use sdk::{Sdk, SdkBuilder};
pub use sender::RequestSender;

pub use sdkwire_core::{
    is_caused_by_sdk_http_error, is_sdk_request_error, is_sdk_unauthorized_error,
    is_specific_sdk_http_error, CauseMatch, EffectiveConfig, ErrorKind, ExecutionContext, FieldMatch,
    HeaderValue, HttpErrorMatcher, HttpMethod, RequestConfig, SdkError, SdkHttpError,
    SdkRequestError,
};
pub use sdkwire_transport::{transport_fn, FnTransport, SharedTransport, Transport};
#[cfg(feature = "http")]
pub use sdkwire_transport::{HttpTransport, HttpTransportConfig};

#[doc(hidden)]
pub mod __private {
    pub use anyhow;
    pub use serde_json;
}
