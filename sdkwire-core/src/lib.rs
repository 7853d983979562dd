//! Building blocks shared by every sdkwire module: layered request
//! configuration, URL shaping and the SDK error hierarchy.

pub mod classify;
pub mod config;
pub mod error;
pub mod url;

pub use classify::{
    is_caused_by_sdk_http_error, is_sdk_request_error, is_sdk_unauthorized_error,
    is_specific_sdk_http_error, CauseMatch, FieldMatch, HttpErrorMatcher,
};
pub use config::{merge, merge_levels, EffectiveConfig, HeaderValue, HttpMethod, RequestConfig};
pub use error::{BoxError, ErrorKind, SdkError, SdkHttpError, SdkRequestError};
pub use url::{build_url, join_method, select_base, shape_request, ExecutionContext, ShapedRequest};
