use crate::config::EffectiveConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared, clonable handle to an arbitrary underlying error
pub type BoxError = Arc<dyn std::error::Error + Send + Sync + 'static>;

pub const UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Request,
    Http,
    Transport,
    Custom,
    UnknownMethod,
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Request => "request",
            ErrorKind::Http => "http",
            ErrorKind::Transport => "transport",
            ErrorKind::Custom => "custom",
            ErrorKind::UnknownMethod => "unknown_method",
            ErrorKind::Serialization => "serialization",
        };
        write!(f, "{}", s)
    }
}

/// A failed SDK-generated request, with everything needed to reproduce it.
#[derive(Debug, Clone, Error)]
#[error("request to `{method_name}` at {url} failed")]
pub struct SdkRequestError {
    pub method_name: String,
    pub url: String,
    pub params: Vec<Value>,
    pub config: EffectiveConfig,
    #[source]
    pub cause: Option<Box<SdkError>>,
}

impl SdkRequestError {
    pub fn new(
        method_name: impl Into<String>,
        url: impl Into<String>,
        params: Vec<Value>,
        config: EffectiveConfig,
    ) -> Self {
        SdkRequestError {
            method_name: method_name.into(),
            url: url.into(),
            params,
            config,
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: SdkError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// A failure reported by the remote side, normalized to a status code and
/// message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SdkHttpError {
    pub status_code: u16,
    pub message: String,
    #[source]
    pub cause: Option<BoxError>,
}

impl SdkHttpError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        SdkHttpError {
            status_code,
            message: message.into(),
            cause: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(UNAUTHORIZED, message)
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == UNAUTHORIZED
    }
}

/// Every error a module call can fail with.
///
/// The variant is the discriminant the classifiers look at; `Request` and
/// `Custom` may carry one nested cause.
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    #[error(transparent)]
    Request(Box<SdkRequestError>),

    #[error(transparent)]
    Http(SdkHttpError),

    /// Opaque failure raised by a transport
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("{message}")]
    Custom {
        message: String,
        #[source]
        cause: Option<Box<SdkError>>,
    },

    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl SdkError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SdkError::Transport(Arc::new(err))
    }

    pub fn custom(message: impl Into<String>) -> Self {
        SdkError::Custom {
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap `cause` in an application error that keeps it reachable for the
    /// classifiers.
    pub fn caused_by(message: impl Into<String>, cause: SdkError) -> Self {
        SdkError::Custom {
            message: message.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::Request(_) => ErrorKind::Request,
            SdkError::Http(_) => ErrorKind::Http,
            SdkError::Transport(_) => ErrorKind::Transport,
            SdkError::Custom { .. } => ErrorKind::Custom,
            SdkError::UnknownMethod(_) => ErrorKind::UnknownMethod,
            SdkError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// The directly nested SDK error, if any
    pub fn cause(&self) -> Option<&SdkError> {
        match self {
            SdkError::Request(err) => err.cause.as_deref(),
            SdkError::Custom { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// This error or its direct cause, whichever is an HTTP error first
    pub fn http_error(&self) -> Option<&SdkHttpError> {
        fn direct(err: &SdkError) -> Option<&SdkHttpError> {
            match err {
                SdkError::Http(http) => Some(http),
                _ => None,
            }
        }
        direct(self).or_else(|| self.cause().and_then(direct))
    }

    pub fn request_error(&self) -> Option<&SdkRequestError> {
        fn direct(err: &SdkError) -> Option<&SdkRequestError> {
            match err {
                SdkError::Request(request) => Some(request),
                _ => None,
            }
        }
        direct(self).or_else(|| self.cause().and_then(direct))
    }

    pub fn status_code(&self) -> Option<u16> {
        self.http_error().map(|http| http.status_code)
    }
}

impl From<SdkHttpError> for SdkError {
    fn from(err: SdkHttpError) -> Self {
        SdkError::Http(err)
    }
}

impl From<SdkRequestError> for SdkError {
    fn from(err: SdkRequestError) -> Self {
        SdkError::Request(Box::new(err))
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
