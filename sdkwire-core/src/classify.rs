// Predicates for telling SDK failures apart from arbitrary application errors.
// Each looks at the error itself and at most one level of `cause`.

use crate::error::{BoxError, SdkError, SdkHttpError, UNAUTHORIZED};
use std::fmt;
use std::sync::Arc;

/// Expected value for one field of an HTTP error: either an exact value or a
/// predicate over it.
pub enum FieldMatch<T> {
    Exact(T),
    Predicate(Arc<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T: PartialEq> FieldMatch<T> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        FieldMatch::Predicate(Arc::new(f))
    }

    pub fn matches(&self, value: &T) -> bool {
        match self {
            FieldMatch::Exact(expected) => expected == value,
            FieldMatch::Predicate(f) => f(value),
        }
    }
}

impl<T: Clone> Clone for FieldMatch<T> {
    fn clone(&self) -> Self {
        match self {
            FieldMatch::Exact(value) => FieldMatch::Exact(value.clone()),
            FieldMatch::Predicate(f) => FieldMatch::Predicate(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FieldMatch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldMatch::Exact(value) => f.debug_tuple("Exact").field(value).finish(),
            FieldMatch::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<u16> for FieldMatch<u16> {
    fn from(value: u16) -> Self {
        FieldMatch::Exact(value)
    }
}

impl From<&str> for FieldMatch<String> {
    fn from(value: &str) -> Self {
        FieldMatch::Exact(value.to_string())
    }
}

impl From<String> for FieldMatch<String> {
    fn from(value: String) -> Self {
        FieldMatch::Exact(value)
    }
}

pub type CauseMatch = Arc<dyn Fn(Option<&BoxError>) -> bool + Send + Sync>;

/// Field-wise matcher for [`SdkHttpError`]. Unset fields match anything.
#[derive(Clone, Default)]
pub struct HttpErrorMatcher {
    pub status_code: Option<FieldMatch<u16>>,
    pub message: Option<FieldMatch<String>>,
    pub cause: Option<CauseMatch>,
}

impl fmt::Debug for HttpErrorMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpErrorMatcher")
            .field("status_code", &self.status_code)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|_| ".."))
            .finish()
    }
}

impl HttpErrorMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(mut self, expected: impl Into<FieldMatch<u16>>) -> Self {
        self.status_code = Some(expected.into());
        self
    }

    pub fn status_code_where<F>(self, f: F) -> Self
    where
        F: Fn(&u16) -> bool + Send + Sync + 'static,
    {
        self.status_code(FieldMatch::predicate(f))
    }

    pub fn message(mut self, expected: impl Into<FieldMatch<String>>) -> Self {
        self.message = Some(expected.into());
        self
    }

    pub fn message_where<F>(self, f: F) -> Self
    where
        F: Fn(&String) -> bool + Send + Sync + 'static,
    {
        self.message(FieldMatch::predicate(f))
    }

    /// Match on the underlying cause, `None` when the error has none
    pub fn cause_where<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&BoxError>) -> bool + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(f));
        self
    }

    pub fn matches(&self, err: &SdkHttpError) -> bool {
        self.status_code
            .as_ref()
            .is_none_or(|m| m.matches(&err.status_code))
            && self.message.as_ref().is_none_or(|m| m.matches(&err.message))
            && self.cause.as_ref().is_none_or(|m| m(err.cause.as_ref()))
    }
}

/// True when `err`, or its direct cause, came out of an SDK request. HTTP
/// errors count as request errors.
pub fn is_sdk_request_error(err: &SdkError) -> bool {
    fn direct(err: &SdkError) -> bool {
        matches!(err, SdkError::Request(_) | SdkError::Http(_))
    }
    direct(err) || err.cause().is_some_and(direct)
}

pub fn is_caused_by_sdk_http_error(err: &SdkError) -> bool {
    err.http_error().is_some()
}

pub fn is_specific_sdk_http_error(err: &SdkError, matcher: &HttpErrorMatcher) -> bool {
    err.http_error().is_some_and(|http| matcher.matches(http))
}

pub fn is_sdk_unauthorized_error(err: &SdkError) -> bool {
    is_specific_sdk_http_error(err, &HttpErrorMatcher::new().status_code(UNAUTHORIZED))
}

impl SdkError {
    pub fn is_sdk_request_error(&self) -> bool {
        is_sdk_request_error(self)
    }

    pub fn is_caused_by_http_error(&self) -> bool {
        is_caused_by_sdk_http_error(self)
    }

    pub fn matches_http(&self, matcher: &HttpErrorMatcher) -> bool {
        is_specific_sdk_http_error(self, matcher)
    }

    pub fn is_unauthorized(&self) -> bool {
        is_sdk_unauthorized_error(self)
    }
}
