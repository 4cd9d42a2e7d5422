//! Request state emission
//!
//! Every network-backed screen observes the same short sequence of states:
//! `Loading(true)`, exactly one `Success` or `Error`, then `Loading(false)`.
//! [`load`] turns any fallible remote call into that sequence, and
//! [`LoadState`] folds it back into what a screen renders.

use std::fmt;
use std::future::Future;

use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};

// =============================================================================
// Resource
// =============================================================================

/// One state snapshot of a remote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Resource<T> {
    /// Loading started (`true`) or ended (`false`)
    Loading(bool),
    /// Request completed with a mapped domain value
    Success(T),
    /// Request failed; the cause is already classified
    Error(ErrorKind),
}

impl<T> Resource<T> {
    /// True only for `Loading(true)`
    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading(true))
    }

    /// True for `Success` and `Error`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Resource::Loading(_))
    }

    /// Success payload, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Resource::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Error kind, if any
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Resource::Error(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Map the success payload, leaving loading and error states untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resource<U> {
        match self {
            Resource::Loading(active) => Resource::Loading(active),
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Error(kind) => Resource::Error(kind),
        }
    }
}

// =============================================================================
// Error Classification
// =============================================================================

/// Coarse failure category surfaced to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connectivity fault, usually before any response arrived
    NetworkFailure,
    /// Anything else: bad status, bad payload, bad local state
    MalformedRequest,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NetworkFailure => write!(f, "Network failure, check your connection"),
            ErrorKind::MalformedRequest => write!(f, "Malformed request or response"),
        }
    }
}

/// Map a failure to its [`ErrorKind`] by looking at where it came from
pub trait Classify {
    fn classify(&self) -> ErrorKind;
}

impl Classify for std::io::Error {
    fn classify(&self) -> ErrorKind {
        ErrorKind::NetworkFailure
    }
}

impl Classify for serde_json::Error {
    fn classify(&self) -> ErrorKind {
        if self.is_io() {
            ErrorKind::NetworkFailure
        } else {
            ErrorKind::MalformedRequest
        }
    }
}

impl Classify for reqwest::Error {
    fn classify(&self) -> ErrorKind {
        // A body cut short surfaces as a decode error wrapping a body/io error
        if self.is_body() || lost_connection(self) {
            return ErrorKind::NetworkFailure;
        }
        if self.is_decode() || self.is_status() || self.is_builder() || self.is_redirect() {
            return ErrorKind::MalformedRequest;
        }
        if self.is_connect() || self.is_timeout() || self.is_request() {
            return ErrorKind::NetworkFailure;
        }
        ErrorKind::MalformedRequest
    }
}

/// True when any cause below `err` is a body read or I/O failure
fn lost_connection(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return true;
        }
        if cause
            .downcast_ref::<reqwest::Error>()
            .is_some_and(|e| e.is_body() || e.is_timeout() || e.is_connect())
        {
            return true;
        }
        source = cause.source();
    }
    false
}

// =============================================================================
// Pipeline
// =============================================================================

/// Boxed state stream returned by repositories
pub type ResourceStream<'a, T> = BoxStream<'a, Resource<T>>;

/// Wrap a remote call into its state sequence
///
/// The call is not polled until the stream is, and dropping the stream
/// drops the call with it. Failures never escape: they are classified and
/// emitted as [`Resource::Error`].
pub fn load<T, E, F>(call: F) -> impl Stream<Item = Resource<T>>
where
    F: Future<Output = Result<T, E>>,
    E: Classify + fmt::Display,
{
    let terminal = async move {
        match call.await {
            Ok(value) => Resource::Success(value),
            Err(err) => {
                let kind = err.classify();
                match kind {
                    ErrorKind::NetworkFailure => {
                        tracing::debug!(error = %err, "request failed before a response arrived")
                    }
                    ErrorKind::MalformedRequest => {
                        tracing::warn!(error = %err, "request returned a malformed request or response")
                    }
                }
                Resource::Error(kind)
            }
        }
    };

    stream::once(future::ready(Resource::Loading(true)))
        .chain(stream::once(terminal))
        .chain(stream::once(future::ready(Resource::Loading(false))))
}

// =============================================================================
// Consumer-side State
// =============================================================================

/// What a screen holds after observing some prefix of a state sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadState<T> {
    pub is_loading: bool,
    pub response: Option<T>,
    pub error: Option<ErrorKind>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            response: None,
            error: None,
        }
    }
}

impl<T> LoadState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one emitted state into the screen state
    pub fn apply(&mut self, resource: Resource<T>) {
        match resource {
            Resource::Loading(active) => self.is_loading = active,
            Resource::Success(value) => {
                self.response = Some(value);
                self.error = None;
            }
            Resource::Error(kind) => {
                self.response = None;
                self.error = Some(kind);
            }
        }
    }

    pub fn from_states(states: impl IntoIterator<Item = Resource<T>>) -> Self {
        let mut state = Self::new();
        for resource in states {
            state.apply(resource);
        }
        state
    }
}
