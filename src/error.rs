//! Error types shared by the fetch adapter and the coordinator.

use thiserror::Error;

/// A request to one endpoint failed. Carries the endpoint path (e.g. `/countries/US`)
/// and what went wrong.
#[derive(Error, Debug)]
#[error("GET {endpoint} failed: {cause}")]
pub struct FetchError {
    pub endpoint: String,
    #[source]
    pub cause: FetchCause,
}

impl FetchError {
    pub fn new(endpoint: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            endpoint: endpoint.into(),
            cause,
        }
    }

    /// HTTP status when the server answered with a non-2xx code.
    pub fn status(&self) -> Option<u16> {
        match self.cause {
            FetchCause::Status { status, .. } => Some(status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchCause {
    /// Connection, TLS or transport failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the JSON shape we expected
    #[error("malformed response: {0}")]
    Decode(String),

    /// Body parsed but lacks a field the record cannot do without
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    /// The source panicked before producing an answer
    #[error("request worker panicked")]
    WorkerPanicked,
}

/// A country record that cannot be turned into a `CountryStat`.
/// Raised during decoding and handled by dropping the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed country record{}: missing `{field}`", record_suffix(.record))]
pub struct MalformedRecordError {
    pub field: &'static str,
    pub record: Option<String>,
}

impl MalformedRecordError {
    pub fn missing(field: &'static str) -> Self {
        Self { field, record: None }
    }

    pub fn named(mut self, record: &str) -> Self {
        self.record = Some(record.to_string());
        self
    }
}

fn record_suffix(record: &Option<String>) -> String {
    record.as_deref().map(|r| format!(" ({r})")).unwrap_or_default()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("country code must not be empty")]
    Empty,
}
