//! # Error Handling
//!
//! This module defines the centralized error type for `directus-provider`.
//! It uses `thiserror` to build a single `Error` enum covering every failure
//! mode of the crate, from configuration problems detected before any network
//! activity to HTTP errors reported by the remote Directus instance.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures. Variants carry enough context
//!   (HTTP method, path, resource identifier, operation) for a caller to act
//!   on them without inspecting the source chain.
//!
//! - **`Operation`**: The orchestrator operation an `Error::Resource` was
//!   raised from, used to render messages such as
//!   `Could not create policy: HTTP 400: ...`.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The taxonomy follows the life of a call:
//!
//! - Configuration errors (missing endpoint or token) at construction time.
//! - Validation errors (empty collection, identifier or payload) before a
//!   request is sent.
//! - Cancellation and deadline errors raised from the caller's `CallContext`.
//! - Transport errors (connection refused, timeouts) from `reqwest`.
//! - API errors for any response with status >= 400.
//! - Reconciliation read/write errors from the relation reconciler.
//! - Resource errors wrapping any of the above with orchestrator context.

use std::fmt;

use thiserror::Error;

use crate::client::Method;

/// Orchestrator operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        };
        f.write_str(name)
    }
}

/// Main error type for directus-provider operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required construction parameter is missing or malformed.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A required call parameter is missing. Raised before any network activity.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The request could not be completed at the network level.
    #[error("Transport error for {method} {path}: {source}")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The caller cancelled the operation before or during the request.
    #[error("Request cancelled: {method} {path}")]
    Cancelled { method: Method, path: String },

    /// The caller's deadline elapsed before or during the request.
    #[error("Deadline exceeded: {method} {path}")]
    DeadlineExceeded { method: Method, path: String },

    /// The remote service answered with an error status.
    ///
    /// `code` is the `extensions.code` of the first structured error entry
    /// when the service supplied one.
    #[error("HTTP {status}{}: {message}", bracketed(code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A successful response body did not have the expected shape.
    #[error("Failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },

    /// The reconciler could not read the currently attached relation records.
    #[error("Could not read {relation} for {owner}: {source}")]
    ReconcileRead {
        relation: String,
        owner: String,
        #[source]
        source: Box<Error>,
    },

    /// The reconciler's batched relation update failed.
    #[error("Could not update {relation} for {owner}: {source}")]
    ReconcileWrite {
        relation: String,
        owner: String,
        #[source]
        source: Box<Error>,
    },

    /// An orchestrator operation failed; wraps the underlying cause.
    #[error("Could not {operation} {kind}{}: {source}", spaced(id))]
    Resource {
        operation: Operation,
        kind: &'static str,
        id: Option<String>,
        #[source]
        source: Box<Error>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Wraps `self` with the orchestrator operation and resource it came from.
    pub fn in_resource(self, operation: Operation, kind: &'static str, id: Option<&str>) -> Self {
        Error::Resource {
            operation,
            kind,
            id: id.map(str::to_string),
            source: Box::new(self),
        }
    }

    /// HTTP status of the innermost API error, if any.
    ///
    /// Callers use this to tell "gone remotely" (404) apart from other
    /// read failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Resource { source, .. }
            | Error::ReconcileRead { source, .. }
            | Error::ReconcileWrite { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the innermost cause is a 404 from the remote service.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn bracketed(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" [{}]", c)).unwrap_or_default()
}

fn spaced(id: &Option<String>) -> String {
    id.as_ref().map(|i| format!(" {}", i)).unwrap_or_default()
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
