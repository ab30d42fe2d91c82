//! # Directus REST Client
//!
//! This module provides the HTTP layer used by every resource orchestrator.
//! It is split the same way the rest of the crate is tested: a small
//! `Transport` trait that performs one authenticated request, and a `Client`
//! facade that validates arguments, resolves collection paths and decodes
//! JSON responses.
//!
//! ## Design
//!
//! - **`Transport`**: sends a single request and returns the raw response
//!   body. Implementations must attach the bearer token, honour the
//!   `CallContext` and turn every status >= 400 into `Error::Api`.
//!
//! - **`HttpTransport`**: the default implementation. Each call blocks on a
//!   private single-threaded `tokio` runtime that races the `reqwest` request
//!   against the caller's cancellation token, so cancelling drops the
//!   in-flight request. The configured timeout applies to every request
//!   unless the caller's deadline is tighter.
//!
//! - **`Client`**: cheap to clone; all clones share one transport. Missing
//!   collection names, identifiers or payloads are rejected with
//!   `Error::Validation` before anything is sent.
//!
//! Nothing here retries. A failed request is reported once, with the method
//! and path that failed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::path::{resolve_path, with_query};

/// HTTP methods used against the Directus API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Single-item and list responses are wrapped as `{"data": ...}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Trait for sending requests - allows mocking in tests
pub trait Transport: Send + Sync {
    /// Send one request and return the response body.
    ///
    /// `path` is root-relative and may carry a query string. `body`, when
    /// present, is sent as JSON.
    fn send(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String>;
}

/// Directus v11 error body: `{"errors": [{"message": "...", "extensions": {"code": "..."}}]}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    #[serde(default)]
    code: Option<String>,
}

/// Decode an error response into `Error::Api`.
///
/// Uses the first structured error entry when the body has one, otherwise
/// the raw body text.
pub fn api_error(status: u16, body: &str) -> Error {
    let first = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.errors.into_iter().next())
        .filter(|entry| !entry.message.is_empty());

    match first {
        Some(entry) => Error::Api {
            status,
            code: entry
                .extensions
                .and_then(|ext| ext.code)
                .filter(|code| !code.is_empty()),
            message: entry.message,
        },
        None => Error::Api {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

/// `Transport` backed by `reqwest`, driven to completion on the calling thread
pub struct HttpTransport {
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport from a validated configuration.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token)).map_err(|_| {
            Error::Config {
                message: "token contains characters that are not valid in an HTTP header"
                    .to_string(),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            http,
            runtime,
            base_url: config.base_url(),
            timeout: config.timeout(),
        })
    }

    fn request_error(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        source: reqwest::Error,
    ) -> Error {
        let path = path.to_string();
        if ctx.is_cancelled() {
            Error::Cancelled { method, path }
        } else if source.is_timeout() && ctx.remaining() == Some(Duration::ZERO) {
            Error::DeadlineExceeded { method, path }
        } else {
            Error::Transport {
                method,
                path,
                source,
            }
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String> {
        ctx.check(method, path)?;

        log::debug!("{} {}", method, path);

        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http
            .request(method.into(), &url)
            .timeout(ctx.request_timeout(self.timeout));
        if let Some(body) = body {
            request = request.json(body);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let outcome = self.runtime.block_on(async {
            tokio::select! {
                result = exchange => Some(result),
                _ = ctx.cancelled() => None,
            }
        });

        let (status, text) = match outcome {
            Some(result) => result.map_err(|e| self.request_error(ctx, method, path, e))?,
            None => {
                log::debug!("{} {} cancelled in flight", method, path);
                return Err(Error::Cancelled {
                    method,
                    path: path.to_string(),
                });
            }
        };

        if status >= 400 {
            log::debug!("{} {} failed with HTTP {}", method, path, status);
            return Err(api_error(status, &text));
        }

        Ok(text)
    }
}

/// Directus API client shared by all resources
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client talking HTTP to the configured instance.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Creates a client on top of a custom `Transport`.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Retrieve a single item from a collection.
    pub fn get<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        collection: &str,
        id: &str,
    ) -> Result<T> {
        self.get_with_params(ctx, collection, id, &[])
    }

    /// Retrieve a single item with query parameters, e.g. a `fields`
    /// projection expanding a relation.
    pub fn get_with_params<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        collection: &str,
        id: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        require("collection", collection)?;
        require("id", id)?;

        let path = with_query(&resolve_path(collection, id), params);
        let body = self.transport.send(ctx, Method::Get, &path, None)?;
        decode(&path, &body)
    }

    /// Retrieve every item of a collection.
    pub fn list<T: DeserializeOwned>(&self, ctx: &CallContext, collection: &str) -> Result<T> {
        require("collection", collection)?;

        let path = resolve_path(collection, "");
        let body = self.transport.send(ctx, Method::Get, &path, None)?;
        decode(&path, &body)
    }

    /// Create an item and decode the response.
    pub fn create<B, T>(&self, ctx: &CallContext, collection: &str, data: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        require("collection", collection)?;
        let payload = payload(data)?;

        let path = resolve_path(collection, "");
        let body = self
            .transport
            .send(ctx, Method::Post, &path, Some(&payload))?;
        decode(&path, &body)
    }

    /// Update an item and decode the response.
    pub fn update<B, T>(&self, ctx: &CallContext, collection: &str, id: &str, data: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (path, body) = self.send_update(ctx, collection, id, data)?;
        decode(&path, &body)
    }

    /// Update an item, discarding the response body.
    pub fn patch<B>(&self, ctx: &CallContext, collection: &str, id: &str, data: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_update(ctx, collection, id, data).map(|_| ())
    }

    /// Delete an item.
    pub fn delete(&self, ctx: &CallContext, collection: &str, id: &str) -> Result<()> {
        require("collection", collection)?;
        require("id", id)?;

        let path = resolve_path(collection, id);
        self.transport.send(ctx, Method::Delete, &path, None)?;
        Ok(())
    }

    /// Check that the server is reachable and answers `pong`.
    pub fn ping(&self, ctx: &CallContext) -> Result<()> {
        let path = "/server/ping";
        let body = self.transport.send(ctx, Method::Get, path, None)?;
        if body.trim() != "pong" {
            return Err(Error::Decode {
                path: path.to_string(),
                message: format!("unexpected ping response: {}", body),
            });
        }
        Ok(())
    }

    fn send_update<B>(
        &self,
        ctx: &CallContext,
        collection: &str,
        id: &str,
        data: &B,
    ) -> Result<(String, String)>
    where
        B: Serialize + ?Sized,
    {
        require("collection", collection)?;
        require("id", id)?;
        let payload = payload(data)?;

        let path = resolve_path(collection, id);
        let body = self
            .transport
            .send(ctx, Method::Patch, &path, Some(&payload))?;
        Ok((path, body))
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation {
            message: format!("{} is required", name),
        });
    }
    Ok(())
}

fn payload<B: Serialize + ?Sized>(data: &B) -> Result<Value> {
    let value = serde_json::to_value(data)?;
    if value.is_null() {
        return Err(Error::Validation {
            message: "data is required".to_string(),
        });
    }
    Ok(value)
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
