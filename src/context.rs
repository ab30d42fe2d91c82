//! Per-call cancellation and deadlines.
//!
//! Every public operation takes a `CallContext`. The transport consults it
//! before each request, races the request against the cancellation token,
//! and bounds the request timeout by the remaining deadline, so a caller can
//! abort a slow apply without leaking requests.

use std::time::{Duration, Instant};

pub use tokio_util::sync::CancellationToken;

use crate::client::Method;
use crate::error::{Error, Result};

/// Deadline and cancellation signal for one operation
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

impl CallContext {
    /// A context with no deadline that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    /// Deadline `timeout` from now. A timeout too large to represent as an
    /// `Instant` leaves the context without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Resolves once the token is cancelled; never resolves without a token.
    pub async fn cancelled(&self) {
        match &self.token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Timeout for the next request given the transport's configured one.
    pub fn request_timeout(&self, configured: Duration) -> Duration {
        match self.remaining() {
            Some(remaining) => remaining.min(configured),
            None => configured,
        }
    }

    /// Fail fast if the call must not be sent.
    pub fn check(&self, method: Method, path: &str) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled {
                method,
                path: path.to_string(),
            });
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(Error::DeadlineExceeded {
                method,
                path: path.to_string(),
            });
        }
        Ok(())
    }
}
