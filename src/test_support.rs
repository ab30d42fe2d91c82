//! In-memory `Transport` used by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::client::{api_error, Method, Transport};
use crate::context::CallContext;
use crate::error::Result;

/// A request the mock received
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock transport replaying queued responses in order
pub(crate) struct MockTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<(u16, String)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
        })
    }

    pub fn respond_json(&self, body: Value) -> &Self {
        self.respond(200, body.to_string())
    }

    pub fn respond_text(&self, body: &str) -> &Self {
        self.respond(200, body.to_string())
    }

    pub fn respond_error(&self, status: u16, code: &str, message: &str) -> &Self {
        let body = json!({"errors": [{"message": message, "extensions": {"code": code}}]});
        self.respond(status, body.to_string())
    }

    fn respond(&self, status: u16, body: String) -> &Self {
        self.responses.lock().unwrap().push_back((status, body));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Every call that is not a GET.
    pub fn writes(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method != Method::Get)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String> {
        ctx.check(method, path)?;

        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| (500, format!("no response queued for {} {}", method, path)));

        if status >= 400 {
            return Err(api_error(status, &body));
        }
        Ok(body)
    }
}
