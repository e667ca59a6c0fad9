//! Mock WapiTransport for unit testing
//!
//! Records every request it receives and replays queued responses in order,
//! so resource modules can be tested without a grid master.

use crate::common::WapiRequest;
use crate::error::{WapiError, WapiResult};
use crate::transport_trait::WapiTransport;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

enum Reply {
    Ok(Value),
    Err { status: u16, message: String },
}

/// Mock transport for testing
///
/// When the reply queue is empty the mock answers with an empty JSON array,
/// which is what the WAPI returns for a search without matches.
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<WapiRequest>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &lock(&self.requests).len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn push_ok(&self, value: Value) {
        lock(&self.replies).push_back(Reply::Ok(value));
    }

    /// Queue a remote rejection
    pub fn push_err(&self, status: u16, message: impl Into<String>) {
        lock(&self.replies).push_back(Reply::Err {
            status,
            message: message.into(),
        });
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<WapiRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<WapiRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Relative URI (path, filters and directives) of the latest request
    pub fn last_uri(&self) -> Option<String> {
        self.last_request().map(|r| r.uri())
    }
}

#[async_trait::async_trait]
impl WapiTransport for MockTransport {
    async fn execute(&self, request: WapiRequest) -> WapiResult<Value> {
        lock(&self.requests).push(request);
        match lock(&self.replies).pop_front() {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Err { status, message }) => Err(WapiError::Remote { status, message }),
            None => Ok(Value::Array(Vec::new())),
        }
    }
}
