//! WapiTransport trait for mocking
//!
//! This trait abstracts the authenticated HTTP executor so the resource
//! modules can be unit tested against an in-memory implementation.

use crate::common::WapiRequest;
use crate::error::WapiResult;
use serde_json::Value;

/// Executes one authenticated WAPI call
///
/// Implementations make exactly one attempt per call. Success yields the
/// decoded JSON body unchanged (object, array or bare reference string).
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait WapiTransport: Send + Sync {
    async fn execute(&self, request: WapiRequest) -> WapiResult<Value>;
}
