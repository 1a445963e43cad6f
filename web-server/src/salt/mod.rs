// web-server/src/salt/mod.rs
//! Upstream side of the gateway: everything that talks to salt-api.
pub mod client;
pub mod commands;
pub mod demo;
pub mod error;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

pub use client::SaltClient;
pub use commands::{ClientKind, Command, Dispatch, Request, Verb};
pub use error::UpstreamError;

/// Transport to salt-api. Routers only ever go through `run`; fakes in
/// tests implement `call`.
#[async_trait]
pub trait SaltApi: Send + Sync {
    /// Authenticated request against the salt-api base url
    async fn call(&self, method: Method, path: &str, payload: Option<Value>) -> Result<Value, UpstreamError>;

    async fn run(&self, command: Command) -> Result<Value, UpstreamError> {
        let request = command.request()?;
        self.call(request.method, &request.path, request.payload).await
    }
}

/// First element of salt-api's `{"return": [...]}` envelope, `Null` when absent
pub fn first_return(response: &Value) -> &Value {
    response
        .get("return")
        .and_then(|r| r.get(0))
        .unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_return() {
        let response = json!({"return": [{"minion-1": true}]});
        assert_eq!(first_return(&response), &json!({"minion-1": true}));
        assert!(first_return(&json!({"return": []})).is_null());
        assert!(first_return(&json!({})).is_null());
    }
}
