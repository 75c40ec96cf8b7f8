pub mod methods;

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::{ChinchillaError, Result};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP client wrapper for a wallet's JSON-RPC endpoint.
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for `url`.
    ///
    /// # Errors
    ///
    /// Returns `ChinchillaError::Validation` if `url` is not an absolute URL.
    pub fn new(url: &str) -> Result<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| ChinchillaError::Validation(format!("invalid RPC URL {url}: {e}")))?;

        Ok(Self {
            client: Client::new(),
            url: parsed.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue a JSON-RPC call and decode its `result`.
    ///
    /// A `null` result is handed to the decoder as-is, so methods that may
    /// return nothing should be called with an `Option<T>` result type.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        trace!(id, method, "rpc request");
        let resp = self.client.post(&self.url).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ChinchillaError::Http {
                status,
                message: body,
            });
        }

        let envelope: RpcResponse = resp.json().await?;
        if let Some(err) = envelope.error {
            return Err(ChinchillaError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(serde_json::from_value(envelope.result)?)
    }

    /// Get the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_relative_url() {
        let err = RpcClient::new("not a url").unwrap_err();
        assert!(matches!(err, ChinchillaError::Validation(_)));
    }

    #[test]
    fn test_new_accepts_local_wallet_url() {
        let client = RpcClient::new("http://127.0.0.1:1248").unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:1248/");
    }

    #[test]
    fn test_request_envelope_shape() {
        let req = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_requestAccounts",
            params: [(); 0],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "eth_requestAccounts");
        assert_eq!(json["params"], serde_json::json!([]));
    }

    #[test]
    fn test_response_with_null_result() {
        let resp: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(resp.error.is_none());
        let decoded: Option<String> = serde_json::from_value(resp.result).unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn test_response_with_error_object() {
        let resp: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        )
        .unwrap();
        let err = resp.error.unwrap();
        assert_eq!(err.code, 4001);
        assert_eq!(err.message, "User rejected the request.");
    }
}
