use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::{ChainError, Result};
use crate::units::parse_quantity;

/// Minimal async JSON-RPC 2.0 client for an EVM endpoint.
#[derive(Debug)]
pub struct RpcClient {
    http: Client,
    url: Url,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url = validate_rpc_url(url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issues a single call and deserializes its `result`. No retries.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!(method, url = %self.url, "JSON-RPC call");

        let response: RpcResponse = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = response
            .result
            .ok_or_else(|| ChainError::InvalidResponse(format!("{method} returned no result")))?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::InvalidResponse(format!("{method}: {e}")))
    }

    /// `eth_call` against the latest block, returning the raw hex return data.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String> {
        self.call("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    /// Native balance in wei.
    pub async fn get_balance(&self, address: &str) -> Result<u128> {
        let hex: String = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&hex)
    }

    pub async fn chain_id(&self) -> Result<u64> {
        let hex: String = self.call("eth_chainId", json!([])).await?;
        let id = parse_quantity(&hex)?;
        u64::try_from(id).map_err(|_| ChainError::Overflow(hex))
    }
}

fn validate_rpc_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| ChainError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ChainError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
