//! Avalanche JSON-RPC API requests and responses.
pub mod avm;
pub mod platformvm;

#[cfg(feature = "jsonrpc_client")]
#[cfg_attr(docsrs, doc(cfg(feature = "jsonrpc_client")))]
pub mod client;

use std::collections::HashMap;

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_VERSION: &str = "2.0";
pub const DEFAULT_ID: u32 = 1;

/// ref. <https://www.jsonrpc.org/specification>
/// ref. <https://docs.avax.network/build/avalanchego-apis/issuing-api-calls>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone)]
pub struct Request {
    pub jsonrpc: String,
    pub id: u32,

    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            jsonrpc: String::from(DEFAULT_VERSION),
            id: DEFAULT_ID,
            method: String::new(),
            params: None,
        }
    }
}

impl Request {
    pub fn new(method: &str) -> Self {
        Self {
            method: String::from(method),
            ..Self::default()
        }
    }

    pub fn param(mut self, key: &str, value: serde_json::Value) -> Self {
        self.params
            .get_or_insert_with(HashMap::new)
            .insert(String::from(key), value);
        self
    }

    pub fn encode_json(&self) -> Result<String> {
        serde_json::to_string(&self).map_err(|e| Error::API {
            message: format!("failed to serialize JSON {e}"),
            retryable: false,
        })
    }
}

/// ref. <https://www.jsonrpc.org/specification#error_object>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct ResponseError {
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl ResponseError {
    /// Surfaces the node-side error verbatim.
    pub fn into_error(self) -> Error {
        Error::API {
            message: format!("server error (code {}): {}", self.code, self.message),
            retryable: false,
        }
    }
}

/// Transaction status reported by "getTxStatus".
/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgettxstatus>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Copy)]
pub enum Status {
    Accepted,
    Processing,
    Rejected,
    Dropped,
    Committed,
    Aborted,
    Unknown,
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown
    }
}

/// The pagination cursor of "getUTXOs".
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct EndIndex {
    pub address: String,
    pub utxo: String,
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- jsonrpc::test_request_encode --exact --show-output
#[test]
fn test_request_encode() {
    let req = Request::new("avm.getTxStatus").param("txID", serde_json::json!("abc"));
    let encoded = req.encode_json().unwrap();
    assert!(encoded.contains("\"jsonrpc\":\"2.0\""));
    assert!(encoded.contains("avm.getTxStatus"));
    assert!(encoded.contains("\"txID\":\"abc\""));
}
