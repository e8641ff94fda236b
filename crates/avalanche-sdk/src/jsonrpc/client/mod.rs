//! Thin JSON-RPC HTTP client for the X and P chains.
pub mod p;
pub mod x;

use std::time::Duration;

use crate::errors::{Error, Result};
use reqwest::{header::CONTENT_TYPE, ClientBuilder};
use serde::de::DeserializeOwned;

/// The X-chain RPC endpoint path.
pub const X_CHAIN_PATH: &str = "/ext/bc/X";
/// The P-chain RPC endpoint path.
pub const P_CHAIN_PATH: &str = "/ext/bc/P";

/// POSTs the JSON-RPC body to `{http_rpc}{path}` and decodes the response.
pub(crate) async fn post_json<T: DeserializeOwned>(
    http_rpc: &str,
    path: &str,
    body: String,
) -> Result<T> {
    let mut url = url::Url::parse(http_rpc).map_err(|e| Error::InvalidInput {
        message: format!("failed url::Url::parse '{e}'"),
    })?;
    url.set_path(path);
    log::debug!("posting to {url}");

    let req_cli_builder = ClientBuilder::new()
        .user_agent(env!("CARGO_PKG_NAME"))
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|e| Error::API {
            message: format!("failed reqwest::ClientBuilder.build '{e}'"),
            retryable: false,
        })?;
    let resp = req_cli_builder
        .post(url.to_string())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|e| Error::API {
            message: format!("failed reqwest::Client.send '{e}'"),
            retryable: true,
        })?;
    let out = resp.bytes().await.map_err(|e| Error::API {
        message: format!("failed reqwest response bytes '{e}'"),
        retryable: true,
    })?;
    let out: Vec<u8> = out.into();

    serde_json::from_slice(&out).map_err(|e| Error::API {
        message: format!("failed serde_json::from_slice '{e}'"),
        retryable: false,
    })
}
