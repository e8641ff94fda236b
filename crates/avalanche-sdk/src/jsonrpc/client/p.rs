//! Avalanche P-chain JSON-RPC client.
use crate::{
    errors::Result,
    jsonrpc::{self, client, platformvm},
};

/// e.g., "platform.issueTx" with the hex-with-checksum encoded signed bytes.
/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformissuetx>
pub async fn issue_tx(http_rpc: &str, tx_bytes_hex: &str) -> Result<platformvm::IssueTxResponse> {
    log::info!("issuing a P-chain transaction via {http_rpc}");
    let req = jsonrpc::Request::new("platform.issueTx")
        .param("tx", serde_json::json!(format!("0x{tx_bytes_hex}")))
        .param("encoding", serde_json::json!("hex"));
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgettxstatus>
pub async fn get_tx_status(
    http_rpc: &str,
    tx_id: &str,
) -> Result<platformvm::GetTxStatusResponse> {
    let req = jsonrpc::Request::new("platform.getTxStatus").param("txID", serde_json::json!(tx_id));
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetbalance>
pub async fn get_balance(http_rpc: &str, paddr: &str) -> Result<platformvm::GetBalanceResponse> {
    let req = jsonrpc::Request::new("platform.getBalance")
        .param("addresses", serde_json::json!([paddr]));
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}

/// Fetches this chain's UTXOs for the addresses.
/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetutxos>
pub async fn get_utxos(http_rpc: &str, paddrs: &[String]) -> Result<platformvm::GetUtxosResponse> {
    let req = jsonrpc::Request::new("platform.getUTXOs")
        .param("addresses", serde_json::json!(paddrs))
        .param("limit", serde_json::json!(1024))
        .param("encoding", serde_json::json!("hex"));
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}

/// Fetches the atomic UTXOs exported to this chain by "source_chain".
pub async fn get_atomic_utxos(
    http_rpc: &str,
    paddrs: &[String],
    source_chain: &str,
) -> Result<platformvm::GetUtxosResponse> {
    let req = jsonrpc::Request::new("platform.getUTXOs")
        .param("addresses", serde_json::json!(paddrs))
        .param("sourceChain", serde_json::json!(source_chain))
        .param("limit", serde_json::json!(1024))
        .param("encoding", serde_json::json!("hex"));
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetstakingassetid>
pub async fn get_staking_asset_id(
    http_rpc: &str,
) -> Result<platformvm::GetStakingAssetIdResponse> {
    let req = jsonrpc::Request::new("platform.getStakingAssetID");
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetheight>
pub async fn get_height(http_rpc: &str) -> Result<platformvm::GetHeightResponse> {
    let req = jsonrpc::Request::new("platform.getHeight");
    client::post_json(http_rpc, client::P_CHAIN_PATH, req.encode_json()?).await
}
