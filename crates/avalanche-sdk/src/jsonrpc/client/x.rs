//! Avalanche X-chain JSON-RPC client.
use crate::{
    errors::Result,
    jsonrpc::{self, avm, client},
};

/// e.g., "avm.issueTx" with the hex-with-checksum encoded signed bytes.
/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmissuetx>
pub async fn issue_tx(http_rpc: &str, tx_bytes_hex: &str) -> Result<avm::IssueTxResponse> {
    log::info!("issuing an X-chain transaction via {http_rpc}");
    let req = jsonrpc::Request::new("avm.issueTx")
        .param("tx", serde_json::json!(format!("0x{tx_bytes_hex}")))
        .param("encoding", serde_json::json!("hex"));
    client::post_json(http_rpc, client::X_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgettxstatus>
pub async fn get_tx_status(http_rpc: &str, tx_id: &str) -> Result<avm::GetTxStatusResponse> {
    let req = jsonrpc::Request::new("avm.getTxStatus").param("txID", serde_json::json!(tx_id));
    client::post_json(http_rpc, client::X_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgetbalance>
pub async fn get_balance(http_rpc: &str, xaddr: &str, asset_id: &str) -> Result<avm::GetBalanceResponse> {
    let req = jsonrpc::Request::new("avm.getBalance")
        .param("address", serde_json::json!(xaddr))
        .param("assetID", serde_json::json!(asset_id));
    client::post_json(http_rpc, client::X_CHAIN_PATH, req.encode_json()?).await
}

/// Fetches this chain's UTXOs for the addresses.
/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgetutxos>
pub async fn get_utxos(http_rpc: &str, xaddrs: &[String]) -> Result<avm::GetUtxosResponse> {
    let req = jsonrpc::Request::new("avm.getUTXOs")
        .param("addresses", serde_json::json!(xaddrs))
        .param("limit", serde_json::json!(1024))
        .param("encoding", serde_json::json!("hex"));
    client::post_json(http_rpc, client::X_CHAIN_PATH, req.encode_json()?).await
}

/// Fetches the atomic UTXOs exported to this chain by "source_chain"
/// (a chain alias or chain ID).
pub async fn get_atomic_utxos(
    http_rpc: &str,
    xaddrs: &[String],
    source_chain: &str,
) -> Result<avm::GetUtxosResponse> {
    let req = jsonrpc::Request::new("avm.getUTXOs")
        .param("addresses", serde_json::json!(xaddrs))
        .param("sourceChain", serde_json::json!(source_chain))
        .param("limit", serde_json::json!(1024))
        .param("encoding", serde_json::json!("hex"));
    client::post_json(http_rpc, client::X_CHAIN_PATH, req.encode_json()?).await
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgetassetdescription>
pub async fn get_asset_description(
    http_rpc: &str,
    asset_alias_or_id: &str,
) -> Result<avm::GetAssetDescriptionResponse> {
    let req = jsonrpc::Request::new("avm.getAssetDescription")
        .param("assetID", serde_json::json!(asset_alias_or_id));
    client::post_json(http_rpc, client::X_CHAIN_PATH, req.encode_json()?).await
}
