//! PlatformVM (P-chain) JSON-RPC API payloads.
use crate::{ids, jsonrpc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformissuetx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct IssueTxResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<IssueTxResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct IssueTxResult {
    #[serde(rename = "txID")]
    pub tx_id: ids::Id,
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgettxstatus>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetTxStatusResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GetTxStatusResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetTxStatusResult {
    pub status: jsonrpc::Status,
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetutxos>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetUtxosResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GetUtxosResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetUtxosResult {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(rename = "numFetched", skip_serializing_if = "Option::is_none")]
    pub num_fetched: Option<u32>,

    /// Hex-with-checksum serialized UTXOs; decode with
    /// "txs::utxo_set::UtxoSet::parse_utxo".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utxos: Option<Vec<String>>,

    #[serde(rename = "endIndex", skip_serializing_if = "Option::is_none")]
    pub end_index: Option<jsonrpc::EndIndex>,

    #[serde(default)]
    pub encoding: String,
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetbalance>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetBalanceResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GetBalanceResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetBalanceResult {
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u64,
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetstakingassetid>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetStakingAssetIdResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GetStakingAssetIdResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetStakingAssetIdResult {
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/p-chain#platformgetheight>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetHeightResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GetHeightResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetHeightResult {
    #[serde_as(as = "DisplayFromStr")]
    pub height: u64,
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- jsonrpc::platformvm::test_responses --exact --show-output
#[test]
fn test_responses() {
    use std::str::FromStr;

    let resp: GetStakingAssetIdResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"assetID\": \"G3BuH6ytQ2averrLxJJugjWZHTRubzCrUZEXoheG5JMqL5ccY\"}, \"id\": 1}",
    )
    .unwrap();
    assert_eq!(
        resp.result.unwrap().asset_id,
        ids::Id::from_str("G3BuH6ytQ2averrLxJJugjWZHTRubzCrUZEXoheG5JMqL5ccY").unwrap()
    );

    let resp: GetHeightResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"height\": \"56\"}, \"id\": 1}",
    )
    .unwrap();
    assert_eq!(resp.result.unwrap().height, 56);

    let resp: GetTxStatusResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"status\": \"Committed\"}, \"id\": 1}",
    )
    .unwrap();
    assert_eq!(resp.result.unwrap().status, jsonrpc::Status::Committed);
}
