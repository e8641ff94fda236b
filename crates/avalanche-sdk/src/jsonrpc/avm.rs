//! AVM (X-chain) JSON-RPC API payloads.
use crate::{ids, jsonrpc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmissuetx>
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

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgettxstatus>
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

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgetutxos>
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

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgetbalance>
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
    /// Big integers ride the wire as decimal strings.
    #[serde_as(as = "DisplayFromStr")]
    pub balance: u64,
}

/// ref. <https://docs.avax.network/apis/avalanchego/apis/x-chain#avmgetassetdescription>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetAssetDescriptionResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GetAssetDescriptionResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<jsonrpc::ResponseError>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct GetAssetDescriptionResult {
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub denomination: u8,
}

/// RUST_LOG=debug cargo test --package avalanche-sdk --lib -- jsonrpc::avm::test_responses --exact --show-output
#[test]
fn test_responses() {
    use std::str::FromStr;

    let resp: IssueTxResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"txID\": \"G3BuH6ytQ2averrLxJJugjWZHTRubzCrUZEXoheG5JMqL5ccY\"}, \"id\": 1}",
    )
    .unwrap();
    assert_eq!(
        resp.result.unwrap().tx_id,
        ids::Id::from_str("G3BuH6ytQ2averrLxJJugjWZHTRubzCrUZEXoheG5JMqL5ccY").unwrap()
    );

    let resp: GetTxStatusResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"status\": \"Accepted\"}, \"id\": 1}",
    )
    .unwrap();
    assert_eq!(resp.result.unwrap().status, jsonrpc::Status::Accepted);

    let resp: GetBalanceResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"balance\": \"299999999999900\"}, \"id\": 1}",
    )
    .unwrap();
    assert_eq!(resp.result.unwrap().balance, 299999999999900);

    let resp: GetAssetDescriptionResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"result\": {\"assetID\": \"G3BuH6ytQ2averrLxJJugjWZHTRubzCrUZEXoheG5JMqL5ccY\", \"name\": \"Avalanche\", \"symbol\": \"AVAX\", \"denomination\": \"9\"}, \"id\": 1}",
    )
    .unwrap();
    let result = resp.result.unwrap();
    assert_eq!(result.symbol, "AVAX");
    assert_eq!(result.denomination, 9);

    let resp: IssueTxResponse = serde_json::from_str(
        "{\"jsonrpc\": \"2.0\", \"error\": {\"code\": -32000, \"message\": \"problem issuing transaction\"}, \"id\": 1}",
    )
    .unwrap();
    let err = resp.error.unwrap().into_error();
    assert!(err.contains("problem issuing transaction"));
    assert!(!err.retryable());
}
