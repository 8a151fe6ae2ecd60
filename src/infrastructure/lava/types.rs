//! Wire types for the CometBFT JSON-RPC and the Lava REST gateway

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusResult {
    pub sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
pub struct SyncInfo {
    pub latest_block_height: String,
}

#[derive(Debug, Deserialize)]
pub struct BlockResult {
    pub block: BlockBody,
}

#[derive(Debug, Deserialize)]
pub struct BlockBody {
    pub header: BlockHeader,
}

#[derive(Debug, Deserialize)]
pub struct BlockHeader {
    pub height: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct TxSearchResult {
    #[serde(default)]
    pub txs: Vec<TxResponse>,
    pub total_count: String,
}

#[derive(Debug, Deserialize)]
pub struct TxResponse {
    pub hash: String,
    pub tx_result: TxResult,
}

#[derive(Debug, Deserialize)]
pub struct TxResult {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub events: Vec<AbciEvent>,
}

#[derive(Debug, Deserialize)]
pub struct AbciEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<AbciAttribute>,
}

#[derive(Debug, Deserialize)]
pub struct AbciAttribute {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Event lists are `null` rather than empty on quiet blocks
#[derive(Debug, Deserialize)]
pub struct BlockResultsResult {
    #[serde(default)]
    pub begin_block_events: Option<Vec<AbciEvent>>,
    #[serde(default)]
    pub end_block_events: Option<Vec<AbciEvent>>,
    #[serde(default)]
    pub finalize_block_events: Option<Vec<AbciEvent>>,
}

#[derive(Debug, Deserialize)]
pub struct ShowAllChainsResponse {
    #[serde(rename = "chainInfoList", alias = "chain_info_list", default)]
    pub chain_info_list: Vec<ChainInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ChainInfo {
    #[serde(rename = "chainID", alias = "chain_id")]
    pub chain_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ProvidersResponse {
    #[serde(rename = "stakeEntry", alias = "stake_entry", default)]
    pub stake_entry: Vec<StakeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StakeEntry {
    pub address: String,
    #[serde(default)]
    pub moniker: Option<String>,
    #[serde(default)]
    pub description: Option<StakeDescription>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub stake: Option<Coin>,
}

#[derive(Debug, Deserialize)]
pub struct StakeDescription {
    #[serde(default)]
    pub moniker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct PlansListResponse {
    #[serde(rename = "plansInfo", alias = "plans_info", default)]
    pub plans_info: Vec<PlanInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PlanInfo {
    pub index: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<Coin>,
}
