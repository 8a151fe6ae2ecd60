//! Lava node client over CometBFT JSON-RPC and the Cosmos REST gateway

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::client::ChainClient;
use super::error::ChainClientError;
use super::types::{
    AbciEvent, BlockResult, BlockResultsResult, PlansListResponse, ProvidersResponse,
    RpcResponse, ShowAllChainsResponse, StakeEntry, StatusResult, TxSearchResult,
};
use crate::config::LavaConfig;
use crate::domain::models::{ChainMetadata, Plan, ProviderStake, RawBlock, RawEvent};
use crate::utils::logging;

const TX_SEARCH_PAGE_SIZE: usize = 100;
const METADATA_CONCURRENCY: usize = 4;
const NATIVE_DENOM: &str = "ulava";

#[derive(Debug)]
pub struct LavaRpcClient {
    rpc_url: String,
    rest_url: String,
    client: Client,
}

impl LavaRpcClient {
    pub fn new(config: &LavaConfig) -> Result<Self, ChainClientError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            rpc_url: config.rpc_url.trim_end_matches('/').to_string(),
            rest_url: config.rest_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Make a JSON-RPC call to the node
    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainClientError> {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        // Error objects may come back with a non-2xx status, so the body is read first
        let response_text = self
            .client
            .post(&self.rpc_url)
            .json(&request_body)
            .send()
            .await?
            .text()
            .await?;

        let response: RpcResponse<T> = serde_json::from_str(&response_text)?;

        if let Some(error) = response.error {
            return Err(ChainClientError::RpcError(format!(
                "{} failed ({}): {} {}",
                method,
                error.code,
                error.message,
                error.data.unwrap_or_default()
            )));
        }

        response
            .result
            .ok_or_else(|| ChainClientError::ParseError(format!("No result in {} response", method)))
    }

    async fn rest_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChainClientError> {
        let url = format!("{}{}", self.rest_url, path);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn block_timestamp(&self, height: u64) -> Result<DateTime<Utc>, ChainClientError> {
        let result: BlockResult = self
            .rpc_call("block", json!({ "height": height.to_string() }))
            .await?;

        let header = result.block.header;
        if header.height != height.to_string() {
            return Err(ChainClientError::ParseError(format!(
                "requested block {} but node returned {}",
                height, header.height
            )));
        }

        DateTime::parse_from_rfc3339(&header.time)
            .map(|time| time.with_timezone(&Utc))
            .map_err(|e| {
                ChainClientError::ParseError(format!("bad block time {:?}: {}", header.time, e))
            })
    }

    async fn transaction_events(&self, height: u64) -> Result<Vec<RawEvent>, ChainClientError> {
        let mut events = Vec::new();
        let mut seen = 0usize;
        let mut page = 1usize;

        loop {
            let result: TxSearchResult = self
                .rpc_call(
                    "tx_search",
                    json!({
                        "query": format!("tx.height={}", height),
                        "prove": false,
                        "page": page.to_string(),
                        "per_page": TX_SEARCH_PAGE_SIZE.to_string(),
                        "order_by": "asc"
                    }),
                )
                .await?;

            let total: usize = result.total_count.parse().map_err(|_| {
                ChainClientError::ParseError(format!("bad total_count {:?}", result.total_count))
            })?;

            let page_len = result.txs.len();
            seen += page_len;

            for tx in result.txs {
                // Failed transactions changed no state
                if tx.tx_result.code != 0 {
                    continue;
                }
                events.extend(
                    tx.tx_result
                        .events
                        .into_iter()
                        .map(|event| to_raw_event(event, Some(tx.hash.clone()))),
                );
            }

            if page_len == 0 || seen >= total {
                break;
            }
            page += 1;
        }

        Ok(events)
    }

    async fn block_events(&self, height: u64) -> Result<Vec<RawEvent>, ChainClientError> {
        let result: BlockResultsResult = self
            .rpc_call("block_results", json!({ "height": height.to_string() }))
            .await?;

        Ok(result
            .begin_block_events
            .into_iter()
            .flatten()
            .chain(result.end_block_events.into_iter().flatten())
            .chain(result.finalize_block_events.into_iter().flatten())
            .map(|event| to_raw_event(event, None))
            .collect())
    }

    async fn chain_providers(&self, chain_id: &str) -> Result<Vec<ProviderStake>, ChainClientError> {
        let response: ProvidersResponse = self
            .rest_get(&format!(
                "/lavanet/lava/pairing/providers/{}?showFrozen=true",
                chain_id
            ))
            .await?;

        Ok(response
            .stake_entry
            .into_iter()
            .map(|entry| to_provider_stake(entry, chain_id))
            .collect())
    }
}

fn to_raw_event(event: AbciEvent, tx_hash: Option<String>) -> RawEvent {
    RawEvent {
        type_tag: event.kind,
        attributes: event
            .attributes
            .into_iter()
            .map(|attr| (attr.key, attr.value.unwrap_or_default()))
            .collect(),
        tx_hash,
    }
}

fn to_provider_stake(entry: StakeEntry, chain_id: &str) -> ProviderStake {
    let moniker = entry
        .description
        .and_then(|d| d.moniker)
        .filter(|m| !m.is_empty())
        .or(entry.moniker)
        .unwrap_or_default();

    let stake = entry
        .stake
        .filter(|coin| coin.denom == NATIVE_DENOM)
        .and_then(|coin| coin.amount.parse::<i64>().ok());

    ProviderStake {
        provider: entry.address,
        moniker,
        spec: entry.chain.unwrap_or_else(|| chain_id.to_string()),
        stake,
    }
}

#[async_trait]
impl ChainClient for LavaRpcClient {
    fn client_name(&self) -> String {
        format!("Lava RPC ({})", self.rpc_url)
    }

    async fn current_height(&self) -> Result<u64, ChainClientError> {
        let status: StatusResult = self.rpc_call("status", json!({})).await?;
        status
            .sync_info
            .latest_block_height
            .parse::<u64>()
            .map_err(|_| {
                ChainClientError::ParseError(format!(
                    "Invalid latest block height {:?}",
                    status.sync_info.latest_block_height
                ))
            })
    }

    async fn fetch_block(&self, height: u64) -> Result<RawBlock, ChainClientError> {
        let timestamp = self.block_timestamp(height).await?;

        let mut events = self.transaction_events(height).await?;
        events.extend(self.block_events(height).await?);

        Ok(RawBlock {
            height,
            timestamp,
            events,
        })
    }

    async fn fetch_chain_metadata(&self) -> Result<ChainMetadata, ChainClientError> {
        let chains: ShowAllChainsResponse =
            self.rest_get("/lavanet/lava/spec/show_all_chains").await?;
        let specs: Vec<String> = chains
            .chain_info_list
            .into_iter()
            .map(|chain| chain.chain_id)
            .collect();

        let provider_stakes: Vec<ProviderStake> = stream::iter(specs.clone())
            .map(|chain_id| async move { self.chain_providers(&chain_id).await })
            .buffered(METADATA_CONCURRENCY)
            .try_concat()
            .await?;

        let listed: PlansListResponse = self.rest_get("/lavanet/lava/plans/list").await?;
        let mut plans = Vec::with_capacity(listed.plans_info.len());
        for plan in listed.plans_info {
            let price = plan
                .price
                .as_ref()
                .filter(|coin| coin.denom == NATIVE_DENOM)
                .and_then(|coin| coin.amount.parse::<i64>().ok());

            match price {
                Some(price) => plans.push(Plan {
                    id: plan.index,
                    description: plan.description,
                    price,
                }),
                None => logging::log_warning(&format!(
                    "[metadata] skipping plan {} with unusable price {:?}",
                    plan.index, plan.price
                )),
            }
        }

        Ok(ChainMetadata {
            specs,
            provider_stakes,
            plans,
        })
    }
}
