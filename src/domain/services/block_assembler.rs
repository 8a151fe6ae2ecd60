use std::sync::Arc;

use crate::domain::errors::IndexerError;
use crate::domain::models::{
    BlockRecord, ConflictResponseRow, ConflictVoteRow, EventRow, EventType, LavaEvent,
    ProviderBlockReportRow, RawBlock, RelayPaymentRow, StakeEvent, SubscriptionBuyRow,
    VoteOutcomeEvent,
};
use crate::domain::services::dimension_cache::{BlockDimensions, DimensionCache};
use crate::domain::services::event_parser::{parse_event, ParseOutcome};
use crate::utils::logging;

/// Per-block parse counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
    pub accepted: usize,
    pub rejected: usize,
    pub ignored: usize,
}

/// Everything one block writes, ready for a single transaction
#[derive(Debug, Clone)]
pub struct AssembledBlock {
    pub block: BlockRecord,
    pub events: Vec<EventRow>,
    pub relay_payments: Vec<RelayPaymentRow>,
    pub conflict_responses: Vec<ConflictResponseRow>,
    pub conflict_votes: Vec<ConflictVoteRow>,
    pub subscription_buys: Vec<SubscriptionBuyRow>,
    pub block_reports: Vec<ProviderBlockReportRow>,
    /// Dimension rows the store may not have yet
    pub dimensions: BlockDimensions,
    pub stats: AssemblyStats,
}

impl AssembledBlock {
    fn empty(block: BlockRecord) -> Self {
        Self {
            block,
            events: Vec::new(),
            relay_payments: Vec::new(),
            conflict_responses: Vec::new(),
            conflict_votes: Vec::new(),
            subscription_buys: Vec::new(),
            block_reports: Vec::new(),
            dimensions: BlockDimensions::new(),
            stats: AssemblyStats::default(),
        }
    }

    pub fn height(&self) -> u64 {
        self.block.height
    }

    /// Number of fact rows across all tables
    pub fn fact_count(&self) -> usize {
        self.events.len()
            + self.relay_payments.len()
            + self.conflict_responses.len()
            + self.conflict_votes.len()
            + self.subscription_buys.len()
            + self.block_reports.len()
    }
}

/// Turns raw blocks into row batches; performs no I/O
pub struct BlockAssembler {
    cache: Arc<DimensionCache>,
}

impl BlockAssembler {
    pub fn new(cache: Arc<DimensionCache>) -> Self {
        Self { cache }
    }

    pub fn assemble(&self, raw: &RawBlock) -> Result<AssembledBlock, IndexerError> {
        let block_id = i64::try_from(raw.height).map_err(|_| {
            IndexerError::ProcessingError(format!("height {} does not fit the store", raw.height))
        })?;

        let mut assembled = AssembledBlock::empty(BlockRecord {
            height: raw.height,
            timestamp: raw.timestamp,
        });

        for event in &raw.events {
            match parse_event(event) {
                ParseOutcome::Accepted(parsed) => {
                    assembled.stats.accepted += 1;
                    self.route(&mut assembled, block_id, event.tx_hash.clone(), parsed);
                }
                ParseOutcome::Rejected(reason) => {
                    assembled.stats.rejected += 1;
                    logging::log_warning(&format!(
                        "[block {}] dropped {} event{}: {}",
                        raw.height,
                        event.type_tag,
                        event
                            .tx_hash
                            .as_deref()
                            .map(|tx| format!(" in tx {}", tx))
                            .unwrap_or_default(),
                        reason
                    ));
                }
                ParseOutcome::Ignored => assembled.stats.ignored += 1,
            }
        }

        logging::log_debug(&format!(
            "[block {}] assembled: {} accepted, {} rejected, {} ignored, {} fact rows",
            raw.height,
            assembled.stats.accepted,
            assembled.stats.rejected,
            assembled.stats.ignored,
            assembled.fact_count()
        ));

        Ok(assembled)
    }

    fn route(&self, out: &mut AssembledBlock, block_id: i64, tx: Option<String>, event: LavaEvent) {
        let cache = self.cache.as_ref();
        let dims = &mut out.dimensions;

        match event {
            LavaEvent::StakeNewProvider(stake) => {
                out.events.push(stake_row(
                    dims,
                    cache,
                    block_id,
                    tx,
                    EventType::StakeNewProvider,
                    stake,
                ));
            }
            LavaEvent::StakeUpdateProvider(stake) => {
                out.events.push(stake_row(
                    dims,
                    cache,
                    block_id,
                    tx,
                    EventType::StakeUpdateProvider,
                    stake,
                ));
            }
            LavaEvent::ProviderUnstakeCommit(unstake) => {
                dims.get_or_create_provider(cache, &unstake.provider, &unstake.moniker);
                dims.get_or_create_spec(cache, &unstake.chain_id);

                let mut row = EventRow::new(block_id, tx, EventType::ProviderUnstakeCommit);
                row.provider = Some(unstake.provider);
                row.t1 = Some(unstake.chain_id);
                row.b1 = unstake.stake;
                out.events.push(row);
            }
            LavaEvent::FreezeProvider(freeze) => {
                dims.get_or_create_provider(cache, &freeze.provider, "");
                for chain_id in &freeze.chain_ids {
                    dims.get_or_create_spec(cache, chain_id);
                }

                let mut row = EventRow::new(block_id, tx, EventType::FreezeProvider);
                row.provider = Some(freeze.provider);
                row.t1 = Some(freeze.chain_ids.join(","));
                row.t2 = freeze.reason;
                row.i1 = freeze.request_block;
                out.events.push(row);
            }
            LavaEvent::UnfreezeProvider(unfreeze) => {
                dims.get_or_create_provider(cache, &unfreeze.provider, "");
                for chain_id in &unfreeze.chain_ids {
                    dims.get_or_create_spec(cache, chain_id);
                }

                let mut row = EventRow::new(block_id, tx, EventType::UnfreezeProvider);
                row.provider = Some(unfreeze.provider);
                row.t1 = Some(unfreeze.chain_ids.join(","));
                row.i1 = unfreeze.unfreeze_block;
                out.events.push(row);
            }
            LavaEvent::RelayPayment(payment) => {
                dims.get_or_create_provider(cache, &payment.provider, "");
                dims.get_or_create_consumer(cache, &payment.consumer);
                dims.get_or_create_spec(cache, &payment.spec_id);
                out.relay_payments.push(RelayPaymentRow {
                    block_id,
                    tx,
                    payment,
                });
            }
            LavaEvent::SubscriptionBuy(purchase) => {
                dims.get_or_create_consumer(cache, &purchase.consumer);
                dims.get_or_create_plan(cache, &purchase.plan);
                out.subscription_buys.push(SubscriptionBuyRow {
                    block_id,
                    tx,
                    purchase,
                });
            }
            LavaEvent::ConflictResponse(response) => {
                dims.get_or_create_consumer(cache, &response.consumer);
                dims.get_or_create_spec(cache, &response.spec_id);
                out.conflict_responses.push(ConflictResponseRow {
                    block_id,
                    tx,
                    response,
                });
            }
            LavaEvent::ConflictVoteCommit(vote) => {
                dims.get_or_create_provider(cache, &vote.provider, "");
                out.conflict_votes.push(ConflictVoteRow { block_id, tx, vote });
            }
            LavaEvent::VoteResolved(outcome) => {
                if let Some(winner) = &outcome.winner {
                    dims.get_or_create_provider(cache, winner, "");
                }
                out.events.push(vote_row(
                    block_id,
                    tx,
                    EventType::DetectionVoteResolved,
                    outcome,
                ));
            }
            LavaEvent::VoteUnresolved(outcome) => {
                out.events.push(vote_row(
                    block_id,
                    tx,
                    EventType::DetectionVoteUnresolved,
                    outcome,
                ));
            }
            LavaEvent::ProviderBlockReport(report) => {
                dims.get_or_create_provider(cache, &report.provider, "");
                let timestamp = out.block.timestamp;
                for (chain_id, height) in report.chain_heights {
                    out.block_reports.push(ProviderBlockReportRow {
                        block_id,
                        tx: tx.clone(),
                        provider: report.provider.clone(),
                        timestamp,
                        chain_id,
                        chain_block_height: height,
                    });
                }
            }
        }
    }
}

fn stake_row(
    dims: &mut BlockDimensions,
    cache: &DimensionCache,
    block_id: i64,
    tx: Option<String>,
    event_type: EventType,
    stake: StakeEvent,
) -> EventRow {
    dims.get_or_create_provider(cache, &stake.provider, &stake.moniker);
    dims.get_or_create_spec(cache, &stake.spec);

    let mut row = EventRow::new(block_id, tx, event_type);
    row.provider = Some(stake.provider);
    row.t1 = Some(stake.spec);
    row.i1 = stake.stake_applied_block;
    row.b1 = stake.stake;
    row
}

fn vote_row(
    block_id: i64,
    tx: Option<String>,
    event_type: EventType,
    outcome: VoteOutcomeEvent,
) -> EventRow {
    let mut row = EventRow::new(block_id, tx, event_type);
    row.provider = outcome.winner;
    row.t1 = outcome.vote_id;
    row.i1 = outcome.no_voters;
    row.i2 = outcome.voters;
    row.b1 = outcome.reward_pool;
    row.b2 = outcome.total_votes;
    row
}
