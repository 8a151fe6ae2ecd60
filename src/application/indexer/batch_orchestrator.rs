//! Catch-up over a height range with bounded concurrency
//!
//! Heights are taken in chunks. Within a chunk up to `concurrency` heights are
//! fetched, assembled and committed at once, in any order. Heights that fail are
//! put back at the front of the queue once the chunk is done, so a run only ends
//! when every height in the range is committed.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use super::committer::BlockCommitter;
use super::retry_handler::RetryHandler;
use crate::config::IndexerConfig;
use crate::domain::errors::IndexerError;
use crate::domain::services::{BlockAssembler, DimensionCache};
use crate::infrastructure::lava::ChainClient;
use crate::infrastructure::persistence::BlockStore;
use crate::utils::logging;

/// What happened to a single height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightOutcome {
    Committed,
    /// Already in the store
    Skipped,
}

/// Totals for one catch-up run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatchUpReport {
    pub committed: u64,
    pub skipped: u64,
    /// Failed attempts across all heights; each one was retried
    pub failed_attempts: u64,
    pub elapsed: Duration,
}

pub struct BatchOrchestrator {
    chain: Arc<dyn ChainClient>,
    store: Arc<dyn BlockStore>,
    assembler: BlockAssembler,
    committer: BlockCommitter,
    retry_handler: RetryHandler,
    chunk_size: usize,
    concurrency: usize,
    warn_after_attempts: u32,
}

impl BatchOrchestrator {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        store: Arc<dyn BlockStore>,
        cache: Arc<DimensionCache>,
        config: &IndexerConfig,
    ) -> Self {
        Self {
            assembler: BlockAssembler::new(cache.clone()),
            committer: BlockCommitter::new(store.clone(), cache),
            chain,
            store,
            retry_handler: RetryHandler::from_indexer_config(config),
            chunk_size: config.chunk_size.max(1),
            concurrency: config.concurrency.max(1),
            warn_after_attempts: config.retry_warn_attempts,
        }
    }

    /// Ingests every height in `[from, to]`; returns once all of them are stored
    pub async fn run_catch_up(&self, from: u64, to: u64) -> CatchUpReport {
        let mut report = CatchUpReport::default();
        if from > to {
            return report;
        }

        let total = to - from + 1;
        let started = Instant::now();
        let mut retry_queue: VecDeque<u64> = VecDeque::new();
        let mut next_height = from;
        let mut attempts: HashMap<u64, u32> = HashMap::new();
        let mut failing_chunks = 0u32;

        logging::log_info(&format!(
            "[catch-up] {} → {} ({} blocks, chunks of {}, concurrency {})",
            from, to, total, self.chunk_size, self.concurrency
        ));

        loop {
            let mut chunk = Vec::with_capacity(self.chunk_size);
            while chunk.len() < self.chunk_size {
                if let Some(height) = retry_queue.pop_front() {
                    chunk.push(height);
                } else if next_height <= to {
                    chunk.push(next_height);
                    next_height += 1;
                } else {
                    break;
                }
            }
            if chunk.is_empty() {
                break;
            }

            let chunk_started = Instant::now();
            let chunk_len = chunk.len();
            let results: Vec<(u64, Result<HeightOutcome, IndexerError>)> =
                stream::iter(chunk)
                    .map(|height| async move { (height, self.process_height(height).await) })
                    .buffer_unordered(self.concurrency)
                    .collect()
                    .await;

            let mut failed = Vec::new();
            for (height, result) in results {
                match result {
                    Ok(HeightOutcome::Committed) => report.committed += 1,
                    Ok(HeightOutcome::Skipped) => report.skipped += 1,
                    Err(e) => {
                        report.failed_attempts += 1;
                        let count = attempts.entry(height).or_insert(0);
                        *count += 1;
                        let message =
                            format!("[block {}] attempt {} failed: {}", height, count, e);
                        if *count >= self.warn_after_attempts {
                            logging::log_warning(&message);
                        } else {
                            logging::log_info(&message);
                        }
                        failed.push(height);
                    }
                }
            }

            failed.sort_unstable();
            for height in failed.iter().rev() {
                retry_queue.push_front(*height);
            }

            let done = report.committed + report.skipped;
            let elapsed = started.elapsed().as_secs_f64().max(0.001);
            let rate = done as f64 / elapsed;
            let remaining = total.saturating_sub(done);
            let eta = if rate > 0.0 {
                format!("{:.0}s", remaining as f64 / rate)
            } else {
                "unknown".to_string()
            };
            logging::log_info(&format!(
                "[catch-up] chunk of {} in {:.1}s, {} errors | {}/{} done | {:.1} blocks/s | ~{} remaining",
                chunk_len,
                chunk_started.elapsed().as_secs_f64(),
                failed.len(),
                done,
                total,
                rate,
                eta
            ));

            if failed.is_empty() {
                failing_chunks = 0;
            } else {
                failing_chunks += 1;
                let delay = self.retry_handler.delay_for(failing_chunks);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        report.elapsed = started.elapsed();
        logging::log_info(&format!(
            "[catch-up] ✓ {} committed, {} already stored, {} retried attempts in {:.1}s",
            report.committed,
            report.skipped,
            report.failed_attempts,
            report.elapsed.as_secs_f64()
        ));
        report
    }

    /// Fetch, assemble and commit one height unless it is already stored
    pub async fn process_height(&self, height: u64) -> Result<HeightOutcome, IndexerError> {
        if self.store.has_block(height).await? {
            return Ok(HeightOutcome::Skipped);
        }

        let raw = self.chain.fetch_block(height).await?;
        if raw.height != height {
            return Err(IndexerError::ProcessingError(format!(
                "asked {} for block {} but got {}",
                self.chain.client_name(),
                height,
                raw.height
            )));
        }

        let assembled = self.assembler.assemble(&raw)?;
        self.committer.commit(&assembled).await?;
        Ok(HeightOutcome::Committed)
    }
}
