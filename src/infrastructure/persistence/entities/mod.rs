pub mod blocks;
pub mod conflict_responses;
pub mod conflict_votes;
pub mod consumers;
pub mod events;
pub mod plans;
pub mod provider_latest_block_reports;
pub mod provider_stakes;
pub mod providers;
pub mod relay_payments;
pub mod specs;
pub mod subscription_buys;
