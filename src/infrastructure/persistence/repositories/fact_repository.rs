//! Repository for the append-only fact tables

use sea_orm::{ActiveValue::NotSet, ConnectionTrait, EntityTrait, Set};

use super::dimension_repository::INSERT_CHUNK_SIZE;
use crate::domain::models::{
    ConflictResponseRow, ConflictVoteRow, EventRow, ProviderBlockReportRow, RelayPaymentRow,
    SubscriptionBuyRow,
};
use crate::domain::services::AssembledBlock;
use crate::infrastructure::persistence::entities::{
    conflict_responses, conflict_votes, events, provider_latest_block_reports, relay_payments,
    subscription_buys,
};
use crate::infrastructure::persistence::error::DbError;

/// Stateless writer; every call runs inside the caller's transaction
#[derive(Debug, Clone, Copy, Default)]
pub struct FactRepository;

impl FactRepository {
    /// Insert every fact batch of an assembled block
    pub async fn insert_all<C: ConnectionTrait>(
        db: &C,
        block: &AssembledBlock,
    ) -> Result<(), DbError> {
        Self::insert_events(db, &block.events).await?;
        Self::insert_relay_payments(db, &block.relay_payments).await?;
        Self::insert_conflict_responses(db, &block.conflict_responses).await?;
        Self::insert_conflict_votes(db, &block.conflict_votes).await?;
        Self::insert_subscription_buys(db, &block.subscription_buys).await?;
        Self::insert_block_reports(db, &block.block_reports).await?;
        Ok(())
    }

    async fn insert_events<C: ConnectionTrait>(db: &C, rows: &[EventRow]) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|r| events::ActiveModel {
                id: NotSet,
                block_id: Set(r.block_id),
                tx: Set(r.tx.clone()),
                event_type: Set(r.event_type.code()),
                provider: Set(r.provider.clone()),
                consumer: Set(r.consumer.clone()),
                t1: Set(r.t1.clone()),
                t2: Set(r.t2.clone()),
                i1: Set(r.i1),
                i2: Set(r.i2),
                b1: Set(r.b1),
                b2: Set(r.b2),
            });

            events::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_relay_payments<C: ConnectionTrait>(
        db: &C,
        rows: &[RelayPaymentRow],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|r| {
                let p = &r.payment;
                relay_payments::ActiveModel {
                    id: NotSet,
                    block_id: Set(r.block_id),
                    tx: Set(r.tx.clone()),
                    provider: Set(p.provider.clone()),
                    consumer: Set(p.consumer.clone()),
                    spec_id: Set(p.spec_id.clone()),
                    cu: Set(p.cu),
                    pay: Set(p.pay),
                    relays: Set(p.relays),
                    qos_availability: Set(p.qos.availability),
                    qos_latency: Set(p.qos.latency),
                    qos_sync: Set(p.qos.sync),
                    qos_availability_exc: Set(p.qos_excellence.availability),
                    qos_latency_exc: Set(p.qos_excellence.latency),
                    qos_sync_exc: Set(p.qos_excellence.sync),
                }
            });

            relay_payments::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_conflict_responses<C: ConnectionTrait>(
        db: &C,
        rows: &[ConflictResponseRow],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|r| {
                let c = &r.response;
                conflict_responses::ActiveModel {
                    id: NotSet,
                    block_id: Set(r.block_id),
                    tx: Set(r.tx.clone()),
                    consumer: Set(c.consumer.clone()),
                    spec_id: Set(c.spec_id.clone()),
                    vote_id: Set(c.vote_id.clone()),
                    api_interface: Set(c.api_interface.clone()),
                    api_url: Set(c.api_url.clone()),
                    connection_type: Set(c.connection_type.clone()),
                    request_block: Set(c.request_block),
                    request_data: Set(c.request_data.clone()),
                    vote_deadline: Set(c.vote_deadline),
                }
            });

            conflict_responses::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_conflict_votes<C: ConnectionTrait>(
        db: &C,
        rows: &[ConflictVoteRow],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|r| conflict_votes::ActiveModel {
                id: NotSet,
                block_id: Set(r.block_id),
                tx: Set(r.tx.clone()),
                vote_id: Set(r.vote.vote_id.clone()),
                provider: Set(r.vote.provider.clone()),
            });

            conflict_votes::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_subscription_buys<C: ConnectionTrait>(
        db: &C,
        rows: &[SubscriptionBuyRow],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|r| subscription_buys::ActiveModel {
                id: NotSet,
                block_id: Set(r.block_id),
                tx: Set(r.tx.clone()),
                consumer: Set(r.purchase.consumer.clone()),
                plan: Set(r.purchase.plan.clone()),
                duration: Set(r.purchase.duration),
            });

            subscription_buys::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_block_reports<C: ConnectionTrait>(
        db: &C,
        rows: &[ProviderBlockReportRow],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|r| provider_latest_block_reports::ActiveModel {
                id: NotSet,
                block_id: Set(r.block_id),
                tx: Set(r.tx.clone()),
                provider: Set(r.provider.clone()),
                timestamp: Set(r.timestamp.into()),
                chain_id: Set(r.chain_id.clone()),
                chain_block_height: Set(r.chain_block_height),
            });

            provider_latest_block_reports::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }
}
