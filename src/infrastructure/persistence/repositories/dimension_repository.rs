//! Repository for the dimension tables: providers, specs, plans and consumers
//!
//! Every insert is conflict-skip by key. Two columns may change after creation:
//! a provider's moniker (only towards a non-empty value) and a plan's
//! description and price (only from metadata sync). Provider stakes are a
//! snapshot: each metadata sync replaces the whole table.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use std::fmt;

use crate::domain::models::{Consumer, Dimensions, Plan, Provider, ProviderStake, Spec};
use crate::infrastructure::persistence::entities::{
    consumers, plans, provider_stakes, providers, specs,
};
use crate::infrastructure::persistence::error::DbError;

/// Rows per INSERT statement
pub const INSERT_CHUNK_SIZE: usize = 500;

/// Repository for dimension operations
#[derive(Clone)]
pub struct DimensionRepository {
    conn: DatabaseConnection,
}

impl fmt::Debug for DimensionRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionRepository").finish_non_exhaustive()
    }
}

impl DimensionRepository {
    /// Create a new DimensionRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Load every dimension row, used to warm the process-wide cache
    pub async fn load_all(&self) -> Result<Dimensions, DbError> {
        let providers = providers::Entity::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|p| Provider {
                address: p.address,
                moniker: p.moniker,
            })
            .collect();

        let specs = specs::Entity::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|s| Spec { id: s.id })
            .collect();

        let plans = plans::Entity::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|p| Plan {
                id: p.id,
                description: p.description,
                price: p.price,
            })
            .collect();

        let consumers = consumers::Entity::find()
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|c| Consumer { address: c.address })
            .collect();

        Ok(Dimensions {
            providers,
            specs,
            plans,
            consumers,
        })
    }

    /// Insert rows first referenced by a block; plans already stored are left untouched
    pub async fn insert_block_dimensions<C: ConnectionTrait>(
        db: &C,
        dimensions: &Dimensions,
    ) -> Result<(), DbError> {
        Self::insert_providers(db, &dimensions.providers).await?;
        Self::insert_specs(db, &dimensions.specs).await?;
        Self::insert_plans(db, &dimensions.plans, false).await?;
        Self::insert_consumers(db, &dimensions.consumers).await?;
        Ok(())
    }

    /// Write a metadata snapshot; plan description and price are refreshed
    pub async fn upsert_metadata<C: ConnectionTrait>(
        db: &C,
        dimensions: &Dimensions,
    ) -> Result<(), DbError> {
        Self::insert_providers(db, &dimensions.providers).await?;
        Self::insert_specs(db, &dimensions.specs).await?;
        Self::insert_plans(db, &dimensions.plans, true).await?;
        Self::insert_consumers(db, &dimensions.consumers).await?;
        Ok(())
    }

    /// Replace every stored stake row with the given snapshot
    pub async fn replace_stakes<C: ConnectionTrait>(
        db: &C,
        stakes: &[ProviderStake],
    ) -> Result<(), DbError> {
        provider_stakes::Entity::delete_many().exec(db).await?;

        for chunk in stakes.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|s| provider_stakes::ActiveModel {
                provider: Set(s.provider.clone()),
                spec_id: Set(s.spec.clone()),
                stake: Set(s.stake),
            });

            provider_stakes::Entity::insert_many(models)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_providers<C: ConnectionTrait>(
        db: &C,
        rows: &[Provider],
    ) -> Result<(), DbError> {
        // Key order, so concurrent block transactions lock shared providers in the same order
        let mut sorted: Vec<&Provider> = rows.iter().collect();
        sorted.sort_by(|a, b| a.address.cmp(&b.address));

        // An empty moniker must never overwrite a stored one
        let merged_moniker = Expr::cust(
            "CASE WHEN excluded.moniker = '' THEN providers.moniker ELSE excluded.moniker END",
        );

        for chunk in sorted.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|p| providers::ActiveModel {
                address: Set(p.address.clone()),
                moniker: Set(p.moniker.clone()),
            });

            providers::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::column(providers::Column::Address)
                        .value(providers::Column::Moniker, merged_moniker.clone())
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
        }

        Ok(())
    }

    async fn insert_specs<C: ConnectionTrait>(db: &C, rows: &[Spec]) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|s| specs::ActiveModel {
                id: Set(s.id.clone()),
            });

            specs::Entity::insert_many(models)
                .on_conflict(OnConflict::column(specs::Column::Id).do_nothing().to_owned())
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_plans<C: ConnectionTrait>(
        db: &C,
        rows: &[Plan],
        refresh_details: bool,
    ) -> Result<(), DbError> {
        let on_conflict = if refresh_details {
            OnConflict::column(plans::Column::Id)
                .update_columns([plans::Column::Description, plans::Column::Price])
                .to_owned()
        } else {
            OnConflict::column(plans::Column::Id).do_nothing().to_owned()
        };

        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|p| plans::ActiveModel {
                id: Set(p.id.clone()),
                description: Set(p.description.clone()),
                price: Set(p.price),
            });

            plans::Entity::insert_many(models)
                .on_conflict(on_conflict.clone())
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    async fn insert_consumers<C: ConnectionTrait>(
        db: &C,
        rows: &[Consumer],
    ) -> Result<(), DbError> {
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let models = chunk.iter().map(|c| consumers::ActiveModel {
                address: Set(c.address.clone()),
            });

            consumers::Entity::insert_many(models)
                .on_conflict(
                    OnConflict::column(consumers::Column::Address)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }
}
