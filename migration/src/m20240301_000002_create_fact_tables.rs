use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Generic provider/conflict events with reusable typed slots
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::BlockId).big_integer().not_null())
                    .col(ColumnDef::new(Events::Tx).string())
                    .col(ColumnDef::new(Events::EventType).integer().not_null())
                    .col(ColumnDef::new(Events::Provider).string())
                    .col(ColumnDef::new(Events::Consumer).string())
                    .col(ColumnDef::new(Events::T1).text())
                    .col(ColumnDef::new(Events::T2).text())
                    .col(ColumnDef::new(Events::I1).big_integer())
                    .col(ColumnDef::new(Events::I2).big_integer())
                    .col(ColumnDef::new(Events::B1).big_integer())
                    .col(ColumnDef::new(Events::B2).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_block")
                            .from(Events::Table, Events::BlockId)
                            .to(Blocks::Table, Blocks::Height),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_provider")
                            .from(Events::Table, Events::Provider)
                            .to(Providers::Table, Providers::Address),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_consumer")
                            .from(Events::Table, Events::Consumer)
                            .to(Consumers::Table, Consumers::Address),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RelayPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RelayPayments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RelayPayments::BlockId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RelayPayments::Tx).string())
                    .col(ColumnDef::new(RelayPayments::Provider).string().not_null())
                    .col(ColumnDef::new(RelayPayments::Consumer).string().not_null())
                    .col(ColumnDef::new(RelayPayments::SpecId).string().not_null())
                    .col(ColumnDef::new(RelayPayments::Cu).big_integer().not_null())
                    .col(ColumnDef::new(RelayPayments::Pay).big_integer().not_null())
                    .col(ColumnDef::new(RelayPayments::Relays).big_integer())
                    .col(ColumnDef::new(RelayPayments::QosAvailability).double())
                    .col(ColumnDef::new(RelayPayments::QosLatency).double())
                    .col(ColumnDef::new(RelayPayments::QosSync).double())
                    .col(ColumnDef::new(RelayPayments::QosAvailabilityExc).double())
                    .col(ColumnDef::new(RelayPayments::QosLatencyExc).double())
                    .col(ColumnDef::new(RelayPayments::QosSyncExc).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relay_payments_block")
                            .from(RelayPayments::Table, RelayPayments::BlockId)
                            .to(Blocks::Table, Blocks::Height),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relay_payments_provider")
                            .from(RelayPayments::Table, RelayPayments::Provider)
                            .to(Providers::Table, Providers::Address),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relay_payments_consumer")
                            .from(RelayPayments::Table, RelayPayments::Consumer)
                            .to(Consumers::Table, Consumers::Address),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_relay_payments_spec")
                            .from(RelayPayments::Table, RelayPayments::SpecId)
                            .to(Specs::Table, Specs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConflictResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConflictResponses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConflictResponses::BlockId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConflictResponses::Tx).string())
                    .col(
                        ColumnDef::new(ConflictResponses::Consumer)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConflictResponses::SpecId).string().not_null())
                    .col(ColumnDef::new(ConflictResponses::VoteId).string().not_null())
                    .col(ColumnDef::new(ConflictResponses::ApiInterface).string())
                    .col(ColumnDef::new(ConflictResponses::ApiUrl).text())
                    .col(ColumnDef::new(ConflictResponses::ConnectionType).string())
                    .col(ColumnDef::new(ConflictResponses::RequestBlock).big_integer())
                    .col(ColumnDef::new(ConflictResponses::RequestData).text())
                    .col(ColumnDef::new(ConflictResponses::VoteDeadline).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conflict_responses_block")
                            .from(ConflictResponses::Table, ConflictResponses::BlockId)
                            .to(Blocks::Table, Blocks::Height),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conflict_responses_consumer")
                            .from(ConflictResponses::Table, ConflictResponses::Consumer)
                            .to(Consumers::Table, Consumers::Address),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conflict_responses_spec")
                            .from(ConflictResponses::Table, ConflictResponses::SpecId)
                            .to(Specs::Table, Specs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConflictVotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConflictVotes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConflictVotes::BlockId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConflictVotes::Tx).string())
                    .col(ColumnDef::new(ConflictVotes::VoteId).string().not_null())
                    .col(ColumnDef::new(ConflictVotes::Provider).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conflict_votes_block")
                            .from(ConflictVotes::Table, ConflictVotes::BlockId)
                            .to(Blocks::Table, Blocks::Height),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_conflict_votes_provider")
                            .from(ConflictVotes::Table, ConflictVotes::Provider)
                            .to(Providers::Table, Providers::Address),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SubscriptionBuys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionBuys::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionBuys::BlockId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubscriptionBuys::Tx).string())
                    .col(
                        ColumnDef::new(SubscriptionBuys::Consumer)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubscriptionBuys::Plan).string().not_null())
                    .col(
                        ColumnDef::new(SubscriptionBuys::Duration)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_buys_block")
                            .from(SubscriptionBuys::Table, SubscriptionBuys::BlockId)
                            .to(Blocks::Table, Blocks::Height),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_buys_consumer")
                            .from(SubscriptionBuys::Table, SubscriptionBuys::Consumer)
                            .to(Consumers::Table, Consumers::Address),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_buys_plan")
                            .from(SubscriptionBuys::Table, SubscriptionBuys::Plan)
                            .to(Plans::Table, Plans::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProviderLatestBlockReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderLatestBlockReports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderLatestBlockReports::BlockId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProviderLatestBlockReports::Tx).string())
                    .col(
                        ColumnDef::new(ProviderLatestBlockReports::Provider)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderLatestBlockReports::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderLatestBlockReports::ChainId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderLatestBlockReports::ChainBlockHeight)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_latest_block_reports_block")
                            .from(
                                ProviderLatestBlockReports::Table,
                                ProviderLatestBlockReports::BlockId,
                            )
                            .to(Blocks::Table, Blocks::Height),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_latest_block_reports_provider")
                            .from(ProviderLatestBlockReports::Table, ProviderLatestBlockReports::Provider)
                            .to(Providers::Table, Providers::Address),
                    )
                    .to_owned(),
            )
            .await?;

        // Reporting queries join facts on block and filter by provider
        manager
            .create_index(
                Index::create()
                    .name("events_block_id")
                    .table(Events::Table)
                    .col(Events::BlockId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("events_provider")
                    .table(Events::Table)
                    .col(Events::Provider)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("relay_payments_block_id")
                    .table(RelayPayments::Table)
                    .col(RelayPayments::BlockId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("relay_payments_provider")
                    .table(RelayPayments::Table)
                    .col(RelayPayments::Provider)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("provider_latest_block_reports_provider")
                    .table(ProviderLatestBlockReports::Table)
                    .col(ProviderLatestBlockReports::Provider)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ProviderLatestBlockReports::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SubscriptionBuys::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ConflictVotes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ConflictResponses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RelayPayments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Blocks {
    Table,
    Height,
}

#[derive(Iden)]
enum Providers {
    Table,
    Address,
}

#[derive(Iden)]
enum Specs {
    Table,
    Id,
}

#[derive(Iden)]
enum Plans {
    Table,
    Id,
}

#[derive(Iden)]
enum Consumers {
    Table,
    Address,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    BlockId,
    Tx,
    EventType,
    Provider,
    Consumer,
    T1,
    T2,
    I1,
    I2,
    B1,
    B2,
}

#[derive(Iden)]
enum RelayPayments {
    Table,
    Id,
    BlockId,
    Tx,
    Provider,
    Consumer,
    SpecId,
    Cu,
    Pay,
    Relays,
    QosAvailability,
    QosLatency,
    QosSync,
    QosAvailabilityExc,
    QosLatencyExc,
    QosSyncExc,
}

#[derive(Iden)]
enum ConflictResponses {
    Table,
    Id,
    BlockId,
    Tx,
    Consumer,
    SpecId,
    VoteId,
    ApiInterface,
    ApiUrl,
    ConnectionType,
    RequestBlock,
    RequestData,
    VoteDeadline,
}

#[derive(Iden)]
enum ConflictVotes {
    Table,
    Id,
    BlockId,
    Tx,
    VoteId,
    Provider,
}

#[derive(Iden)]
enum SubscriptionBuys {
    Table,
    Id,
    BlockId,
    Tx,
    Consumer,
    Plan,
    Duration,
}

#[derive(Iden)]
enum ProviderLatestBlockReports {
    Table,
    Id,
    BlockId,
    Tx,
    Provider,
    Timestamp,
    ChainId,
    ChainBlockHeight,
}
