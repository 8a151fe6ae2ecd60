use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Current stake of each provider per chain, replaced on every metadata sync
        manager
            .create_table(
                Table::create()
                    .table(ProviderStakes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProviderStakes::Provider).string().not_null())
                    .col(ColumnDef::new(ProviderStakes::SpecId).string().not_null())
                    .col(ColumnDef::new(ProviderStakes::Stake).big_integer())
                    .primary_key(
                        Index::create()
                            .col(ProviderStakes::Provider)
                            .col(ProviderStakes::SpecId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_stakes_provider")
                            .from(ProviderStakes::Table, ProviderStakes::Provider)
                            .to(Providers::Table, Providers::Address),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_stakes_spec")
                            .from(ProviderStakes::Table, ProviderStakes::SpecId)
                            .to(Specs::Table, Specs::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProviderStakes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProviderStakes {
    Table,
    Provider,
    SpecId,
    Stake,
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
