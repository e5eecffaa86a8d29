//! Create `cpmk` (course learning outcome) table with cascade FK to `rps`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cpmk::Table)
                    .if_not_exists()
                    .col(uuid(Cpmk::Id).primary_key())
                    .col(uuid(Cpmk::IdRps).not_null())
                    .col(string_len(Cpmk::KodeCpmk, 20).not_null())
                    .col(text(Cpmk::Deskripsi).not_null())
                    .col(integer_null(Cpmk::Urutan))
                    .col(timestamp_with_time_zone(Cpmk::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Cpmk::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cpmk_rps")
                            .from(Cpmk::Table, Cpmk::IdRps)
                            .to(Rps::Table, Rps::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cpmk::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cpmk { Table, Id, IdRps, KodeCpmk, Deskripsi, Urutan, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Rps { Table, Id }
