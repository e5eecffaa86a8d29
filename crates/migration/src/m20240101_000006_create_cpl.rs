//! Create `cpl` (program learning outcome) table with cascade FK to `kurikulum`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cpl::Table)
                    .if_not_exists()
                    .col(uuid(Cpl::Id).primary_key())
                    .col(uuid(Cpl::IdKurikulum).not_null())
                    .col(string_len(Cpl::KodeCpl, 20).not_null())
                    .col(text(Cpl::Deskripsi).not_null())
                    .col(string_len(Cpl::Kategori, 50).not_null())
                    .col(integer_null(Cpl::Urutan))
                    .col(boolean(Cpl::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Cpl::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Cpl::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cpl_kurikulum")
                            .from(Cpl::Table, Cpl::IdKurikulum)
                            .to(Kurikulum::Table, Kurikulum::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Cpl::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Cpl { Table, Id, IdKurikulum, KodeCpl, Deskripsi, Kategori, Urutan, IsActive, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Kurikulum { Table, Id }
