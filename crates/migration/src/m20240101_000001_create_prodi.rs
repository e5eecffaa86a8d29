//! Create `prodi` (study program) table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prodi::Table)
                    .if_not_exists()
                    .col(string_len(Prodi::IdProdi, 20).primary_key())
                    .col(string_len(Prodi::Nama, 100).not_null())
                    .col(string_len_null(Prodi::Jenjang, 10))
                    .col(string_len_null(Prodi::Akreditasi, 5))
                    .col(timestamp_with_time_zone(Prodi::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Prodi::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Prodi::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Prodi { Table, IdProdi, Nama, Jenjang, Akreditasi, CreatedAt, UpdatedAt }
