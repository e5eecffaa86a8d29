//! Create `dosen` (lecturer) table with FK to `prodi`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dosen::Table)
                    .if_not_exists()
                    .col(string_len(Dosen::IdDosen, 20).primary_key())
                    .col(string_len_null(Dosen::Nidn, 20).unique_key())
                    .col(string_len(Dosen::Nama, 100).not_null())
                    .col(string_len(Dosen::Email, 100).unique_key().not_null())
                    .col(string_len_null(Dosen::Phone, 20))
                    .col(string_len(Dosen::IdProdi, 20).not_null())
                    .col(string_len(Dosen::Status, 20).not_null())
                    .col(timestamp_with_time_zone(Dosen::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Dosen::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dosen_prodi")
                            .from(Dosen::Table, Dosen::IdProdi)
                            .to(Prodi::Table, Prodi::IdProdi)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Dosen::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Dosen { Table, IdDosen, Nidn, Nama, Email, Phone, IdProdi, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Prodi { Table, IdProdi }
