//! Create `mahasiswa` (student) table.
//!
//! `id_kurikulum` is assigned at creation and never updated afterwards; the
//! service layer enforces the guard.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mahasiswa::Table)
                    .if_not_exists()
                    .col(string_len(Mahasiswa::Nim, 20).primary_key())
                    .col(string_len(Mahasiswa::Nama, 100).not_null())
                    .col(string_len(Mahasiswa::Email, 100).unique_key().not_null())
                    .col(string_len(Mahasiswa::IdProdi, 20).not_null())
                    .col(uuid(Mahasiswa::IdKurikulum).not_null())
                    .col(string_len(Mahasiswa::Angkatan, 10).not_null())
                    .col(string_len(Mahasiswa::Status, 20).not_null())
                    .col(timestamp_with_time_zone(Mahasiswa::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Mahasiswa::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mahasiswa_prodi")
                            .from(Mahasiswa::Table, Mahasiswa::IdProdi)
                            .to(Prodi::Table, Prodi::IdProdi)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mahasiswa_kurikulum")
                            .from(Mahasiswa::Table, Mahasiswa::IdKurikulum)
                            .to(Kurikulum::Table, Kurikulum::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Mahasiswa::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Mahasiswa { Table, Nim, Nama, Email, IdProdi, IdKurikulum, Angkatan, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Prodi { Table, IdProdi }

#[derive(DeriveIden)]
enum Kurikulum { Table, Id }
