//! Create `kurikulum` (curriculum version) table with FK to `prodi`.
//!
//! `kode_kurikulum` is only unique within a prodi; the unique index lives in
//! the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kurikulum::Table)
                    .if_not_exists()
                    .col(uuid(Kurikulum::Id).primary_key())
                    .col(string_len(Kurikulum::IdProdi, 20).not_null())
                    .col(string_len(Kurikulum::KodeKurikulum, 20).not_null())
                    .col(string_len(Kurikulum::NamaKurikulum, 200).not_null())
                    .col(integer(Kurikulum::TahunBerlaku).not_null())
                    .col(integer_null(Kurikulum::TahunBerakhir))
                    .col(string_len(Kurikulum::Status, 20).not_null())
                    .col(boolean(Kurikulum::IsPrimary).not_null().default(false))
                    .col(text_null(Kurikulum::Deskripsi))
                    .col(string_len_null(Kurikulum::NomorSk, 100))
                    .col(date_null(Kurikulum::TanggalSk))
                    .col(timestamp_with_time_zone(Kurikulum::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Kurikulum::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kurikulum_prodi")
                            .from(Kurikulum::Table, Kurikulum::IdProdi)
                            .to(Prodi::Table, Prodi::IdProdi)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Kurikulum::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Kurikulum {
    Table,
    Id,
    IdProdi,
    KodeKurikulum,
    NamaKurikulum,
    TahunBerlaku,
    TahunBerakhir,
    Status,
    IsPrimary,
    Deskripsi,
    NomorSk,
    TanggalSk,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Prodi { Table, IdProdi }
