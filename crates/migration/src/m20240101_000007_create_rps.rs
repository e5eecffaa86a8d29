//! Create `rps` (course syllabus) table.
//!
//! References `matakuliah` through its composite key; approval state lives in
//! the `status` column.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rps::Table)
                    .if_not_exists()
                    .col(uuid(Rps::Id).primary_key())
                    .col(string_len(Rps::KodeMk, 20).not_null())
                    .col(uuid(Rps::IdKurikulum).not_null())
                    .col(string_len(Rps::SemesterBerlaku, 10).not_null())
                    .col(string_len(Rps::TahunAjaran, 10).not_null())
                    .col(string_len(Rps::Status, 20).not_null())
                    .col(string_len_null(Rps::KetuaPengembang, 20))
                    .col(text_null(Rps::DeskripsiMk))
                    .col(timestamp_with_time_zone(Rps::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Rps::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rps_matakuliah")
                            .from(Rps::Table, (Rps::KodeMk, Rps::IdKurikulum))
                            .to(Matakuliah::Table, (Matakuliah::KodeMk, Matakuliah::IdKurikulum))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rps_ketua_pengembang")
                            .from(Rps::Table, Rps::KetuaPengembang)
                            .to(Dosen::Table, Dosen::IdDosen)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rps::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Rps {
    Table,
    Id,
    KodeMk,
    IdKurikulum,
    SemesterBerlaku,
    TahunAjaran,
    Status,
    KetuaPengembang,
    DeskripsiMk,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Matakuliah { Table, KodeMk, IdKurikulum }

#[derive(DeriveIden)]
enum Dosen { Table, IdDosen }
