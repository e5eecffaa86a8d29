//! Create `kelas` (class section) table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kelas::Table)
                    .if_not_exists()
                    .col(uuid(Kelas::Id).primary_key())
                    .col(string_len(Kelas::KodeMk, 20).not_null())
                    .col(uuid(Kelas::IdKurikulum).not_null())
                    .col(uuid_null(Kelas::IdRps))
                    .col(string_len(Kelas::NamaKelas, 10).not_null())
                    .col(string_len(Kelas::Semester, 10).not_null())
                    .col(string_len(Kelas::TahunAjaran, 10).not_null())
                    .col(integer(Kelas::Kapasitas).not_null().default(40))
                    .col(integer(Kelas::KuotaTerisi).not_null().default(0))
                    .col(string_len(Kelas::Status, 20).not_null())
                    .col(timestamp_with_time_zone(Kelas::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Kelas::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kelas_matakuliah")
                            .from(Kelas::Table, (Kelas::KodeMk, Kelas::IdKurikulum))
                            .to(Matakuliah::Table, (Matakuliah::KodeMk, Matakuliah::IdKurikulum))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_kelas_rps")
                            .from(Kelas::Table, Kelas::IdRps)
                            .to(Rps::Table, Rps::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Kelas::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Kelas {
    Table,
    Id,
    KodeMk,
    IdKurikulum,
    IdRps,
    NamaKelas,
    Semester,
    TahunAjaran,
    Kapasitas,
    KuotaTerisi,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Matakuliah { Table, KodeMk, IdKurikulum }

#[derive(DeriveIden)]
enum Rps { Table, Id }
