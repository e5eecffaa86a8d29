//! Create `enrollment` table linking `mahasiswa` to `kelas`.
//!
//! One row per (nim, kelas); the unique index lives in the index migration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(uuid(Enrollment::Id).primary_key())
                    .col(string_len(Enrollment::Nim, 20).not_null())
                    .col(uuid(Enrollment::IdKelas).not_null())
                    .col(date(Enrollment::TanggalDaftar).not_null())
                    .col(string_len(Enrollment::Status, 20).not_null())
                    .col(decimal_len_null(Enrollment::NilaiAkhir, 5, 2))
                    .col(string_len_null(Enrollment::NilaiHuruf, 2))
                    .col(timestamp_with_time_zone(Enrollment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Enrollment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_mahasiswa")
                            .from(Enrollment::Table, Enrollment::Nim)
                            .to(Mahasiswa::Table, Mahasiswa::Nim)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_kelas")
                            .from(Enrollment::Table, Enrollment::IdKelas)
                            .to(Kelas::Table, Kelas::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Enrollment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Enrollment { Table, Id, Nim, IdKelas, TanggalDaftar, Status, NilaiAkhir, NilaiHuruf, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Mahasiswa { Table, Nim }

#[derive(DeriveIden)]
enum Kelas { Table, Id }
