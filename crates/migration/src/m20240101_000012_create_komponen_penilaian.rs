//! Create `komponen_penilaian` (assessment component) table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KomponenPenilaian::Table)
                    .if_not_exists()
                    .col(uuid(KomponenPenilaian::Id).primary_key())
                    .col(uuid(KomponenPenilaian::IdKelas).not_null())
                    .col(uuid_null(KomponenPenilaian::IdCpmk))
                    .col(string_len(KomponenPenilaian::NamaKomponen, 100).not_null())
                    .col(decimal_len(KomponenPenilaian::Bobot, 5, 2).not_null())
                    .col(decimal_len(KomponenPenilaian::NilaiMaksimal, 5, 2).not_null())
                    .col(timestamp_with_time_zone(KomponenPenilaian::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(KomponenPenilaian::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_komponen_kelas")
                            .from(KomponenPenilaian::Table, KomponenPenilaian::IdKelas)
                            .to(Kelas::Table, Kelas::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_komponen_cpmk")
                            .from(KomponenPenilaian::Table, KomponenPenilaian::IdCpmk)
                            .to(Cpmk::Table, Cpmk::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(KomponenPenilaian::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum KomponenPenilaian { Table, Id, IdKelas, IdCpmk, NamaKomponen, Bobot, NilaiMaksimal, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Kelas { Table, Id }

#[derive(DeriveIden)]
enum Cpmk { Table, Id }
