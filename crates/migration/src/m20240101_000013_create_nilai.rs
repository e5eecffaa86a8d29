//! Create `nilai` (score detail) table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nilai::Table)
                    .if_not_exists()
                    .col(uuid(Nilai::Id).primary_key())
                    .col(uuid(Nilai::IdEnrollment).not_null())
                    .col(uuid(Nilai::IdKomponen).not_null())
                    .col(decimal_len(Nilai::NilaiMentah, 5, 2).not_null())
                    .col(decimal_len(Nilai::NilaiTertimbang, 5, 2).not_null())
                    .col(text_null(Nilai::Catatan))
                    .col(string_len_null(Nilai::DinilaiOleh, 20))
                    .col(timestamp_with_time_zone(Nilai::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Nilai::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nilai_enrollment")
                            .from(Nilai::Table, Nilai::IdEnrollment)
                            .to(Enrollment::Table, Enrollment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nilai_komponen")
                            .from(Nilai::Table, Nilai::IdKomponen)
                            .to(KomponenPenilaian::Table, KomponenPenilaian::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nilai_dosen")
                            .from(Nilai::Table, Nilai::DinilaiOleh)
                            .to(Dosen::Table, Dosen::IdDosen)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Nilai::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Nilai { Table, Id, IdEnrollment, IdKomponen, NilaiMentah, NilaiTertimbang, Catatan, DinilaiOleh, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Enrollment { Table, Id }

#[derive(DeriveIden)]
enum KomponenPenilaian { Table, Id }

#[derive(DeriveIden)]
enum Dosen { Table, IdDosen }
