//! Create `matakuliah` (course) table.
//!
//! Composite primary key `(kode_mk, id_kurikulum)`: the same course code may
//! coexist under multiple curricula. Rows are deactivated, never deleted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Matakuliah::Table)
                    .if_not_exists()
                    .col(string_len(Matakuliah::KodeMk, 20).not_null())
                    .col(uuid(Matakuliah::IdKurikulum).not_null())
                    .col(string_len(Matakuliah::NamaMk, 100).not_null())
                    .col(string_len_null(Matakuliah::NamaMkEng, 100))
                    .col(integer(Matakuliah::Sks).not_null())
                    .col(integer(Matakuliah::Semester).not_null())
                    .col(string_len_null(Matakuliah::Rumpun, 50))
                    .col(string_len(Matakuliah::JenisMk, 50).not_null())
                    .col(boolean(Matakuliah::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Matakuliah::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Matakuliah::UpdatedAt).not_null())
                    .primary_key(
                        Index::create()
                            .col(Matakuliah::KodeMk)
                            .col(Matakuliah::IdKurikulum),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matakuliah_kurikulum")
                            .from(Matakuliah::Table, Matakuliah::IdKurikulum)
                            .to(Kurikulum::Table, Kurikulum::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Matakuliah::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Matakuliah {
    Table,
    KodeMk,
    IdKurikulum,
    NamaMk,
    NamaMkEng,
    Sks,
    Semester,
    Rumpun,
    JenisMk,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Kurikulum { Table, Id }
