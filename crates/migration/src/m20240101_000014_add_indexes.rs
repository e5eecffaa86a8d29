use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Kurikulum: kode unique within a prodi
        manager
            .create_index(
                Index::create()
                    .name("uniq_kurikulum_prodi_kode")
                    .table(Kurikulum::Table)
                    .col(Kurikulum::IdProdi)
                    .col(Kurikulum::KodeKurikulum)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Cpl: kode unique within a kurikulum, plus lookup index
        manager
            .create_index(
                Index::create()
                    .name("uniq_cpl_kurikulum_kode")
                    .table(Cpl::Table)
                    .col(Cpl::IdKurikulum)
                    .col(Cpl::KodeCpl)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Cpmk: kode unique within an rps
        manager
            .create_index(
                Index::create()
                    .name("uniq_cpmk_rps_kode")
                    .table(Cpmk::Table)
                    .col(Cpmk::IdRps)
                    .col(Cpmk::KodeCpmk)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Mahasiswa: lookup by kurikulum
        manager
            .create_index(
                Index::create()
                    .name("idx_mahasiswa_kurikulum")
                    .table(Mahasiswa::Table)
                    .col(Mahasiswa::IdKurikulum)
                    .to_owned(),
            )
            .await?;

        // Rps: lookup by matakuliah
        manager
            .create_index(
                Index::create()
                    .name("idx_rps_matakuliah")
                    .table(Rps::Table)
                    .col(Rps::KodeMk)
                    .col(Rps::IdKurikulum)
                    .to_owned(),
            )
            .await?;

        // Enrollment: one row per (nim, kelas) plus per-side lookups
        manager
            .create_index(
                Index::create()
                    .name("uniq_enrollment_nim_kelas")
                    .table(Enrollment::Table)
                    .col(Enrollment::Nim)
                    .col(Enrollment::IdKelas)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollment_kelas")
                    .table(Enrollment::Table)
                    .col(Enrollment::IdKelas)
                    .to_owned(),
            )
            .await?;

        // Nilai: lookup by enrollment
        manager
            .create_index(
                Index::create()
                    .name("idx_nilai_enrollment")
                    .table(Nilai::Table)
                    .col(Nilai::IdEnrollment)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_kurikulum_prodi_kode").table(Kurikulum::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_cpl_kurikulum_kode").table(Cpl::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_cpmk_rps_kode").table(Cpmk::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_mahasiswa_kurikulum").table(Mahasiswa::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_rps_matakuliah").table(Rps::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_enrollment_nim_kelas").table(Enrollment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_enrollment_kelas").table(Enrollment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_nilai_enrollment").table(Nilai::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Kurikulum { Table, IdProdi, KodeKurikulum }

#[derive(DeriveIden)]
enum Cpl { Table, IdKurikulum, KodeCpl }

#[derive(DeriveIden)]
enum Cpmk { Table, IdRps, KodeCpmk }

#[derive(DeriveIden)]
enum Mahasiswa { Table, IdKurikulum }

#[derive(DeriveIden)]
enum Rps { Table, KodeMk, IdKurikulum }

#[derive(DeriveIden)]
enum Enrollment { Table, Nim, IdKelas }

#[derive(DeriveIden)]
enum Nilai { Table, IdEnrollment }
