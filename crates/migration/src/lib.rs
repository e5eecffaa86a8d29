//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_prodi;
mod m20240101_000002_create_users;
mod m20240101_000003_create_dosen;
mod m20240101_000004_create_kurikulum;
mod m20240101_000005_create_matakuliah;
mod m20240101_000006_create_cpl;
mod m20240101_000007_create_rps;
mod m20240101_000008_create_cpmk;
mod m20240101_000009_create_mahasiswa;
mod m20240101_000010_create_kelas;
mod m20240101_000011_create_enrollment;
mod m20240101_000012_create_komponen_penilaian;
mod m20240101_000013_create_nilai;
mod m20240101_000014_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_prodi::Migration),
            Box::new(m20240101_000002_create_users::Migration),
            Box::new(m20240101_000003_create_dosen::Migration),
            Box::new(m20240101_000004_create_kurikulum::Migration),
            Box::new(m20240101_000005_create_matakuliah::Migration),
            Box::new(m20240101_000006_create_cpl::Migration),
            Box::new(m20240101_000007_create_rps::Migration),
            Box::new(m20240101_000008_create_cpmk::Migration),
            Box::new(m20240101_000009_create_mahasiswa::Migration),
            Box::new(m20240101_000010_create_kelas::Migration),
            Box::new(m20240101_000011_create_enrollment::Migration),
            Box::new(m20240101_000012_create_komponen_penilaian::Migration),
            Box::new(m20240101_000013_create_nilai::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000014_add_indexes::Migration),
        ]
    }
}
