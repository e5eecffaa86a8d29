//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod kurikulum_service;
pub mod cpl_service;
pub mod matakuliah_service;
pub mod mahasiswa_service;
pub mod dosen_service;
pub mod rps_service;
pub mod cpmk_service;
pub mod kelas_service;
pub mod enrollment_service;
pub mod penilaian_service;
#[cfg(test)]
pub mod test_support;
