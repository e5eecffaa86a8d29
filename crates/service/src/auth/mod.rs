//! Auth module: three-layer architecture (domain, repository, service).
//!
//! This module centralizes registration, login and token refresh business
//! logic under the service crate.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::AuthService;
