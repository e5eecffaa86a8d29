/// Database connection and migration tests
pub mod db_tests;

/// CRUD operations tests for the curriculum entities
pub mod crud_tests;
