//! Shared test utilities: a scripted result provider, JSON fixtures and
//! assertion helpers used by unit and integration tests. Integration tests
//! get them through the `test-utils` feature.

pub mod assertions;
pub mod fixtures;
pub mod mocks;
