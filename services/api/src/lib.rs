//! services/api/src/lib.rs
//!
//! Library root for the API service, so binaries and integration tests can
//! share the router, adapters, and configuration.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
