//! Persistence layer for the proctor registration service.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the domain storage contracts

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

pub use repositories::{RegistrationRepository, WindowRepository};
