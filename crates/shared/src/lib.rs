//! Shared utilities and common types for the proctor registration backend.
//!
//! This crate provides common functionality used across all other crates:
//! - API key hashing and comparison
//! - Lenient datetime parsing for configured and client-supplied instants
//! - Common validation logic
//! - List limit handling

pub mod crypto;
pub mod datetime;
pub mod pagination;
pub mod validation;
