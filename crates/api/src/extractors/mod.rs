//! Custom request extractors.

pub mod api_key;
