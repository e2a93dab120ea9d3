//! Vatic target-price snapshot API client

pub mod rest;
pub mod types;

pub use rest::TargetsClient;
pub use types::{RestError, extract_target_price};
