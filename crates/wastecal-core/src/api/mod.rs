//! REST API access for the waste collection backend.
//!
//! This module provides the `ApiClient` for fetching collection dates,
//! street mappings and download link availability, and the `Fetcher`
//! trait the response cache uses to refresh its slots.

pub mod client;
pub mod error;
pub mod fetcher;

pub use client::ApiClient;
pub use error::ApiError;
pub use fetcher::Fetcher;
