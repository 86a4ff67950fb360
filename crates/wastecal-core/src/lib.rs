//! wastecal-core - waste collection dates with a validated response cache.
//!
//! This crate contains the API client, data models and the client-side
//! cache that sits between consumers and the remote waste collection
//! service. It is shared by the `wastecal` command line tool and any other
//! frontend that wants the same caching rules.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod models;
pub mod resource;
pub mod service;
pub mod utils;

pub use api::{ApiClient, ApiError, Fetcher};
pub use cache::{CacheEntry, CacheSettings, FileSlotStore, FreshnessPolicy, MemorySlotStore, ResourceCache, SlotStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use models::{DownloadLinks, NextPickups, Schedule, StreetCoordinates, StreetZoneMapping, ZoneCode};
pub use resource::{Resource, ResourceKind};
pub use service::WasteClient;
pub use utils::Language;
