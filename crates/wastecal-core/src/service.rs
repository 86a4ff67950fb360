//! The consumer-facing entry point: one cache per resource kind behind a
//! single handle.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::api::{ApiClient, ApiError, Fetcher};
use crate::cache::{CacheEntry, CacheSettings, FileSlotStore, ResourceCache, SlotStore};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::models::{DownloadLinks, NextPickups, Schedule, StreetCoordinates, StreetZoneMapping, ZoneCode};
use crate::resource::{Resource, ResourceKind};

pub struct WasteClient {
    clock: Arc<dyn Clock>,
    next_pickups: ResourceCache<NextPickups>,
    schedule: ResourceCache<Schedule>,
    street_zone_mapping: ResourceCache<StreetZoneMapping>,
    download_links: ResourceCache<DownloadLinks>,
    street_coordinates: ResourceCache<StreetCoordinates>,
}

fn settings_for(kind: ResourceKind, config: &Config) -> CacheSettings {
    CacheSettings::for_kind(kind)
        .with_namespace(config.namespace.as_deref())
        .with_max_age(config.cache_max_age())
        .with_single_flight(config.single_flight)
}

fn cache_for<T, F>(config: &Config, store: &Arc<dyn SlotStore>, clock: &Arc<dyn Clock>, fetcher: &Arc<F>) -> ResourceCache<T>
where
    T: Resource,
    F: Fetcher<T> + 'static,
{
    let fetcher: Arc<dyn Fetcher<T>> = fetcher.clone();
    ResourceCache::new(settings_for(T::KIND, config), Arc::clone(store), Arc::clone(clock), fetcher)
}

impl WasteClient {
    /// Build a client that talks HTTP and keeps its slots on disk.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::with_options(
            &config.api_base_url,
            config.request_timeout(),
            config.rate_limit_retries,
        )?;
        let store = FileSlotStore::new(config.cache_dir()?);
        Ok(Self::with_parts(config, Arc::new(store), Arc::new(SystemClock), Arc::new(api)))
    }

    /// Assemble a client from explicit parts. `fetcher` must serve every kind.
    pub fn with_parts<F>(config: &Config, store: Arc<dyn SlotStore>, clock: Arc<dyn Clock>, fetcher: Arc<F>) -> Self
    where
        F: Fetcher<NextPickups>
            + Fetcher<Schedule>
            + Fetcher<StreetZoneMapping>
            + Fetcher<DownloadLinks>
            + Fetcher<StreetCoordinates>
            + 'static,
    {
        Self {
            next_pickups: cache_for(config, &store, &clock, &fetcher),
            schedule: cache_for(config, &store, &clock, &fetcher),
            street_zone_mapping: cache_for(config, &store, &clock, &fetcher),
            download_links: cache_for(config, &store, &clock, &fetcher),
            street_coordinates: cache_for(config, &store, &clock, &fetcher),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> String {
        self.clock.today()
    }

    // ------------------------------------------------------------------------
    // Cached reads
    // ------------------------------------------------------------------------

    pub async fn next_pickups(&self, zone: &ZoneCode) -> Result<NextPickups, ApiError> {
        self.next_pickups.get(Some(zone.as_str())).await
    }

    pub async fn schedule(&self, zone: &ZoneCode) -> Result<Schedule, ApiError> {
        self.schedule.get(Some(zone.as_str())).await
    }

    pub async fn street_zone_mapping(&self) -> Result<StreetZoneMapping, ApiError> {
        self.street_zone_mapping.get(None).await
    }

    pub async fn download_links(&self) -> Result<DownloadLinks, ApiError> {
        self.download_links.get(None).await
    }

    pub async fn street_coordinates(&self) -> Result<StreetCoordinates, ApiError> {
        self.street_coordinates.get(None).await
    }

    // ------------------------------------------------------------------------
    // Forced refreshes
    // ------------------------------------------------------------------------

    pub async fn fetch_next_pickups(&self, zone: &ZoneCode) -> Result<NextPickups, ApiError> {
        self.next_pickups.fetch_fresh(Some(zone.as_str())).await
    }

    pub async fn fetch_schedule(&self, zone: &ZoneCode) -> Result<Schedule, ApiError> {
        self.schedule.fetch_fresh(Some(zone.as_str())).await
    }

    pub async fn fetch_street_zone_mapping(&self) -> Result<StreetZoneMapping, ApiError> {
        self.street_zone_mapping.fetch_fresh(None).await
    }

    pub async fn fetch_download_links(&self) -> Result<DownloadLinks, ApiError> {
        self.download_links.fetch_fresh(None).await
    }

    pub async fn fetch_street_coordinates(&self) -> Result<StreetCoordinates, ApiError> {
        self.street_coordinates.fetch_fresh(None).await
    }

    /// Zone of a street by exact name, falling back to a case-insensitive
    /// match when exactly one street fits.
    pub async fn zone_for_street(&self, name: &str) -> Result<Option<ZoneCode>, ApiError> {
        let mapping = self.street_zone_mapping().await?;
        if let Some(zone) = mapping.zone_for(name) {
            return Ok(Some(zone));
        }

        let wanted = name.trim().to_lowercase();
        let mut matches = mapping.streets().filter(|street| street.to_lowercase() == wanted);
        Ok(match (matches.next(), matches.next()) {
            (Some(street), None) => mapping.zone_for(street),
            _ => None,
        })
    }

    // ------------------------------------------------------------------------
    // Stored entries, without fetching
    // ------------------------------------------------------------------------

    pub fn cached_next_pickups(&self, zone: &ZoneCode) -> Option<CacheEntry<NextPickups>> {
        self.next_pickups.peek(Some(zone.as_str()))
    }

    pub fn cached_schedule(&self, zone: &ZoneCode) -> Option<CacheEntry<Schedule>> {
        self.schedule.peek(Some(zone.as_str()))
    }
}
