//! Data models for the waste collection API.
//!
//! Each response type implements [`Resource`](crate::resource::Resource) so it
//! can be fetched and cached:
//!
//! - `NextPickups`, `Schedule`: per-zone collection dates
//! - `StreetZoneMapping`, `StreetCoordinates`: street tables for the service area
//! - `DownloadLinks`: availability of printable collection plans
//! - `ZoneCode`: validated zone identifier

pub mod download;
pub mod pickup;
pub mod schedule;
pub mod street;
pub mod zone;

pub use download::{DownloadLinks, UrlTemplate};
pub use pickup::{NextPickups, Pickup};
pub use schedule::Schedule;
pub use street::{StreetCoordinates, StreetWithCoordinates, StreetZoneMapping};
pub use zone::{InvalidZoneCode, ZoneCode};
