use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};
use crate::utils::contains_ignore_case;

use super::ZoneCode;

/// Street name to zone code, for every street in the service area.
///
/// The server sends the whole table and leaves searching to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StreetZoneMapping(pub BTreeMap<String, String>);

impl StreetZoneMapping {
    /// Exact street name lookup. Entries with a malformed zone are ignored.
    pub fn zone_for(&self, street: &str) -> Option<ZoneCode> {
        self.0
            .get(street.trim())
            .and_then(|zone| ZoneCode::parse(zone).ok())
    }

    /// Street names containing `fragment`, case-insensitively, sorted.
    pub fn search<'a>(&'a self, fragment: &str) -> Vec<&'a str> {
        let fragment = fragment.trim();
        self.0
            .keys()
            .filter(|name| contains_ignore_case(name, fragment))
            .map(String::as_str)
            .collect()
    }

    pub fn streets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Resource for StreetZoneMapping {
    const KIND: ResourceKind = ResourceKind::StreetZoneMapping;
}

/// A street's polyline on the map, `[lat, lon]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StreetWithCoordinates {
    pub name: String,
    #[serde(default)]
    pub coords: Vec<[f64; 2]>,
    pub zone: String,
}

/// Response of `/api/waste-collection/street-coordinates-mapping`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StreetCoordinates {
    #[serde(default)]
    pub streets: Vec<StreetWithCoordinates>,
}

impl Resource for StreetCoordinates {
    const KIND: ResourceKind = ResourceKind::StreetCoordinates;
}
