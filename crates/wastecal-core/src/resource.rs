//! The independently cached data categories served by the waste collection API.

use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    NextPickups,
    Schedule,
    StreetZoneMapping,
    DownloadLinks,
    StreetCoordinates,
}

impl ResourceKind {
    /// Default slot name in the persistent store.
    pub fn slot_key(self) -> &'static str {
        match self {
            ResourceKind::NextPickups => "nextPickups",
            ResourceKind::Schedule => "schedule",
            ResourceKind::StreetZoneMapping => "streetZoneMapping",
            ResourceKind::DownloadLinks => "downloadLinksAvailability",
            ResourceKind::StreetCoordinates => "streetCoordinatesMapping",
        }
    }

    /// Zone-scoped kinds need a zone code to be fetched.
    pub fn requires_scope(self) -> bool {
        matches!(self, ResourceKind::NextPickups | ResourceKind::Schedule)
    }

    /// Whether a stored entry must carry today's `reference_date` to be served.
    pub fn requires_date_match(self) -> bool {
        self.requires_scope()
    }

    /// Request path relative to the API base URL.
    ///
    /// Returns `None` for a zone-scoped kind when no zone was given.
    pub fn path(self, scope: Option<&str>) -> Option<String> {
        match self {
            ResourceKind::NextPickups => scope.map(|zone| format!("/api/waste-collection/{}/next", zone)),
            ResourceKind::Schedule => scope.map(|zone| format!("/api/waste-collection/{}/schedule", zone)),
            ResourceKind::StreetZoneMapping => {
                Some("/api/waste-collection/street-zone-mapping".to_string())
            }
            ResourceKind::DownloadLinks => {
                Some("/api/waste-collection/download-links-availability".to_string())
            }
            ResourceKind::StreetCoordinates => {
                Some("/api/waste-collection/street-coordinates-mapping".to_string())
            }
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slot_key())
    }
}

/// A payload type that can be fetched and cached.
///
/// `scope` and `reference_date` expose the fields the freshness policy
/// checks; global kinds keep the defaults.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn scope(&self) -> Option<&str> {
        None
    }

    fn reference_date(&self) -> Option<&str> {
        None
    }
}
