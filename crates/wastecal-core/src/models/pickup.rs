use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// One upcoming collection, e.g. `{ "type": "Restmüll", "date": "2025-08-08" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Pickup {
    #[serde(rename = "type")]
    pub waste_type: String,
    pub date: String,
}

/// Response of `/api/waste-collection/{zone}/next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NextPickups {
    pub zone: String,
    /// UTC date (`YYYY-MM-DD`) the server computed this answer for.
    pub reference_date: String,
    #[serde(default)]
    pub next_pickups: Vec<Pickup>,
}

impl NextPickups {
    /// Date of the earliest upcoming collection, if any.
    pub fn next_date(&self) -> Option<&str> {
        self.next_pickups.iter().map(|p| p.date.as_str()).min()
    }

    /// All pickups falling on the earliest date.
    pub fn soonest(&self) -> Vec<&Pickup> {
        match self.next_date() {
            Some(date) => self.next_pickups.iter().filter(|p| p.date == date).collect(),
            None => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.next_pickups.is_empty()
    }
}

impl Resource for NextPickups {
    const KIND: ResourceKind = ResourceKind::NextPickups;

    fn scope(&self) -> Option<&str> {
        Some(&self.zone)
    }

    fn reference_date(&self) -> Option<&str> {
        Some(&self.reference_date)
    }
}
