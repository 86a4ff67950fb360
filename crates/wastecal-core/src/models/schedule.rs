use std::collections::BTreeMap;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// Response of `/api/waste-collection/{zone}/schedule`.
///
/// `schedule` maps `YYYY-MM-DD` to the waste types collected that day, e.g.
/// `"2025-08-08": ["Restmüll", "Biomüll"]`. The map is ordered by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Schedule {
    pub zone: String,
    pub reference_date: String,
    #[serde(default)]
    pub schedule: BTreeMap<String, Vec<String>>,
}

impl Schedule {
    /// Collection days on or after `from`, in date order.
    pub fn upcoming<'a>(&'a self, from: &'a str) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.schedule
            .range::<str, _>((Bound::Included(from), Bound::Unbounded))
            .map(|(date, types)| (date.as_str(), types.as_slice()))
    }

    /// Every distinct waste type appearing in the schedule, sorted.
    pub fn waste_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .schedule
            .values()
            .flatten()
            .map(String::as_str)
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}

impl Resource for Schedule {
    const KIND: ResourceKind = ResourceKind::Schedule;

    fn scope(&self) -> Option<&str> {
        Some(&self.zone)
    }

    fn reference_date(&self) -> Option<&str> {
        Some(&self.reference_date)
    }
}
