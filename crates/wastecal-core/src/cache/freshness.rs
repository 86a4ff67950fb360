//! Decides whether a stored entry may be served.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::resource::Resource;

use super::CacheEntry;

/// Standard maximum age for every resource kind.
pub const DEFAULT_MAX_AGE_SECS: i64 = 5 * 60;

pub fn default_max_age() -> Duration {
    Duration::seconds(DEFAULT_MAX_AGE_SECS)
}

/// What a lookup is asking for.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessContext<'a> {
    /// Zone the caller wants; `None` for global kinds.
    pub scope: Option<&'a str>,
    /// Today as `YYYY-MM-DD`.
    pub today: &'a str,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    ScopeMismatch,
    ReferenceDateMismatch,
    Expired,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::ScopeMismatch => write!(f, "scope mismatch"),
            StaleReason::ReferenceDateMismatch => write!(f, "reference date is not today"),
            StaleReason::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(StaleReason),
}

impl Freshness {
    pub fn is_fresh(self) -> bool {
        self == Freshness::Fresh
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub require_date_match: bool,
    pub max_age: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            require_date_match: false,
            max_age: default_max_age(),
        }
    }
}

impl FreshnessPolicy {
    pub fn new(require_date_match: bool, max_age: Duration) -> Self {
        Self {
            require_date_match,
            max_age,
        }
    }

    /// Checks run in order and stop at the first failure: scope, then
    /// reference date, then age. A zone switch is the common case and needs
    /// no date handling.
    pub fn evaluate<T: Resource>(&self, entry: &CacheEntry<T>, ctx: &FreshnessContext<'_>) -> Freshness {
        if let Some(scope) = ctx.scope {
            if entry.payload.scope() != Some(scope) {
                return Freshness::Stale(StaleReason::ScopeMismatch);
            }
        }

        if self.require_date_match && entry.payload.reference_date() != Some(ctx.today) {
            return Freshness::Stale(StaleReason::ReferenceDateMismatch);
        }

        // Clock skew: an entry from the future has age zero
        let age = (ctx.now - entry.cached_at).max(Duration::zero());
        if age > self.max_age {
            return Freshness::Stale(StaleReason::Expired);
        }

        Freshness::Fresh
    }

    pub fn is_valid<T: Resource>(&self, entry: &CacheEntry<T>, ctx: &FreshnessContext<'_>) -> bool {
        self.evaluate(entry, ctx).is_fresh()
    }
}
