use futures::future::BoxFuture;

use super::ApiError;

/// Produces a fresh payload from the remote source.
///
/// `scope` is the zone code for zone-scoped kinds and `None` otherwise.
/// Errors are handed back to the caller unchanged by the cache.
pub trait Fetcher<T>: Send + Sync {
    fn fetch<'a>(&'a self, scope: Option<&'a str>) -> BoxFuture<'a, Result<T, ApiError>>;
}
