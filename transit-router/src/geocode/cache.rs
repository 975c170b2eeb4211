//! Caching layer for geocoder lookups.
//!
//! Addresses are looked up repeatedly (the same home address, the same
//! office) and the public geocoder is rate limited, so successful lookups are
//! kept for a while. Misses are never cached: a typo fixed upstream should
//! resolve on the next try.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::Coordinates;

use super::Geocoder;
use super::error::GeocodeError;

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Geocoder with caching.
///
/// Wraps another geocoder and caches its successful answers, keyed by the
/// trimmed, lowercased query.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<String, Coordinates>,
}

impl<G: Geocoder + Send + Sync> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the wrapped geocoder for lookups that bypass the cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

impl<G: Geocoder + Send + Sync> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, query: &str) -> Result<Coordinates, GeocodeError> {
        let key = cache_key(query);

        // Try cache first
        if let Some(coords) = self.cache.get(&key).await {
            trace!(query, "Geocode cache hit");
            return Ok(coords);
        }

        let coords = self.inner.geocode(query).await?;
        self.cache.insert(key, coords).await;

        Ok(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::StaticGeocoder;

    fn marktplatz() -> Coordinates {
        Coordinates::new(49.0093, 8.4037)
    }

    #[test]
    fn default_config() {
        let config = GeocodeCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(86_400));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn keys_ignore_case_and_padding() {
        assert_eq!(cache_key("  Marktplatz Karlsruhe "), "marktplatz karlsruhe");
    }

    #[tokio::test]
    async fn repeated_lookup_hits_cache() {
        let inner = StaticGeocoder::new().with_address("Marktplatz", marktplatz());
        let geocoder = CachedGeocoder::new(inner, &GeocodeCacheConfig::default());

        assert_eq!(geocoder.geocode("Marktplatz").await.unwrap(), marktplatz());
        assert_eq!(geocoder.geocode("marktplatz ").await.unwrap(), marktplatz());
        assert_eq!(geocoder.inner().lookups(), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let inner = StaticGeocoder::new();
        let geocoder = CachedGeocoder::new(inner, &GeocodeCacheConfig::default());

        assert!(geocoder.geocode("Atlantis").await.unwrap_err().is_not_found());
        assert!(geocoder.geocode("Atlantis").await.is_err());
        assert_eq!(geocoder.inner().lookups(), 2);
    }

    #[tokio::test]
    async fn invalidate_forgets_entries() {
        let inner = StaticGeocoder::new().with_address("Marktplatz", marktplatz());
        let geocoder = CachedGeocoder::new(inner, &GeocodeCacheConfig::default());

        geocoder.geocode("Marktplatz").await.unwrap();
        geocoder.invalidate_cache();
        geocoder.geocode("Marktplatz").await.unwrap();
        assert_eq!(geocoder.inner().lookups(), 2);
    }
}
