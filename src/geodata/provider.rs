use crate::models::GeoInsight;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Source of neighborhood points of interest and transit for an address
#[async_trait]
pub trait GeodataProvider: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<GeoInsight>;
}

struct CacheEntry {
    insight: GeoInsight,
    expires_at: Instant,
}

/// Caches another provider's results per normalized address for a fixed TTL.
///
/// Concurrent misses on the same key each fetch upstream; the last write wins.
pub struct CachedGeodataProvider<P> {
    inner: P,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl<P: GeodataProvider> CachedGeodataProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drop the cached entry for an address, if any
    pub async fn invalidate(&self, address: &str) {
        self.entries.write().await.remove(&cache_key(address));
    }

    /// Number of cached entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Trimmed, lowercased address with internal whitespace collapsed
pub fn cache_key(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[async_trait]
impl<P: GeodataProvider> GeodataProvider for CachedGeodataProvider<P> {
    async fn fetch(&self, address: &str) -> Result<GeoInsight> {
        let key = cache_key(address);

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if entry.expires_at > Instant::now() {
                    debug!(address = %key, "Geodata cache hit");
                    return Ok(entry.insight.clone());
                }
            }
        }

        debug!(address = %key, "Geodata cache miss");
        let insight = self.inner.fetch(address).await?;

        self.entries.write().await.insert(
            key,
            CacheEntry {
                insight: insight.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );

        Ok(insight)
    }
}
