use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use crate::models::Candidate;
use crate::services::api::{ApiError, CandidateProvider};

/// Cache key for the full candidate list
const CANDIDATES_KEY: &str = "candidates";

/// In-memory TTL cache in front of a candidate provider
///
/// The candidate list is fetched once and shared until the entry expires.
/// Concurrent misses are coalesced into a single upstream request.
pub struct CandidateCache<P> {
    provider: P,
    cache: Cache<&'static str, Arc<Vec<Candidate>>>,
}

impl<P: CandidateProvider> CandidateCache<P> {
    pub fn new(provider: P, ttl_secs: u64, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity.max(1))
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { provider, cache }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the candidate list, fetching it on a miss
    pub async fn candidates(&self) -> Result<Arc<Vec<Candidate>>, Arc<ApiError>> {
        if let Some(hit) = self.cache.get(CANDIDATES_KEY).await {
            tracing::trace!("Candidate cache hit ({} entries)", hit.len());
            return Ok(hit);
        }

        tracing::trace!("Candidate cache miss");
        self.cache
            .try_get_with(CANDIDATES_KEY, async {
                let candidates = self.provider.fetch_candidates().await?;
                tracing::debug!("Cached {} candidates", candidates.len());
                Ok::<_, ApiError>(Arc::new(candidates))
            })
            .await
    }

    /// Drop the cached list so the next call refetches
    pub async fn invalidate(&self) {
        self.cache.invalidate(CANDIDATES_KEY).await;
        tracing::debug!("Invalidated candidate cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CandidateProvider for CountingProvider {
        async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::ApiError("upstream down".to_string()));
            }
            Ok(vec![Candidate {
                id: "1".to_string(),
                name: "Barbar".to_string(),
                rating: Some(4.2),
                point: Some(GeoPoint::new(33.8938, 35.5018)),
            }])
        }
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache = CandidateCache::new(CountingProvider { calls: AtomicUsize::new(0), fail: false }, 60, 4);

        assert_eq!(cache.candidates().await.unwrap().len(), 1);
        assert_eq!(cache.candidates().await.unwrap().len(), 1);
        assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 1);

        cache.invalidate().await;
        cache.candidates().await.unwrap();
        assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = CandidateCache::new(CountingProvider { calls: AtomicUsize::new(0), fail: true }, 60, 4);

        assert!(cache.candidates().await.is_err());
        assert!(cache.candidates().await.is_err());
        assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 2);
    }
}
