// src/services/news_cache.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{error, info};
use tokio::sync::{Mutex, RwLock};

use crate::models::{NewsArticle, NewsResponse};

#[async_trait]
pub trait NewsUpstream: Send + Sync {
    async fn fetch_headlines(&self) -> Result<Vec<NewsArticle>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Slot {
    articles: Vec<NewsArticle>,
    fetched_at: DateTime<Utc>,
}

/// Single shared slot holding the most recent successful fetch.
///
/// Within the TTL the slot is served as `cached`. Past the TTL the upstream
/// is refetched; on failure the old slot is served as `stale` (no state
/// transition), or the static fallback list as `fallback` when the slot was
/// never populated. Upstream trouble never surfaces as an error to callers.
pub struct NewsCache {
    upstream: Box<dyn NewsUpstream>,
    clock: Box<dyn Clock>,
    ttl: Duration,
    fallback: Vec<NewsArticle>,
    slot: RwLock<Option<Slot>>,
    refresh: Mutex<()>,
}

impl NewsCache {
    pub fn new(
        upstream: Box<dyn NewsUpstream>,
        clock: Box<dyn Clock>,
        ttl: Duration,
        fallback: Vec<NewsArticle>,
    ) -> Self {
        Self {
            upstream,
            clock,
            ttl,
            fallback,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    pub async fn headlines(&self) -> NewsResponse {
        if let Some(response) = self.fresh_from_slot().await {
            return response;
        }

        // One upstream call per expiry window: the first request through this
        // mutex refreshes the slot, waiters re-read it.
        let _guard = self.refresh.lock().await;
        if let Some(response) = self.fresh_from_slot().await {
            return response;
        }

        match self.upstream.fetch_headlines().await {
            Ok(articles) => {
                info!("news cache refreshed with {} articles", articles.len());
                let fetched_at = self.clock.now();
                *self.slot.write().await = Some(Slot {
                    articles: articles.clone(),
                    fetched_at,
                });
                NewsResponse {
                    articles,
                    cached: None,
                    stale: None,
                    fallback: None,
                }
            }
            Err(e) => {
                error!("news upstream fetch failed: {}", e);
                let slot = self.slot.read().await;
                match slot.as_ref() {
                    Some(slot) => NewsResponse {
                        articles: slot.articles.clone(),
                        cached: None,
                        stale: Some(true),
                        fallback: None,
                    },
                    None => NewsResponse {
                        articles: self.fallback.clone(),
                        cached: None,
                        stale: None,
                        fallback: Some(true),
                    },
                }
            }
        }
    }

    async fn fresh_from_slot(&self) -> Option<NewsResponse> {
        let slot = self.slot.read().await;
        let slot = slot.as_ref()?;
        if self.clock.now() - slot.fetched_at < self.ttl {
            Some(NewsResponse {
                articles: slot.articles.clone(),
                cached: Some(true),
                stale: None,
                fallback: None,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            url: format!("https://example.org/{}", title),
            source: "example.org".to_string(),
            published_at: "20250806120000".to_string(),
            language: "English".to_string(),
            country: "Kenya".to_string(),
            image_url: None,
        }
    }

    struct FixedClock {
        now: Arc<StdMutex<DateTime<Utc>>>,
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct ScriptedUpstream {
        responses: StdMutex<VecDeque<Result<Vec<NewsArticle>>>>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NewsUpstream for ScriptedUpstream {
        async fn fetch_headlines(&self) -> Result<Vec<NewsArticle>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }
    }

    struct Harness {
        cache: NewsCache,
        now: Arc<StdMutex<DateTime<Utc>>>,
        calls: Arc<AtomicUsize>,
    }

    fn harness(responses: Vec<Result<Vec<NewsArticle>>>) -> Harness {
        let now = Arc::new(StdMutex::new(
            Utc.with_ymd_and_hms(2025, 8, 6, 8, 0, 0).unwrap(),
        ));
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = NewsCache::new(
            Box::new(ScriptedUpstream {
                responses: StdMutex::new(responses.into_iter().collect()),
                calls: calls.clone(),
            }),
            Box::new(FixedClock { now: now.clone() }),
            Duration::hours(10),
            vec![article("fallback headline")],
        );
        Harness { cache, now, calls }
    }

    fn advance(h: &Harness, hours: i64) {
        let mut now = h.now.lock().unwrap();
        *now = *now + Duration::hours(hours);
    }

    #[tokio::test]
    async fn first_fetch_is_fresh_with_no_flags() {
        let h = harness(vec![Ok(vec![article("fresh")])]);
        let response = h.cache.headlines().await;
        assert_eq!(response.articles[0].title, "fresh");
        assert_eq!(response.cached, None);
        assert_eq!(response.stale, None);
        assert_eq!(response.fallback, None);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_cached_without_upstream_call() {
        let h = harness(vec![Ok(vec![article("fresh")])]);
        let first = h.cache.headlines().await;
        advance(&h, 9);
        let second = h.cache.headlines().await;
        assert_eq!(second.cached, Some(true));
        assert_eq!(second.articles[0].title, first.articles[0].title);
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_slot_with_failing_upstream_serves_stale() {
        let h = harness(vec![
            Ok(vec![article("old")]),
            Err(anyhow::anyhow!("upstream down")),
        ]);
        h.cache.headlines().await;
        advance(&h, 11);
        let response = h.cache.headlines().await;
        assert_eq!(response.stale, Some(true));
        assert_eq!(response.cached, None);
        assert_eq!(response.articles[0].title, "old");
        assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_cache_with_failing_upstream_serves_fallback() {
        let h = harness(vec![Err(anyhow::anyhow!("upstream down"))]);
        let response = h.cache.headlines().await;
        assert_eq!(response.fallback, Some(true));
        assert_eq!(response.articles[0].title, "fallback headline");
    }

    #[tokio::test]
    async fn expired_slot_refreshes_and_overwrites() {
        let h = harness(vec![Ok(vec![article("old")]), Ok(vec![article("new")])]);
        h.cache.headlines().await;
        advance(&h, 11);
        let refreshed = h.cache.headlines().await;
        assert_eq!(refreshed.articles[0].title, "new");
        assert_eq!(refreshed.cached, None);
        let cached = h.cache.headlines().await;
        assert_eq!(cached.articles[0].title, "new");
        assert_eq!(cached.cached, Some(true));
    }

    #[tokio::test]
    async fn concurrent_misses_trigger_a_single_upstream_call() {
        let h = harness(vec![Ok(vec![article("fresh")])]);
        let (a, b) = tokio::join!(h.cache.headlines(), h.cache.headlines());
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.articles[0].title, "fresh");
        assert_eq!(b.articles[0].title, "fresh");
    }

    #[tokio::test]
    async fn stale_serve_does_not_transition_state() {
        // After a failed refresh the old slot stays; a later successful
        // refresh replaces it.
        let h = harness(vec![
            Ok(vec![article("old")]),
            Err(anyhow::anyhow!("blip")),
            Ok(vec![article("recovered")]),
        ]);
        h.cache.headlines().await;
        advance(&h, 11);
        assert_eq!(h.cache.headlines().await.stale, Some(true));
        let recovered = h.cache.headlines().await;
        assert_eq!(recovered.articles[0].title, "recovered");
        assert_eq!(recovered.stale, None);
    }
}
