// src/handlers/news.rs
use std::sync::Arc;

use log::info;
use warp::reply::Json;
use warp::Rejection;

use crate::services::news_cache::NewsCache;

/// Upstream trouble degrades to stale or fallback articles inside the cache,
/// so this handler never rejects.
pub async fn get_news(news: Arc<NewsCache>) -> Result<Json, Rejection> {
    info!("Handling request to get news headlines");
    let response = news.headlines().await;
    Ok(warp::reply::json(&response))
}
