// src/services/gdelt.rs
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::Deserialize;

use crate::models::NewsArticle;
use crate::services::news_cache::NewsUpstream;

const GDELT_DOC_API: &str = "https://api.gdeltproject.org/api/v2/doc/doc";
const NEWS_QUERY: &str =
    "(africa OR african) (economy OR investment OR \"financial markets\") sourcelang:english";
const MAX_RECORDS: usize = 30;

/// Headline search client for the GDELT DOC 2.0 API.
pub struct GdeltClient {
    client: Client,
    base_url: String,
}

impl GdeltClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent("Mozilla/5.0 (compatible; PanafricaInvest/1.0)")
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: GDELT_DOC_API.to_string(),
        }
    }

    pub async fn fetch_headlines(&self) -> Result<Vec<NewsArticle>> {
        info!("Fetching headlines from GDELT: query='{}'", NEWS_QUERY);

        let maxrecords = MAX_RECORDS.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("query", NEWS_QUERY),
                ("mode", "ArtList"),
                ("format", "json"),
                ("maxrecords", maxrecords.as_str()),
                ("sort", "DateDesc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("GDELT returned status {}", response.status());
        }

        let body: GdeltResponse = response.json().await?;
        let articles: Vec<NewsArticle> = body
            .articles
            .into_iter()
            .filter_map(map_article)
            .collect();

        info!("GDELT returned {} usable articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl NewsUpstream for GdeltClient {
    async fn fetch_headlines(&self) -> Result<Vec<NewsArticle>> {
        GdeltClient::fetch_headlines(self).await
    }
}

#[derive(Debug, Deserialize)]
struct GdeltResponse {
    #[serde(default)]
    articles: Vec<GdeltArticle>,
}

#[derive(Debug, Deserialize)]
struct GdeltArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    domain: String,
    #[serde(default)]
    seendate: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    sourcecountry: String,
    #[serde(default)]
    socialimage: String,
}

fn map_article(raw: GdeltArticle) -> Option<NewsArticle> {
    if raw.title.is_empty() || raw.url.is_empty() {
        return None;
    }

    // seendate arrives as "20250806T120000Z"; the frontend expects the plain
    // digit form YYYYMMDDHHMMSS.
    let published_at: String = raw.seendate.chars().filter(|c| c.is_ascii_digit()).collect();

    Some(NewsArticle {
        title: raw.title,
        url: raw.url,
        source: raw.domain,
        published_at,
        language: raw.language,
        country: raw.sourcecountry,
        image_url: if raw.socialimage.is_empty() {
            None
        } else {
            Some(raw.socialimage)
        },
    })
}

/// Static headlines served when the cache is empty and the upstream is down.
pub fn fallback_articles() -> Vec<NewsArticle> {
    let entries = [
        (
            "African Continental Free Trade Area opens new cross-border investment corridors",
            "https://www.theeastafrican.co.ke/tea/business",
            "theeastafrican.co.ke",
            "Kenya",
        ),
        (
            "Nigerian fintech startups draw record venture funding",
            "https://businessday.ng/category/markets",
            "businessday.ng",
            "Nigeria",
        ),
        (
            "Egypt expands renewable energy capacity with new solar projects",
            "https://www.egypttoday.com/Section/3/Business",
            "egypttoday.com",
            "Egypt",
        ),
        (
            "South African equities rally as commodity prices firm",
            "https://www.dailymaverick.co.za/section/business-maverick",
            "dailymaverick.co.za",
            "South Africa",
        ),
        (
            "Ghana's cocoa sector modernization attracts institutional investors",
            "https://www.myjoyonline.com/business",
            "myjoyonline.com",
            "Ghana",
        ),
    ];

    entries
        .iter()
        .map(|(title, url, source, country)| NewsArticle {
            title: title.to_string(),
            url: url.to_string(),
            source: source.to_string(),
            published_at: String::new(),
            language: "English".to_string(),
            country: country.to_string(),
            image_url: None,
        })
        .collect()
}
