// src/models.rs
use serde::{Serialize, Deserialize};

/// Investment goal as posted by the frontend simulator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub current_amount: f64,
    pub target_amount: f64,
    #[serde(rename = "timeHorizon")]
    pub time_horizon_years: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feasibility {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicLink {
    pub name: String,
    pub url: String,
}

/// One ranked market entry as produced by the text-generation upstream.
/// The backend validates shape only; the content is the model's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub country: String,
    pub required_annual_return: String,
    pub feasibility: Feasibility,
    pub top_sectors: Vec<String>,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub economic_links: Vec<EconomicLink>,
    pub investment_strategy: String,
}

/// Headline record in the shape the news page expects.
/// `published_at` keeps the upstream's YYYYMMDDHHMMSS digit string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub language: String,
    pub country: String,
    pub image_url: Option<String>,
}

/// GET /api/news payload. Exactly one of the flags is set when the articles
/// did not come from a fresh upstream fetch.
#[derive(Debug, Clone, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<NewsArticle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub balance: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}
