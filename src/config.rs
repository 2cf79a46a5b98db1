// src/config.rs
use std::env;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::warn;
use rand::RngCore;

const DEFAULT_PORT: &str = "3030";
const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_GROQ_TIMEOUT_SECS: &str = "30";
const DEFAULT_GROQ_MAX_RETRIES: &str = "2";
const DEFAULT_NEWS_TTL_HOURS: &str = "10";
const DEFAULT_NEWS_TIMEOUT_SECS: &str = "10";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub groq_api_key: String,
    pub groq_model: String,
    pub groq_timeout: Duration,
    pub groq_max_retries: u32,
    pub news_ttl: chrono::Duration,
    pub news_timeout: Duration,
    pub session_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", DEFAULT_PORT)
            .parse()
            .expect("PORT must be a number");

        let groq_api_key = env::var("GROQ_API_KEY").unwrap_or_else(|_| {
            warn!("$GROQ_API_KEY not set, simulation requests will fail");
            String::new()
        });

        let groq_timeout_secs: u64 = env_or("GROQ_TIMEOUT_SECS", DEFAULT_GROQ_TIMEOUT_SECS)
            .parse()
            .expect("GROQ_TIMEOUT_SECS must be a number");
        let groq_max_retries: u32 = env_or("GROQ_MAX_RETRIES", DEFAULT_GROQ_MAX_RETRIES)
            .parse()
            .expect("GROQ_MAX_RETRIES must be a number");
        let news_ttl_hours: i64 = env_or("NEWS_TTL_HOURS", DEFAULT_NEWS_TTL_HOURS)
            .parse()
            .expect("NEWS_TTL_HOURS must be a number");
        let news_timeout_secs: u64 = env_or("NEWS_TIMEOUT_SECS", DEFAULT_NEWS_TIMEOUT_SECS)
            .parse()
            .expect("NEWS_TIMEOUT_SECS must be a number");

        let session_secret = env::var("SESSION_SECRET").unwrap_or_else(|_| {
            warn!("$SESSION_SECRET not set, using an ephemeral secret; sessions will not survive restarts");
            let mut secret = [0u8; 32];
            rand::rng().fill_bytes(&mut secret);
            BASE64.encode(secret)
        });

        Self {
            port,
            groq_api_key,
            groq_model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            groq_timeout: Duration::from_secs(groq_timeout_secs),
            groq_max_retries,
            news_ttl: chrono::Duration::hours(news_ttl_hours),
            news_timeout: Duration::from_secs(news_timeout_secs),
            session_secret,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("${} not set, defaulting to {}", key, default);
        default.to_string()
    })
}
