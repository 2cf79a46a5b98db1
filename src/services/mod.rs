pub mod auth;
pub mod calculations;
pub mod gdelt;
pub mod groq;
pub mod news_cache;
pub mod storage;
