use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use log::info;
use warp::Filter;

use panafrica_invest::config::AppConfig;
use panafrica_invest::routes;
use panafrica_invest::services::auth::SessionSigner;
use panafrica_invest::services::gdelt::{self, GdeltClient};
use panafrica_invest::services::groq::GroqClient;
use panafrica_invest::services::news_cache::{NewsCache, SystemClock};
use panafrica_invest::services::storage::MemStore;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env();
    info!("Using PORT: {}", config.port);

    // Bind to 0.0.0.0 for containerized deployments
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let users = Arc::new(MemStore::new());
    let sessions = Arc::new(SessionSigner::new(&config.session_secret));
    let groq = Arc::new(GroqClient::new(
        config.groq_api_key.clone(),
        config.groq_model.clone(),
        config.groq_timeout,
        config.groq_max_retries,
    ));
    let news = Arc::new(NewsCache::new(
        Box::new(GdeltClient::new(config.news_timeout)),
        Box::new(SystemClock),
        config.news_ttl,
        gdelt::fallback_articles(),
    ));

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    // Set up routes
    let api = routes::routes(groq, news, users, sessions).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
