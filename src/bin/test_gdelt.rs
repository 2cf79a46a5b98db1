// src/bin/test_gdelt.rs
// Manual probe: fetch one batch of headlines from the live GDELT API.
use std::time::Duration;

use dotenv::dotenv;

use panafrica_invest::services::gdelt::GdeltClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let client = GdeltClient::new(Duration::from_secs(10));
    match client.fetch_headlines().await {
        Ok(articles) => {
            println!("Got {} articles:", articles.len());
            for article in articles.iter().take(10) {
                println!("- [{}] {} ({})", article.country, article.title, article.source);
            }
        }
        Err(e) => eprintln!("Fetch failed: {}", e),
    }
}
