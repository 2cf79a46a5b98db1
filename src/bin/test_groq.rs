// src/bin/test_groq.rs
// Manual probe: run one simulation round-trip against the live Groq API.
use std::env;
use std::time::Duration;

use dotenv::dotenv;

use panafrica_invest::models::GoalInput;
use panafrica_invest::services::calculations;
use panafrica_invest::services::groq::GroqClient;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let api_key = env::var("GROQ_API_KEY").expect("GROQ_API_KEY must be set");
    let client = GroqClient::new(
        api_key,
        "llama-3.3-70b-versatile".to_string(),
        Duration::from_secs(30),
        2,
    );

    let goal = GoalInput {
        current_amount: 1000.0,
        target_amount: 10000.0,
        time_horizon_years: 5,
    };
    let required = calculations::required_annual_return(&goal).unwrap();
    println!("Required annual return: {}%", required);

    match client.market_analysis(&goal, required).await {
        Ok(markets) => {
            println!("Got {} market entries:", markets.len());
            for market in &markets {
                println!(
                    "- {} ({:?} feasibility, sectors: {})",
                    market.country,
                    market.feasibility,
                    market.top_sectors.join(", ")
                );
            }
        }
        Err(e) => eprintln!("Request failed: {}", e),
    }
}
