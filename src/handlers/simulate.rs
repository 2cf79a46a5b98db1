// src/handlers/simulate.rs
use std::sync::Arc;

use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::GoalInput;
use crate::services::calculations;
use crate::services::groq::{GroqClient, GroqError};

pub async fn simulate_investment(
    input: GoalInput,
    groq: Arc<GroqClient>,
) -> Result<Json, Rejection> {
    info!(
        "Handling investment simulation: {} -> {} over {} years",
        input.current_amount, input.target_amount, input.time_horizon_years
    );

    // Validation happens before anything touches the upstream.
    let required_return = calculations::required_annual_return(&input).map_err(|e| {
        error!("Invalid simulation input: {}", e);
        warp::reject::custom(ApiError::invalid_input(e.to_string()))
    })?;

    info!("Required annual return: {}%", required_return);

    match groq.market_analysis(&input, required_return).await {
        Ok(markets) => Ok(warp::reply::json(&markets)),
        Err(e) => {
            error!("Failed to generate market analysis: {}", e);
            let api_error = match e {
                GroqError::Unavailable(_) => ApiError::upstream_unavailable(e.to_string()),
                GroqError::Format(_) => ApiError::upstream_format(e.to_string()),
            };
            Err(warp::reject::custom(api_error))
        }
    }
}
