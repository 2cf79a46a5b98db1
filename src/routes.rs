// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;

use log::info;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::auth::{current_user, login, logout, register};
use crate::handlers::error::ApiError;
use crate::handlers::news::get_news;
use crate::handlers::simulate::simulate_investment;
use crate::services::auth::SessionSigner;
use crate::services::groq::GroqClient;
use crate::services::news_cache::NewsCache;
use crate::services::storage::MemStore;

// Map our error taxonomy (and warp's own rejections) to JSON error replies.
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(api_error) = err.find::<ApiError>() {
        (api_error.status(), api_error.message.clone())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    groq: Arc<GroqClient>,
    news: Arc<NewsCache>,
    users: Arc<MemStore>,
    sessions: Arc<SessionSigner>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let groq_filter = warp::any().map(move || groq.clone());
    let news_filter = warp::any().map(move || news.clone());
    let users_filter = warp::any().map(move || users.clone());
    let sessions_filter = warp::any().map(move || sessions.clone());

    let simulate_route = warp::path!("api" / "simulate-investment")
        .and(warp::post())
        .and(warp::body::json())
        .and(groq_filter)
        .and_then(simulate_investment);

    let news_route = warp::path!("api" / "news")
        .and(warp::get())
        .and(news_filter)
        .and_then(get_news);

    let register_route = warp::path!("api" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(users_filter.clone())
        .and(sessions_filter.clone())
        .and_then(register);

    let login_route = warp::path!("api" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(users_filter.clone())
        .and(sessions_filter.clone())
        .and_then(login);

    let logout_route = warp::path!("api" / "logout")
        .and(warp::post())
        .and_then(logout);

    let user_route = warp::path!("api" / "user")
        .and(warp::get())
        .and(warp::cookie::optional::<String>("session"))
        .and(users_filter)
        .and(sessions_filter)
        .and_then(current_user);

    info!("All routes configured successfully.");

    simulate_route
        .or(news_route)
        .or(register_route)
        .or(login_route)
        .or(logout_route)
        .or(user_route)
        .recover(handle_rejection)
}
