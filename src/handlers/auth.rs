// src/handlers/auth.rs
use std::sync::Arc;

use log::{error, info};
use warp::reply::Reply;
use warp::Rejection;

use super::error::ApiError;
use crate::models::{LoginInput, RegisterInput, User};
use crate::services::auth::{hash_password, verify_password, SessionSigner};
use crate::services::storage::{MemStore, NewUser, UserStore};

const SESSION_COOKIE: &str = "session";
const MIN_PASSWORD_LEN: usize = 8;

pub async fn register(
    input: RegisterInput,
    users: Arc<MemStore>,
    sessions: Arc<SessionSigner>,
) -> Result<impl Reply, Rejection> {
    info!("Handling registration for {}", input.email);

    validate_register(&input).map_err(|msg| warp::reject::custom(ApiError::invalid_input(msg)))?;

    if users.get_user_by_email(&input.email).is_some() {
        return Err(warp::reject::custom(ApiError::conflict(
            "Email already registered",
        )));
    }

    let user = users
        .create_user(NewUser {
            email: input.email,
            username: input.username,
            password_hash: hash_password(&input.password),
        })
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            warp::reject::custom(ApiError::conflict(e.to_string()))
        })?;

    session_reply(&user, &sessions)
}

pub async fn login(
    input: LoginInput,
    users: Arc<MemStore>,
    sessions: Arc<SessionSigner>,
) -> Result<impl Reply, Rejection> {
    info!("Handling login for {}", input.email);

    let user = users.get_user_by_email(&input.email).ok_or_else(|| {
        warp::reject::custom(ApiError::unauthorized("Invalid credentials"))
    })?;

    if !verify_password(&input.password, &user.password_hash) {
        return Err(warp::reject::custom(ApiError::unauthorized(
            "Invalid credentials",
        )));
    }

    session_reply(&user, &sessions)
}

pub async fn logout() -> Result<impl Reply, Rejection> {
    info!("Handling logout");
    Ok(warp::reply::with_header(
        warp::reply::json(&serde_json::json!({ "success": true })),
        "set-cookie",
        format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE),
    ))
}

pub async fn current_user(
    session: Option<String>,
    users: Arc<MemStore>,
    sessions: Arc<SessionSigner>,
) -> Result<impl Reply, Rejection> {
    let token = session.ok_or_else(|| {
        warp::reject::custom(ApiError::unauthorized("Not authenticated"))
    })?;

    let user_id = sessions.user_id(&token).map_err(|_| {
        warp::reject::custom(ApiError::unauthorized("Not authenticated"))
    })?;

    let user = users.get_user(&user_id).ok_or_else(|| {
        warp::reject::custom(ApiError::not_found("User not found"))
    })?;

    Ok(warp::reply::json(&user))
}

fn validate_register(input: &RegisterInput) -> Result<(), String> {
    if input.email.trim().is_empty() || !input.email.contains('@') {
        return Err("email must be a valid address".to_string());
    }
    if input.username.trim().is_empty() {
        return Err("username must not be empty".to_string());
    }
    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

fn session_reply(user: &User, sessions: &SessionSigner) -> Result<impl Reply, Rejection> {
    let token = sessions.issue(&user.id).map_err(|e| {
        error!("Failed to issue session token: {}", e);
        warp::reject::custom(ApiError::internal("Failed to create session"))
    })?;

    Ok(warp::reply::with_header(
        warp::reply::json(user),
        "set-cookie",
        format!("{}={}; HttpOnly; Path=/; SameSite=Lax", SESSION_COOKIE, token),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            email: email.to_string(),
            username: "amara".to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn register_validation() {
        assert!(validate_register(&register_input("amara@example.com", "longenough")).is_ok());
        assert!(validate_register(&register_input("not-an-email", "longenough")).is_err());
        assert!(validate_register(&register_input("amara@example.com", "short")).is_err());
        let mut blank_name = register_input("amara@example.com", "longenough");
        blank_name.username = "  ".to_string();
        assert!(validate_register(&blank_name).is_err());
    }

    #[tokio::test]
    async fn register_login_current_user_flow() {
        let users = Arc::new(MemStore::new());
        let sessions = Arc::new(SessionSigner::new("test-secret"));

        let created = register(
            register_input("amara@example.com", "longenough"),
            users.clone(),
            sessions.clone(),
        )
        .await;
        assert!(created.is_ok());

        // Wrong password is rejected, right one logs in.
        let bad = login(
            LoginInput {
                email: "amara@example.com".to_string(),
                password: "wrongpassword".to_string(),
            },
            users.clone(),
            sessions.clone(),
        )
        .await;
        assert!(bad.is_err());

        let good = login(
            LoginInput {
                email: "amara@example.com".to_string(),
                password: "longenough".to_string(),
            },
            users.clone(),
            sessions.clone(),
        )
        .await;
        assert!(good.is_ok());

        let user = users.get_user_by_email("amara@example.com").unwrap();
        let token = sessions.issue(&user.id).unwrap();
        let me = current_user(Some(token), users.clone(), sessions.clone()).await;
        assert!(me.is_ok());

        let anonymous = current_user(None, users.clone(), sessions.clone()).await;
        assert!(anonymous.is_err());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let users = Arc::new(MemStore::new());
        let sessions = Arc::new(SessionSigner::new("test-secret"));

        register(
            register_input("amara@example.com", "longenough"),
            users.clone(),
            sessions.clone(),
        )
        .await
        .unwrap();

        let second = register(
            register_input("amara@example.com", "otherpassword"),
            users.clone(),
            sessions.clone(),
        )
        .await;
        assert!(second.is_err());
    }
}
