use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MessageResponse, PublicUser, RefreshRequest,
            RefreshResponse, RegisterRequest,
        },
        jwt::{JwtKeys, TokenError},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
    validation::{validate_email, validate_password},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    // Both validators run before either failure aborts, so a client with a
    // bad email still learns about its bad password on the next attempt.
    let email_check = validate_email(&payload.email).await;
    let password_check = validate_password(&payload.password);
    let email = email_check?;
    password_check?;

    // Friendly pre-check; the unique constraint on users.email is the
    // authoritative guard against concurrent registrations.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::conflict(
            "Email address not available.",
            vec!["The email address is already associated with another account.".into()],
        ));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &email, &hash).await?;

    info!(user_id = %user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully.")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Lookup uses the email exactly as submitted; only registration
    // normalizes.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login with unknown email");
            return Err(ApiError::unauthorized_with(
                "Invalid credentials.",
                vec!["No account found with this email.".into()],
            ));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::unauthorized_with(
            "Incorrect password.",
            vec!["The provided credentials are incorrect.".into()],
        ));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    if payload.refresh_token.is_empty() {
        return Err(ApiError::forbidden("Unauthorized access."));
    }

    let keys = JwtKeys::from_ref(&state);
    let claims = match keys.verify_refresh(&payload.refresh_token) {
        Ok(c) => c,
        Err(TokenError::Expired) => {
            warn!("refresh with expired token");
            return Err(ApiError::forbidden_with(
                "Session expired.",
                vec!["Please log in again.".into()],
            ));
        }
        Err(TokenError::Invalid) => {
            warn!("refresh with invalid token");
            return Err(ApiError::forbidden("Unauthorized access."));
        }
    };

    let access_token = keys.sign_access(claims.sub)?;
    Ok(Json(RefreshResponse { access_token }))
}
