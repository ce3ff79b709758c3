use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{MessageResponse, PublicUser},
        jwt::AuthUser,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
    users::dto::{ProfileResponse, UpdateProfileRequest},
    validation::{validate_email, validate_password},
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).patch(update_me).delete(delete_me))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(PublicUser {
        id: user.id,
        email: user.email,
        created_at: user.created_at,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    let mut new_email: Option<String> = None;
    if let Some(email) = payload.email.as_deref() {
        // Same email is a no-op, not an error
        if email != user.email {
            if User::find_by_email(&state.db, email).await?.is_some() {
                warn!(user_id = %user_id, "email change to taken address");
                return Err(ApiError::conflict(
                    "Email address not available.",
                    vec!["The email address is already associated with another account.".into()],
                ));
            }
            let normalized = validate_email(email).await?;
            new_email = Some(normalized);
        }
    }

    let mut new_hash: Option<String> = None;
    if let Some(password) = payload.password.as_deref() {
        let old_password = payload.old_password.as_deref().ok_or_else(|| {
            ApiError::bad_request("The current password is required to set a new one.")
        })?;

        if !verify_password(old_password, &user.password_hash)? {
            warn!(user_id = %user_id, "password change with wrong current password");
            return Err(ApiError::bad_request("The current password is incorrect."));
        }

        if verify_password(password, &user.password_hash)? {
            return Err(ApiError::bad_request(
                "The new password must be different from the current one.",
            ));
        }

        validate_password(password)?;
        new_hash = Some(hash_password(password)?);
    }

    let updated = User::update(&state.db, user_id, new_email.as_deref(), new_hash.as_deref())
        .await?;

    info!(user_id = %user_id, "profile updated");
    Ok(Json(ProfileResponse {
        email: updated.email,
        created_at: updated.created_at,
        updated_at: updated.updated_at,
    }))
}

#[instrument(skip(state))]
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = User::delete(&state.db, user_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found("User not found."));
    }

    info!(user_id = %user_id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully.")))
}
