use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::dto::MessageResponse,
    categories::{
        dto::{CreateCategoryRequest, UpdateCategoryRequest},
        repo::Category,
    },
    error::ApiError,
    state::AppState,
    validation::parse_id,
};

// Categories are a shared reference set and are served without
// authentication.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).patch(update_category).delete(delete_category),
        )
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = Category::list(&state.db).await?;
    if categories.is_empty() {
        return Err(ApiError::not_found(
            "The requested categories could not be found.",
        ));
    }
    Ok(Json(categories))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category_id = parse_id(&id)?;
    let category = Category::find_by_id(&state.db, category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("The requested category could not be found."))?;
    Ok(Json(category))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("The category name is required."));
    }
    if name.len() > 50 {
        return Err(ApiError::bad_request(
            "The category name must be 50 characters or fewer.",
        ));
    }

    let category = Category::create(&state.db, name).await?;
    info!(category_id = %category.id, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let category_id = parse_id(&id)?;

    let category = Category::find_by_id(&state.db, category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("The requested category could not be found."))?;

    let updated = match payload.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Category::rename(&state.db, category_id, name).await?,
        _ => category,
    };

    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let category_id = parse_id(&id)?;

    let deleted = Category::delete(&state.db, category_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found(
            "The requested category could not be found.",
        ));
    }

    info!(category_id = %category_id, "category deleted");
    Ok(Json(MessageResponse::new("Category deleted successfully.")))
}
