use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser},
    budgets::{
        dto::{CreateBudgetRequest, UpdateBudgetRequest},
        repo::{Budget, BudgetWithCategory},
    },
    error::ApiError,
    state::AppState,
    validation::parse_id,
};

pub fn budget_routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/:id", patch(update_budget).delete(delete_budget))
}

/// Alert threshold: 80% of the allocated amount, rounded to the nearest
/// integer. Recomputed on create and on every update that touches `amount`.
pub fn alert_threshold(amount: i64) -> i64 {
    (amount as f64 * 0.8).round() as i64
}

#[instrument(skip(state))]
pub async fn list_budgets(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<BudgetWithCategory>>, ApiError> {
    let budgets = Budget::list_by_user(&state.db, user_id).await?;
    Ok(Json(budgets))
}

#[instrument(skip(state, payload))]
pub async fn create_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<Budget>), ApiError> {
    let mut details = Vec::new();
    if payload.amount <= 0 {
        details.push("The amount must be a positive integer.".into());
    }
    if payload.category_id <= 0 {
        details.push("The category ID must be a positive integer.".into());
    }
    if !details.is_empty() {
        return Err(ApiError::validation("Invalid input.", details));
    }

    // Friendly pre-check; the unique (user_id, category_id) constraint is the
    // authoritative guard under concurrency.
    if Budget::find_by_user_and_category(&state.db, user_id, payload.category_id)
        .await?
        .is_some()
    {
        warn!(user_id = %user_id, category_id = %payload.category_id, "duplicate budget");
        return Err(ApiError::bad_request(
            "You already have a budget for this category.",
        ));
    }

    let alert = alert_threshold(payload.amount);
    let budget =
        Budget::create(&state.db, user_id, payload.amount, alert, payload.category_id).await?;

    info!(user_id = %user_id, budget_id = %budget.id, "budget created");
    Ok((StatusCode::CREATED, Json(budget)))
}

#[instrument(skip(state, payload))]
pub async fn update_budget(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> Result<Json<Budget>, ApiError> {
    let budget_id = parse_id(&id)?;

    if payload.amount.is_none() && payload.category_id.is_none() {
        return Err(ApiError::bad_request("At least one field must be provided."));
    }

    let mut details = Vec::new();
    if matches!(payload.amount, Some(a) if a <= 0) {
        details.push("The amount must be a positive integer.".into());
    }
    if matches!(payload.category_id, Some(c) if c <= 0) {
        details.push("The category ID must be a positive integer.".into());
    }
    if !details.is_empty() {
        return Err(ApiError::validation("Invalid input.", details));
    }

    let budget = Budget::find_by_id(&state.db, budget_id)
        .await?
        .ok_or_else(|| ApiError::not_found("The budget you want to update could not be found."))?;

    // Uniqueness is re-checked only when the category actually changes, and
    // before any field is applied.
    if let Some(category_id) = payload.category_id {
        if category_id != budget.category_id
            && Budget::find_by_user_and_category(&state.db, user_id, category_id)
                .await?
                .is_some()
        {
            warn!(user_id = %user_id, category_id = %category_id, "duplicate budget on update");
            return Err(ApiError::bad_request(
                "A budget already exists for this user and this category.",
            ));
        }
    }

    let amount = payload.amount.unwrap_or(budget.amount);
    let category_id = payload.category_id.unwrap_or(budget.category_id);
    // Recomputed from the post-update amount whenever the request includes
    // it, even resubmitted unchanged.
    let alert = if payload.amount.is_some() {
        alert_threshold(amount)
    } else {
        budget.alert
    };

    let updated = Budget::update(&state.db, budget_id, amount, alert, category_id).await?;

    info!(budget_id = %budget_id, "budget updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_budget(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let budget_id = parse_id(&id)?;

    let deleted = Budget::delete(&state.db, budget_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found(
            "The budget you want to delete could not be found.",
        ));
    }

    info!(budget_id = %budget_id, "budget deleted");
    Ok(Json(MessageResponse::new("Budget deleted successfully.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_is_eighty_percent_rounded() {
        assert_eq!(alert_threshold(500), 400);
        assert_eq!(alert_threshold(625), 500);
        assert_eq!(alert_threshold(100), 80);
    }

    #[test]
    fn alert_rounds_to_nearest() {
        // 3 * 0.8 = 2.4 rounds down, 13 * 0.8 = 10.4 rounds down
        assert_eq!(alert_threshold(3), 2);
        assert_eq!(alert_threshold(13), 10);
        // 999 * 0.8 = 799.2
        assert_eq!(alert_threshold(999), 799);
        // 2 * 0.8 = 1.6 rounds up
        assert_eq!(alert_threshold(2), 2);
    }

    #[test]
    fn alert_of_zero_is_zero() {
        assert_eq!(alert_threshold(0), 0);
    }
}
