use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser},
    error::ApiError,
    expenses::{
        dto::{CreateExpenseRequest, UpdateExpenseRequest},
        repo::{Expense, ExpenseWithCategory},
    },
    state::AppState,
    validation::parse_id,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", patch(update_expense).delete(delete_expense))
}

fn check_fields(
    amount: Option<f64>,
    description: Option<&str>,
    category_id: Option<i64>,
) -> Result<(), ApiError> {
    let mut details = Vec::new();
    if matches!(amount, Some(a) if a <= 0.0) {
        details.push("The amount must be positive.".into());
    }
    if matches!(description, Some(d) if d.len() > 255) {
        details.push("The description must be 255 characters or fewer.".into());
    }
    if matches!(category_id, Some(c) if c <= 0) {
        details.push("The category ID must be a positive integer.".into());
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation("Invalid input.", details))
    }
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ExpenseWithCategory>>, ApiError> {
    let expenses = Expense::list_by_user(&state.db, user_id).await?;
    Ok(Json(expenses))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    check_fields(
        Some(payload.amount),
        payload.description.as_deref(),
        Some(payload.category_id),
    )?;

    let expense = Expense::create(
        &state.db,
        user_id,
        payload.amount,
        payload.description.as_deref(),
        payload.date,
        payload.category_id,
    )
    .await?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    let expense_id = parse_id(&id)?;

    if payload.amount.is_none()
        && payload.description.is_none()
        && payload.date.is_none()
        && payload.category_id.is_none()
    {
        return Err(ApiError::bad_request("At least one field must be provided."));
    }
    check_fields(
        payload.amount,
        payload.description.as_deref(),
        payload.category_id,
    )?;

    if Expense::find_by_id(&state.db, expense_id).await?.is_none() {
        return Err(ApiError::not_found(
            "The expense you want to update could not be found.",
        ));
    }

    let updated = Expense::update(
        &state.db,
        expense_id,
        payload.amount,
        payload.description.as_deref(),
        payload.date,
        payload.category_id,
    )
    .await?;

    info!(expense_id = %expense_id, "expense updated");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let expense_id = parse_id(&id)?;

    let deleted = Expense::delete(&state.db, expense_id).await?;
    if deleted == 0 {
        return Err(ApiError::not_found(
            "The expense you want to delete could not be found.",
        ));
    }

    info!(expense_id = %expense_id, "expense deleted");
    Ok(Json(MessageResponse::new("Expense deleted successfully.")))
}
