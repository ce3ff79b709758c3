use serde::Deserialize;

/// Request body for budget creation.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    pub amount: i64,
    pub category_id: i64,
}

/// Request body for partial budget updates; at least one field is required.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    pub amount: Option<i64>,
    pub category_id: Option<i64>,
}
