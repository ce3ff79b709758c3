use serde::Deserialize;
use time::Date;

/// Request body for expense creation.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub category_id: i64,
}

/// Request body for partial expense updates; at least one field is required.
#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub category_id: Option<i64>,
}
