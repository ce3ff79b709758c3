use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::Date;

/// Expense record. No derived fields; foreign keys are the only invariants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub category_id: i64,
    pub user_id: i64,
}

/// Expense joined with its category name for list responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseWithCategory {
    pub id: i64,
    pub amount: f64,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub category_id: i64,
    pub user_id: i64,
    pub category_name: String,
}

impl Expense {
    pub async fn list_by_user(
        db: &PgPool,
        user_id: i64,
    ) -> anyhow::Result<Vec<ExpenseWithCategory>> {
        let rows = sqlx::query_as::<_, ExpenseWithCategory>(
            r#"
            SELECT e.id, e.amount, e.description, e.date, e.category_id, e.user_id,
                   c.name AS category_name
            FROM expense e
            JOIN category c ON c.id = e.category_id
            WHERE e.user_id = $1
            ORDER BY e.date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Expense>> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, amount, description, date, category_id, user_id
            FROM expense
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(expense)
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        amount: f64,
        description: Option<&str>,
        date: Option<Date>,
        category_id: i64,
    ) -> anyhow::Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expense (amount, description, date, category_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, amount, description, date, category_id, user_id
            "#,
        )
        .bind(amount)
        .bind(description)
        .bind(date)
        .bind(category_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(expense)
    }

    /// Partial update; absent fields are left untouched.
    pub async fn update(
        db: &PgPool,
        id: i64,
        amount: Option<f64>,
        description: Option<&str>,
        date: Option<Date>,
        category_id: Option<i64>,
    ) -> anyhow::Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expense
            SET amount = COALESCE($2, amount),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                category_id = COALESCE($5, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, amount, description, date, category_id, user_id
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(description)
        .bind(date)
        .bind(category_id)
        .fetch_one(db)
        .await?;
        Ok(expense)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM expense WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
