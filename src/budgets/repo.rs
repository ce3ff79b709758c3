use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Budget record. At most one per (user, category); the unique constraint on
/// (user_id, category_id) backs the application-level pre-check.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Budget {
    pub id: i64,
    pub amount: i64,
    pub alert: i64,
    pub category_id: i64,
    pub user_id: i64,
}

/// Budget joined with its category name for list responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BudgetWithCategory {
    pub id: i64,
    pub amount: i64,
    pub alert: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub category_name: String,
}

impl Budget {
    pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<BudgetWithCategory>> {
        let rows = sqlx::query_as::<_, BudgetWithCategory>(
            r#"
            SELECT b.id, b.amount, b.alert, b.category_id, b.user_id, c.name AS category_name
            FROM budget b
            JOIN category c ON c.id = b.category_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Budget>> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, amount, alert, category_id, user_id
            FROM budget
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(budget)
    }

    pub async fn find_by_user_and_category(
        db: &PgPool,
        user_id: i64,
        category_id: i64,
    ) -> anyhow::Result<Option<Budget>> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, amount, alert, category_id, user_id
            FROM budget
            WHERE user_id = $1 AND category_id = $2
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_optional(db)
        .await?;
        Ok(budget)
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        amount: i64,
        alert: i64,
        category_id: i64,
    ) -> anyhow::Result<Budget> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budget (amount, alert, category_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, amount, alert, category_id, user_id
            "#,
        )
        .bind(amount)
        .bind(alert)
        .bind(category_id)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(budget)
    }

    pub async fn update(
        db: &PgPool,
        id: i64,
        amount: i64,
        alert: i64,
        category_id: i64,
    ) -> anyhow::Result<Budget> {
        let budget = sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budget
            SET amount = $2, alert = $3, category_id = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, amount, alert, category_id, user_id
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(alert)
        .bind(category_id)
        .fetch_one(db)
        .await?;
        Ok(budget)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM budget WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
