use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

pub async fn create<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
    created_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    const QUERY: &str =
        "INSERT INTO user_preferences (user_id, created_at, updated_at) VALUES (?, ?, ?)";
    sqlx::query(QUERY)
        .bind(user_id)
        .bind(created_at)
        .bind(created_at)
        .execute(db)
        .await?;
    Ok(())
}
