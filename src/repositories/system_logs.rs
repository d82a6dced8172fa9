use crate::entities::system_logs::SystemLog;
use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

const TABLE_NAME: &str = "system_logs";
const READ_FIELDS: &str = "id, user_id, action, resource_type, resource_id, created_at";

pub async fn create<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
    action: &str,
    resource_type: &str,
    resource_id: Option<i64>,
    created_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (user_id, action, resource_type, resource_id, created_at) VALUES (?, ?, ?, ?, ?)"
    );
    sqlx::query(QUERY)
        .bind(user_id)
        .bind(action)
        .bind(resource_type)
        .bind(resource_id)
        .bind(created_at)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn fetch_by_user<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
) -> sqlx::Result<Vec<SystemLog>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE user_id = ? ORDER BY id"
    );
    sqlx::query_as(QUERY).bind(user_id).fetch_all(db).await
}
