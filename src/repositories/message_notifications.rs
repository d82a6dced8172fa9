use crate::entities::message_notifications::MessageNotification;
use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

const TABLE_NAME: &str = "message_notifications";
const READ_FIELDS: &str = "id, user_id, notification_type, is_enabled, email_enabled, updated_at";

pub async fn fetch_all<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
) -> sqlx::Result<Vec<MessageNotification>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE user_id = ? ORDER BY id"
    );
    sqlx::query_as(QUERY).bind(user_id).fetch_all(db).await
}

pub async fn create<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
    notification_type: &str,
    is_enabled: bool,
    email_enabled: bool,
    updated_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (user_id, notification_type, is_enabled, email_enabled, updated_at)",
        " VALUES (?, ?, ?, ?, ?)"
    );
    sqlx::query(QUERY)
        .bind(user_id)
        .bind(notification_type)
        .bind(is_enabled)
        .bind(email_enabled)
        .bind(updated_at)
        .execute(db)
        .await?;
    Ok(())
}

/// Updates an existing row only. Returns the number of rows changed.
pub async fn update<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
    notification_type: &str,
    is_enabled: bool,
    email_enabled: bool,
    updated_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET is_enabled = ?, email_enabled = ?, updated_at = ?",
        " WHERE user_id = ? AND notification_type = ?"
    );
    let result = sqlx::query(QUERY)
        .bind(is_enabled)
        .bind(email_enabled)
        .bind(updated_at)
        .bind(user_id)
        .bind(notification_type)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
