use crate::entities::messages::{CreateMessageArgs, Message, MessageDetail, MessageListing};
use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

const TABLE_NAME: &str = "messages";
const READ_FIELDS: &str = r#"
m.id, m.sender_id, m.receiver_id, m.subject, m.content, m.message_type,
m.parent_message_id, m.related_content_id, m.related_user_id, m.sent_at,
m.is_read, m.read_at, m.is_deleted_by_sender, m.is_deleted_by_receiver"#;
const DETAIL_FIELDS: &str = r#",
u_sender.full_name AS sender_name, u_sender.email AS sender_email,
u_receiver.full_name AS receiver_name, u_receiver.email AS receiver_email,
c.title AS content_title"#;
const DETAIL_JOINS: &str = r#"
LEFT JOIN users u_sender ON m.sender_id = u_sender.id
LEFT JOIN users u_receiver ON m.receiver_id = u_receiver.id
LEFT JOIN content c ON m.related_content_id = c.id"#;

pub async fn fetch_received<'e, E: SqliteExecutor<'e>>(
    db: E,
    receiver_id: i64,
) -> sqlx::Result<Vec<MessageListing>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        ", u.full_name AS counterpart_name, u.email AS counterpart_email, c.title AS content_title",
        " FROM ",
        TABLE_NAME,
        " m LEFT JOIN users u ON m.sender_id = u.id",
        " LEFT JOIN content c ON m.related_content_id = c.id",
        " WHERE m.receiver_id = ? AND m.is_deleted_by_receiver = FALSE",
        " ORDER BY m.sent_at DESC, m.id DESC"
    );
    sqlx::query_as(QUERY)
        .bind(receiver_id)
        .fetch_all(db)
        .await
}

pub async fn fetch_sent<'e, E: SqliteExecutor<'e>>(
    db: E,
    sender_id: i64,
) -> sqlx::Result<Vec<MessageListing>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        ", u.full_name AS counterpart_name, u.email AS counterpart_email, c.title AS content_title",
        " FROM ",
        TABLE_NAME,
        " m LEFT JOIN users u ON m.receiver_id = u.id",
        " LEFT JOIN content c ON m.related_content_id = c.id",
        " WHERE m.sender_id = ? AND m.is_deleted_by_sender = FALSE",
        " ORDER BY m.sent_at DESC, m.id DESC"
    );
    sqlx::query_as(QUERY)
        .bind(sender_id)
        .fetch_all(db)
        .await
}

pub async fn fetch_one<'e, E: SqliteExecutor<'e>>(
    db: E,
    message_id: i64,
) -> sqlx::Result<Option<Message>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " m WHERE m.id = ?"
    );
    sqlx::query_as(QUERY)
        .bind(message_id)
        .fetch_optional(db)
        .await
}

/// Fetches a message only if `user_id` is a party that has not deleted it.
pub async fn fetch_visible_detail<'e, E: SqliteExecutor<'e>>(
    db: E,
    message_id: i64,
    user_id: i64,
) -> sqlx::Result<Option<MessageDetail>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        DETAIL_FIELDS,
        " FROM ",
        TABLE_NAME,
        " m",
        DETAIL_JOINS,
        " WHERE m.id = ? AND (",
        "(m.receiver_id = ? AND m.is_deleted_by_receiver = FALSE) OR ",
        "(m.sender_id = ? AND m.is_deleted_by_sender = FALSE))"
    );
    sqlx::query_as(QUERY)
        .bind(message_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Fetches a message only if `receiver_id` received it and still keeps it.
pub async fn fetch_received_detail<'e, E: SqliteExecutor<'e>>(
    db: E,
    message_id: i64,
    receiver_id: i64,
) -> sqlx::Result<Option<MessageDetail>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        DETAIL_FIELDS,
        " FROM ",
        TABLE_NAME,
        " m",
        DETAIL_JOINS,
        " WHERE m.id = ? AND m.receiver_id = ? AND m.is_deleted_by_receiver = FALSE"
    );
    sqlx::query_as(QUERY)
        .bind(message_id)
        .bind(receiver_id)
        .fetch_optional(db)
        .await
}

pub async fn create<'e, E: SqliteExecutor<'e>>(
    db: E,
    args: CreateMessageArgs<'_>,
    sent_at: DateTime<Utc>,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (sender_id, receiver_id, subject, content, message_type, parent_message_id,",
        " related_content_id, related_user_id, sent_at, is_read,",
        " is_deleted_by_sender, is_deleted_by_receiver)",
        " VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, FALSE, FALSE, FALSE)"
    );
    let result = sqlx::query(QUERY)
        .bind(args.sender_id)
        .bind(args.receiver_id)
        .bind(args.subject)
        .bind(args.content)
        .bind(args.message_type)
        .bind(args.parent_message_id)
        .bind(args.related_content_id)
        .bind(args.related_user_id)
        .bind(sent_at)
        .execute(db)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Marks a message read for its receiver. Already read messages keep
/// their original `read_at`. Returns the number of rows changed.
pub async fn mark_read<'e, E: SqliteExecutor<'e>>(
    db: E,
    message_id: i64,
    receiver_id: i64,
    read_at: DateTime<Utc>,
) -> sqlx::Result<u64> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET is_read = TRUE, read_at = ?",
        " WHERE id = ? AND receiver_id = ? AND is_read = FALSE"
    );
    let result = sqlx::query(QUERY)
        .bind(read_at)
        .bind(message_id)
        .bind(receiver_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn mark_deleted_by_sender<'e, E: SqliteExecutor<'e>>(
    db: E,
    message_id: i64,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET is_deleted_by_sender = TRUE WHERE id = ?"
    );
    sqlx::query(QUERY).bind(message_id).execute(db).await?;
    Ok(())
}

pub async fn mark_deleted_by_receiver<'e, E: SqliteExecutor<'e>>(
    db: E,
    message_id: i64,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET is_deleted_by_receiver = TRUE WHERE id = ?"
    );
    sqlx::query(QUERY).bind(message_id).execute(db).await?;
    Ok(())
}

pub async fn unread_count<'e, E: SqliteExecutor<'e>>(db: E, receiver_id: i64) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "SELECT COUNT(*) FROM ",
        TABLE_NAME,
        " WHERE receiver_id = ? AND is_read = FALSE AND is_deleted_by_receiver = FALSE"
    );
    sqlx::query_scalar(QUERY)
        .bind(receiver_id)
        .fetch_one(db)
        .await
}

/// Counts live messages between two users about one piece of content whose
/// subject contains `subject_marker`.
pub async fn count_marked_requests<'e, E: SqliteExecutor<'e>>(
    db: E,
    sender_id: i64,
    receiver_id: i64,
    related_content_id: i64,
    subject_marker: &str,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "SELECT COUNT(*) FROM ",
        TABLE_NAME,
        " WHERE sender_id = ? AND receiver_id = ? AND related_content_id = ?",
        " AND subject LIKE ?",
        " AND is_deleted_by_sender = FALSE AND is_deleted_by_receiver = FALSE"
    );
    sqlx::query_scalar(QUERY)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(related_content_id)
        .bind(format!("%{subject_marker}%"))
        .fetch_one(db)
        .await
}
