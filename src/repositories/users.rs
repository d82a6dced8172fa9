use crate::entities::users::{CreateUserArgs, Recipient, User};
use chrono::{DateTime, Utc};
use sqlx::SqliteExecutor;

const TABLE_NAME: &str = "users";
const READ_FIELDS: &str = r#"
id, username, email, password_hash, full_name, id_number, role,
is_active, last_login, created_at, updated_at"#;

pub async fn fetch_one<'e, E: SqliteExecutor<'e>>(db: E, user_id: i64) -> sqlx::Result<User> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY).bind(user_id).fetch_one(db).await
}

pub async fn fetch_active_by_email<'e, E: SqliteExecutor<'e>>(
    db: E,
    email: &str,
) -> sqlx::Result<User> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE email = ? AND is_active = TRUE"
    );
    sqlx::query_as(QUERY).bind(email).fetch_one(db).await
}

pub async fn fetch_active_by_email_and_id_number<'e, E: SqliteExecutor<'e>>(
    db: E,
    email: &str,
    id_number: &str,
) -> sqlx::Result<User> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE email = ? AND id_number = ? AND is_active = TRUE"
    );
    sqlx::query_as(QUERY)
        .bind(email)
        .bind(id_number)
        .fetch_one(db)
        .await
}

/// Active users other than `user_id`, ordered by name.
pub async fn fetch_recipients<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
) -> sqlx::Result<Vec<Recipient>> {
    const QUERY: &str = const_str::concat!(
        "SELECT id, full_name, email, role FROM ",
        TABLE_NAME,
        " WHERE id != ? AND is_active = TRUE ORDER BY full_name"
    );
    sqlx::query_as(QUERY).bind(user_id).fetch_all(db).await
}

pub async fn is_active<'e, E: SqliteExecutor<'e>>(db: E, user_id: i64) -> sqlx::Result<bool> {
    const QUERY: &str = const_str::concat!(
        "SELECT EXISTS(SELECT 1 FROM ",
        TABLE_NAME,
        " WHERE id = ? AND is_active = TRUE)"
    );
    sqlx::query_scalar(QUERY).bind(user_id).fetch_one(db).await
}

/// Whether any user already holds one of the given unique identifiers.
pub async fn exists_any<'e, E: SqliteExecutor<'e>>(
    db: E,
    username: &str,
    email: &str,
    id_number: &str,
) -> sqlx::Result<bool> {
    const QUERY: &str = const_str::concat!(
        "SELECT EXISTS(SELECT 1 FROM ",
        TABLE_NAME,
        " WHERE username = ? OR email = ? OR id_number = ?)"
    );
    sqlx::query_scalar(QUERY)
        .bind(username)
        .bind(email)
        .bind(id_number)
        .fetch_one(db)
        .await
}

pub async fn create<'e, E: SqliteExecutor<'e>>(
    db: E,
    args: CreateUserArgs<'_>,
    created_at: DateTime<Utc>,
) -> sqlx::Result<i64> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (username, email, password_hash, full_name, id_number, role, interests,",
        " is_active, created_at, updated_at)",
        " VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?)"
    );
    let result = sqlx::query(QUERY)
        .bind(args.username)
        .bind(args.email)
        .bind(args.password_hash)
        .bind(args.full_name)
        .bind(args.id_number)
        .bind(args.role)
        .bind(args.interests)
        .bind(created_at)
        .bind(created_at)
        .execute(db)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_last_login<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
    last_login: DateTime<Utc>,
) -> sqlx::Result<()> {
    const QUERY: &str = "UPDATE users SET last_login = ? WHERE id = ?";
    sqlx::query(QUERY)
        .bind(last_login)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_password<'e, E: SqliteExecutor<'e>>(
    db: E,
    user_id: i64,
    password_hash: &str,
    updated_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    const QUERY: &str = "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?";
    sqlx::query(QUERY)
        .bind(password_hash)
        .bind(updated_at)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(())
}
