use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct SystemLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
