use chrono::{DateTime, Utc};

#[derive(Debug, sqlx::FromRow)]
pub struct MessageNotification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub is_enabled: bool,
    pub email_enabled: bool,
    pub updated_at: DateTime<Utc>,
}
