use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: String,
    pub content: String,
    pub message_type: String,
    pub parent_message_id: Option<i64>,
    pub related_content_id: Option<i64>,
    pub related_user_id: Option<i64>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub is_deleted_by_sender: bool,
    pub is_deleted_by_receiver: bool,
}

/// A message joined with the other party of a listing and the related content.
#[derive(Debug, sqlx::FromRow)]
pub struct MessageListing {
    #[sqlx(flatten)]
    pub message: Message,
    pub counterpart_name: Option<String>,
    pub counterpart_email: Option<String>,
    pub content_title: Option<String>,
}

/// A message joined with both parties and the related content.
#[derive(Debug, sqlx::FromRow)]
pub struct MessageDetail {
    #[sqlx(flatten)]
    pub message: Message,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_email: Option<String>,
    pub content_title: Option<String>,
}

pub struct CreateMessageArgs<'a> {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: &'a str,
    pub content: &'a str,
    pub message_type: &'a str,
    pub parent_message_id: Option<i64>,
    pub related_content_id: Option<i64>,
    pub related_user_id: Option<i64>,
}
