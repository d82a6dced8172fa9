use crate::common::error::AppError;
use crate::entities::messages::{
    Message as MessageEntity, MessageDetail as MessageDetailEntity,
    MessageListing as MessageListingEntity,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Subject marker identifying a publication request sent to the reviewer.
pub const PUBLICATION_REQUEST_MARKER: &str = "Publication Request";
pub const REPLY_SUBJECT_PREFIX: &str = "Re: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Personal,
    System,
    Announcement,
    ContentFeedback,
}

impl MessageType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::Personal => "personal",
            MessageType::System => "system",
            MessageType::Announcement => "announcement",
            MessageType::ContentFeedback => "content_feedback",
        }
    }
}

impl TryFrom<&str> for MessageType {
    type Error = AppError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "personal" => Ok(MessageType::Personal),
            "system" => Ok(MessageType::System),
            "announcement" => Ok(MessageType::Announcement),
            "content_feedback" => Ok(MessageType::ContentFeedback),
            _ => Err(AppError::InternalServerError("invalid message type")),
        }
    }
}

/// Which side of a message a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Receiver,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub message_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: String,
    pub content: String,
    pub message_type: MessageType,
    pub parent_message_id: Option<i64>,
    pub related_content_id: Option<i64>,
    pub related_user_id: Option<i64>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub is_deleted_by_sender: bool,
    pub is_deleted_by_receiver: bool,
}

impl Message {
    /// Sender wins when a user wrote to themselves.
    pub fn party_of(&self, user_id: i64) -> Option<Party> {
        if self.sender_id == user_id {
            Some(Party::Sender)
        } else if self.receiver_id == user_id {
            Some(Party::Receiver)
        } else {
            None
        }
    }

    pub fn reply_subject(&self) -> String {
        format!("{REPLY_SUBJECT_PREFIX}{}", self.subject)
    }
}

impl TryFrom<MessageEntity> for Message {
    type Error = AppError;
    fn try_from(value: MessageEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            message_type: MessageType::try_from(value.message_type.as_str())?,
            message_id: value.id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            subject: value.subject,
            content: value.content,
            parent_message_id: value.parent_message_id,
            related_content_id: value.related_content_id,
            related_user_id: value.related_user_id,
            sent_at: value.sent_at,
            is_read: value.is_read,
            read_at: value.read_at,
            is_deleted_by_sender: value.is_deleted_by_sender,
            is_deleted_by_receiver: value.is_deleted_by_receiver,
        })
    }
}

/// One row of an inbox listing, seen from the requesting user.
#[derive(Debug, Clone)]
pub struct InboxEntry {
    pub message: Message,
    pub counterpart_name: Option<String>,
    pub counterpart_email: Option<String>,
    pub content_title: Option<String>,
}

impl TryFrom<MessageListingEntity> for InboxEntry {
    type Error = AppError;
    fn try_from(value: MessageListingEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            message: Message::try_from(value.message)?,
            counterpart_name: value.counterpart_name,
            counterpart_email: value.counterpart_email,
            content_title: value.content_title,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Inbox {
    pub received: Vec<InboxEntry>,
    pub sent: Vec<InboxEntry>,
    pub unread_count: i64,
}

#[derive(Debug, Clone)]
pub struct MessageView {
    pub message: Message,
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_email: Option<String>,
    pub content_title: Option<String>,
}

impl TryFrom<MessageDetailEntity> for MessageView {
    type Error = AppError;
    fn try_from(value: MessageDetailEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            message: Message::try_from(value.message)?,
            sender_name: value.sender_name,
            sender_email: value.sender_email,
            receiver_name: value.receiver_name,
            receiver_email: value.receiver_email,
            content_title: value.content_title,
        })
    }
}

/// A personal message as submitted by its author, before trimming.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposeArgs {
    #[serde(default, deserialize_with = "lenient_id")]
    pub receiver_id: Option<i64>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub related_content_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Accepts ids sent as JSON numbers or numeric strings. Blank strings and
/// `null` mean absent.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => match text.trim() {
            "" => Ok(None),
            text => text
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid id `{text}`"))),
        },
    }
}

pub struct SystemMessageArgs<'a> {
    pub receiver_id: i64,
    pub subject: &'a str,
    pub content: &'a str,
    pub message_type: MessageType,
    pub related_content_id: Option<i64>,
    pub related_user_id: Option<i64>,
}

impl<'a> SystemMessageArgs<'a> {
    pub fn new(receiver_id: i64, subject: &'a str, content: &'a str) -> Self {
        Self {
            receiver_id,
            subject,
            content,
            message_type: MessageType::System,
            related_content_id: None,
            related_user_id: None,
        }
    }
}

pub fn is_publication_request(subject: &str, related_content_id: Option<i64>) -> bool {
    related_content_id.is_some() && subject.contains(PUBLICATION_REQUEST_MARKER)
}
