use crate::common::error::AppError;
use crate::entities::message_notifications::MessageNotification as MessageNotificationEntity;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    NewMessage,
    MessageReply,
    SystemAnnouncement,
    ContentFeedback,
}

impl NotificationType {
    pub const ALL: [NotificationType; 4] = [
        NotificationType::NewMessage,
        NotificationType::MessageReply,
        NotificationType::SystemAnnouncement,
        NotificationType::ContentFeedback,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationType::NewMessage => "new_message",
            NotificationType::MessageReply => "message_reply",
            NotificationType::SystemAnnouncement => "system_announcement",
            NotificationType::ContentFeedback => "content_feedback",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            NotificationType::NewMessage => "New messages",
            NotificationType::MessageReply => "Replies to my messages",
            NotificationType::SystemAnnouncement => "System announcements",
            NotificationType::ContentFeedback => "Feedback on my content",
        }
    }

    /// Name of the checkbox toggling in-app notifications.
    pub fn enabled_field(&self) -> String {
        format!("{}_enabled", self.as_str())
    }

    /// Name of the checkbox toggling email notifications.
    pub fn email_field(&self) -> String {
        format!("{}_email", self.as_str())
    }
}

impl TryFrom<&str> for NotificationType {
    type Error = AppError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        NotificationType::ALL
            .into_iter()
            .find(|notification_type| notification_type.as_str() == value)
            .ok_or(AppError::InternalServerError("invalid notification type"))
    }
}

#[derive(Debug, Clone)]
pub struct NotificationSetting {
    pub notification_type: NotificationType,
    pub is_enabled: bool,
    pub email_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MessageNotificationEntity> for NotificationSetting {
    type Error = AppError;
    fn try_from(value: MessageNotificationEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_type: NotificationType::try_from(value.notification_type.as_str())?,
            is_enabled: value.is_enabled,
            email_enabled: value.email_enabled,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreference {
    pub notification_type: NotificationType,
    pub is_enabled: bool,
    pub email_enabled: bool,
}

impl NotificationPreference {
    /// Reads one preference per type from submitted checkboxes.
    /// Unchecked boxes are absent from a form, so absence means off.
    pub fn from_form(fields: &HashMap<String, String>) -> Vec<Self> {
        let checked = |name: String| fields.get(&name).is_some_and(|value| value == "on");
        NotificationType::ALL
            .into_iter()
            .map(|notification_type| Self {
                notification_type,
                is_enabled: checked(notification_type.enabled_field()),
                email_enabled: checked(notification_type.email_field()),
            })
            .collect()
    }
}
