pub mod message_notifications;
pub mod messages;
pub mod system_logs;
pub mod user_preferences;
pub mod users;
