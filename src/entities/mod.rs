pub mod message_notifications;
pub mod messages;
pub mod system;
pub mod system_logs;
pub mod users;
