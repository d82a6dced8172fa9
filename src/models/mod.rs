pub mod messages;
pub mod notifications;
pub mod responses;
pub mod sessions;
pub mod system_logs;
pub mod users;
