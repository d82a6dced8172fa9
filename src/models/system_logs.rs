#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogAction {
    Registered,
    Login,
    Logout,
    PasswordReset,
    MessageSent,
    MessageReplied,
}

impl LogAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogAction::Registered => "REGISTERED",
            LogAction::Login => "LOGIN",
            LogAction::Logout => "LOGOUT",
            LogAction::PasswordReset => "PASSWORD_RESET",
            LogAction::MessageSent => "MESSAGE_SENT",
            LogAction::MessageReplied => "MESSAGE_REPLIED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Message,
}

impl ResourceType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceType::User => "user",
            ResourceType::Message => "message",
        }
    }
}
