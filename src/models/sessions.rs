use crate::models::users::{Role, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

/// The signed-in user, as stored in the session cookie's server-side record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}
