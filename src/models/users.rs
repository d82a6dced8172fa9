use crate::common::error::AppError;
use crate::entities::users::{Recipient as RecipientEntity, User as UserEntity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
            Role::Admin => "Administrator",
        }
    }

    /// Roles a visitor may pick for themselves on the registration form.
    pub const fn is_self_assignable(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl TryFrom<&str> for Role {
    type Error = AppError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::InternalServerError("invalid role value")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserEntity> for User {
    type Error = AppError;
    fn try_from(value: UserEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            role: Role::try_from(value.role.as_str())?,
            user_id: value.id,
            username: value.username,
            email: value.email,
            full_name: value.full_name,
            is_active: value.is_active,
            last_login: value.last_login,
            created_at: value.created_at,
        })
    }
}

/// A user that can be picked as the receiver of a new message.
#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl TryFrom<RecipientEntity> for Recipient {
    type Error = AppError;
    fn try_from(value: RecipientEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            role: Role::try_from(value.role.as_str())?,
            user_id: value.id,
            full_name: value.full_name,
            email: value.email,
        })
    }
}

/// Sign-up form fields as typed by the visitor.
#[derive(Debug, Clone, Default)]
pub struct RegistrationArgs {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub id_number: String,
    pub role: Option<String>,
    pub interests: Vec<String>,
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordResetArgs {
    pub email: String,
    pub id_number: String,
    pub new_password: String,
    pub confirm_password: String,
}
