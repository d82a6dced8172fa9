use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::users::CreateUserArgs;
use crate::models::messages::SystemMessageArgs;
use crate::models::system_logs::{LogAction, ResourceType};
use crate::models::users::{PasswordResetArgs, Recipient, RegistrationArgs, Role, User};
use crate::repositories::{system_logs, user_preferences, users};
use crate::usecases::{messages, notifications};
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

const MIN_PASSWORD_LENGTH: usize = 6;
const WELCOME_SUBJECT: &str = "Welcome to EduMate!";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.com$").expect("valid email pattern")
});
static PASSWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid password pattern"));

pub async fn fetch_one<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<User> {
    match users::fetch_one(ctx.db(), user_id).await {
        Ok(user) => User::try_from(user),
        Err(sqlx::Error::RowNotFound) => Err(AppError::UsersNotFound),
        Err(e) => unexpected(e),
    }
}

/// Active users `user_id` can write to, ordered by full name.
pub async fn fetch_recipients<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<Vec<Recipient>> {
    match users::fetch_recipients(ctx.db(), user_id).await {
        Ok(recipients) => recipients.into_iter().map(Recipient::try_from).collect(),
        Err(e) => unexpected(e),
    }
}

pub async fn register<C: Context>(ctx: &C, args: RegistrationArgs) -> ServiceResult<i64> {
    let username = args.username.trim();
    let email = args.email.trim();
    let full_name = args.full_name.trim();
    let id_number = args.id_number.trim();
    if username.is_empty()
        || email.is_empty()
        || args.password.is_empty()
        || full_name.is_empty()
        || id_number.is_empty()
    {
        return Err(AppError::RegistrationMissingFields);
    }
    if !id_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::RegistrationInvalidIdNumber);
    }
    if !is_valid_email(email) {
        return Err(AppError::RegistrationInvalidEmail);
    }
    if !is_valid_password(&args.password) {
        return Err(AppError::CredentialsInvalidPassword);
    }
    if !args.terms_accepted {
        return Err(AppError::RegistrationTermsNotAccepted);
    }
    validate_new_password(&args.password, &args.confirm_password)?;
    let role = match args.role.as_deref().map(str::trim) {
        None | Some("") => Role::Student,
        Some(role) => match Role::try_from(role) {
            Ok(role) if role.is_self_assignable() => role,
            _ => return Err(AppError::RegistrationInvalidRole),
        },
    };
    let interests = if args.interests.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&args.interests)?)
    };

    let password_hash = bcrypt::hash(&args.password, bcrypt::DEFAULT_COST)?;
    let now = Utc::now();

    let mut uow = ctx.unit_of_work().await?;
    if users::exists_any(uow.conn(), username, email, id_number).await? {
        return Err(AppError::RegistrationAlreadyExists);
    }
    let user_id = users::create(
        uow.conn(),
        CreateUserArgs {
            username,
            email,
            password_hash: &password_hash,
            full_name,
            id_number,
            role: role.as_str(),
            interests,
        },
        now,
    )
    .await?;
    user_preferences::create(uow.conn(), user_id, now).await?;
    notifications::create_defaults(uow.conn(), user_id, now).await?;
    system_logs::create(
        uow.conn(),
        user_id,
        LogAction::Registered.as_str(),
        ResourceType::User.as_str(),
        Some(user_id),
        now,
    )
    .await?;
    uow.commit().await?;
    info!(user_id, role = role.as_str(), "User registered");

    let welcome = format!(
        "Hello {full_name}, welcome to EduMate! Your {} account is ready.",
        role.display_name().to_lowercase()
    );
    messages::send_system_message(ctx, SystemMessageArgs::new(user_id, WELCOME_SUBJECT, &welcome))
        .await;

    Ok(user_id)
}

/// Sets a new password for the active user matching both email and id number.
pub async fn reset_password<C: Context>(ctx: &C, args: PasswordResetArgs) -> ServiceResult<()> {
    let email = args.email.trim();
    let id_number = args.id_number.trim();
    if email.is_empty() || id_number.is_empty() {
        return Err(AppError::PasswordResetMissingIdentity);
    }
    if args.new_password.is_empty() || args.confirm_password.is_empty() {
        return Err(AppError::PasswordResetMissingPassword);
    }
    validate_new_password(&args.new_password, &args.confirm_password)?;

    let user = match users::fetch_active_by_email_and_id_number(ctx.db(), email, id_number).await {
        Ok(user) => user,
        Err(sqlx::Error::RowNotFound) => {
            warn!("Password reset requested for an unknown identity");
            return Err(AppError::PasswordResetNoMatch);
        }
        Err(e) => return unexpected(e),
    };

    let password_hash = bcrypt::hash(&args.new_password, bcrypt::DEFAULT_COST)?;
    let now = Utc::now();
    let mut uow = ctx.unit_of_work().await?;
    users::update_password(uow.conn(), user.id, &password_hash, now).await?;
    system_logs::create(
        uow.conn(),
        user.id,
        LogAction::PasswordReset.as_str(),
        ResourceType::User.as_str(),
        Some(user.id),
        now,
    )
    .await?;
    uow.commit().await?;
    info!(user_id = user.id, "Password reset");
    Ok(())
}

fn is_valid_password(password: &str) -> bool {
    PASSWORD_PATTERN.is_match(password)
}

fn validate_new_password(password: &str, confirmation: &str) -> ServiceResult<()> {
    if !is_valid_password(password) {
        return Err(AppError::CredentialsInvalidPassword);
    }
    if password != confirmation {
        return Err(AppError::CredentialsPasswordMismatch);
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::CredentialsPasswordTooShort);
    }
    Ok(())
}

/// Accepts `local@domain.com` addresses only.
fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_must_be_dot_com_addresses() {
        assert!(is_valid_email("jane.doe+edu@school-mail.com"));
        assert!(!is_valid_email("jane@school.org"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("@school.com"));
        assert!(!is_valid_email("jane@doe@school.com"));
        assert!(!is_valid_email("jane doe@school.com"));
        assert!(!is_valid_email("jane@school.com "));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn passwords_are_checked_in_order() {
        assert_eq!(
            validate_new_password("abc!123", "abc!123"),
            Err(AppError::CredentialsInvalidPassword)
        );
        assert_eq!(
            validate_new_password("abc123", "abc124"),
            Err(AppError::CredentialsPasswordMismatch)
        );
        assert_eq!(
            validate_new_password("abc12", "abc12"),
            Err(AppError::CredentialsPasswordTooShort)
        );
        assert_eq!(validate_new_password("abc123", "abc123"), Ok(()));
    }
}
