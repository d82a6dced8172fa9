use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::sessions::LoginArgs;
use crate::models::system_logs::{LogAction, ResourceType};
use crate::models::users::User;
use crate::repositories::{system_logs, users};
use chrono::Utc;
use tracing::{info, warn};

pub async fn create<C: Context>(ctx: &C, args: LoginArgs) -> ServiceResult<User> {
    let email = args.email.trim();
    if email.is_empty() || args.password.is_empty() {
        return Err(AppError::SessionsMissingCredentials);
    }

    let user = match users::fetch_active_by_email(ctx.db(), email).await {
        Ok(user) => user,
        Err(sqlx::Error::RowNotFound) => return Err(AppError::SessionsInvalidCredentials),
        Err(e) => return unexpected(e),
    };

    if !bcrypt::verify(&args.password, &user.password_hash)? {
        warn!(user_id = user.id, "Login attempt with a wrong password");
        return Err(AppError::SessionsInvalidCredentials);
    }

    let mut user = User::try_from(user)?;
    let now = Utc::now();
    let mut uow = ctx.unit_of_work().await?;
    users::update_last_login(uow.conn(), user.user_id, now).await?;
    system_logs::create(
        uow.conn(),
        user.user_id,
        LogAction::Login.as_str(),
        ResourceType::User.as_str(),
        Some(user.user_id),
        now,
    )
    .await?;
    uow.commit().await?;
    user.last_login = Some(now);

    info!(user_id = user.user_id, role = user.role.as_str(), "User logged in");
    Ok(user)
}

/// Records the logout. Best effort, the session is cleared regardless.
pub async fn delete<C: Context>(ctx: &C, user_id: i64) {
    let result = system_logs::create(
        ctx.db(),
        user_id,
        LogAction::Logout.as_str(),
        ResourceType::User.as_str(),
        Some(user_id),
        Utc::now(),
    )
    .await;
    match result {
        Ok(()) => info!(user_id, "User logged out"),
        Err(e) => warn!(user_id, "Failed to record logout: {e}"),
    }
}
