use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::models::notifications::{NotificationPreference, NotificationSetting, NotificationType};
use crate::repositories::message_notifications;
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{info, warn};

pub async fn fetch_settings<C: Context>(
    ctx: &C,
    user_id: i64,
) -> ServiceResult<Vec<NotificationSetting>> {
    match message_notifications::fetch_all(ctx.db(), user_id).await {
        Ok(settings) => Ok(settings
            .into_iter()
            .filter_map(|setting| {
                let notification_type = setting.notification_type.clone();
                match NotificationSetting::try_from(setting) {
                    Ok(setting) => Some(setting),
                    Err(_) => {
                        warn!(user_id, %notification_type, "Skipping unknown notification type");
                        None
                    }
                }
            })
            .collect()),
        Err(e) => unexpected(e),
    }
}

/// Applies the preferences to the rows the user already has.
/// Types without a stored row are skipped. Returns the number of rows changed.
pub async fn update_settings<C: Context>(
    ctx: &C,
    user_id: i64,
    preferences: &[NotificationPreference],
) -> ServiceResult<u64> {
    let now = Utc::now();
    let mut uow = ctx.unit_of_work().await?;
    let mut updated = 0;
    for preference in preferences {
        updated += message_notifications::update(
            uow.conn(),
            user_id,
            preference.notification_type.as_str(),
            preference.is_enabled,
            preference.email_enabled,
            now,
        )
        .await?;
    }
    uow.commit().await?;
    info!(user_id, updated, "Notification settings updated");
    Ok(updated)
}

/// Seeds one row per notification type: in-app on, email off.
pub async fn create_defaults(
    conn: &mut SqliteConnection,
    user_id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<()> {
    for notification_type in NotificationType::ALL {
        message_notifications::create(
            &mut *conn,
            user_id,
            notification_type.as_str(),
            true,
            false,
            now,
        )
        .await?;
    }
    Ok(())
}
