use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::messages::{CreateMessageArgs, MessageListing as MessageListingEntity};
use crate::entities::system::{PUBLICATION_REVIEWER_ID, SYSTEM_USER_ID};
use crate::models::messages::{
    ComposeArgs, Inbox, InboxEntry, Message, MessageType, MessageView, PUBLICATION_REQUEST_MARKER,
    Party, SystemMessageArgs, is_publication_request,
};
use crate::models::system_logs::{LogAction, ResourceType};
use crate::repositories::{messages, system_logs, users};
use chrono::Utc;
use tracing::{error, info, warn};

pub async fn fetch_inbox<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<Inbox> {
    let received = match messages::fetch_received(ctx.db(), user_id).await {
        Ok(received) => received,
        Err(e) => return unexpected(e),
    };
    let sent = match messages::fetch_sent(ctx.db(), user_id).await {
        Ok(sent) => sent,
        Err(e) => return unexpected(e),
    };
    let unread_count = unread_count(ctx, user_id).await?;
    Ok(Inbox {
        received: listed(received),
        sent: listed(sent),
        unread_count,
    })
}

/// Rows with a message type this service does not know are left out of
/// listings instead of failing the whole inbox.
fn listed(rows: Vec<MessageListingEntity>) -> Vec<InboxEntry> {
    rows.into_iter()
        .filter_map(|row| {
            let message_id = row.message.id;
            let message_type = row.message.message_type.clone();
            match InboxEntry::try_from(row) {
                Ok(entry) => Some(entry),
                Err(_) => {
                    warn!(message_id, %message_type, "Skipping message of unknown type");
                    None
                }
            }
        })
        .collect()
}

pub async fn unread_count<C: Context>(ctx: &C, user_id: i64) -> ServiceResult<i64> {
    match messages::unread_count(ctx.db(), user_id).await {
        Ok(count) => Ok(count),
        Err(e) => unexpected(e),
    }
}

/// Fetches a message for one of its parties, marking it read when the
/// receiver opens it for the first time.
pub async fn view<C: Context>(ctx: &C, message_id: i64, user_id: i64) -> ServiceResult<MessageView> {
    let detail = match messages::fetch_visible_detail(ctx.db(), message_id, user_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Err(AppError::MessagesNotFound),
        Err(e) => return unexpected(e),
    };
    let mut view = MessageView::try_from(detail)?;
    if view.message.receiver_id == user_id && !view.message.is_read {
        let read_at = Utc::now();
        let updated = messages::mark_read(ctx.db(), message_id, user_id, read_at).await?;
        if updated > 0 {
            view.message.is_read = true;
            view.message.read_at = Some(read_at);
        }
    }
    Ok(view)
}

/// Sends a personal message. Publication requests are rejected while an
/// identical live request exists.
///
/// The duplicate check and the insert are not serialized against concurrent
/// senders, two simultaneous identical requests may both be stored.
pub async fn compose<C: Context>(ctx: &C, sender_id: i64, args: ComposeArgs) -> ServiceResult<i64> {
    let subject = args.subject.trim();
    let content = args.content.trim();
    let Some(receiver_id) = args.receiver_id else {
        return Err(AppError::MessagesMissingFields);
    };
    if subject.is_empty() || content.is_empty() {
        return Err(AppError::MessagesMissingFields);
    }

    let mut uow = ctx.unit_of_work().await?;
    if !users::is_active(uow.conn(), receiver_id).await? {
        return Err(AppError::MessagesInvalidRecipient);
    }

    if let Some(related_content_id) = args.related_content_id
        && is_publication_request(subject, args.related_content_id)
    {
        let existing = messages::count_marked_requests(
            uow.conn(),
            sender_id,
            receiver_id,
            related_content_id,
            PUBLICATION_REQUEST_MARKER,
        )
        .await?;
        if existing > 0 {
            warn!(
                sender_id,
                receiver_id, related_content_id, "Rejected duplicate publication request"
            );
            return Err(AppError::MessagesDuplicatePublicationRequest);
        }
    }

    let now = Utc::now();
    let message_id = messages::create(
        uow.conn(),
        CreateMessageArgs {
            sender_id,
            receiver_id,
            subject,
            content,
            message_type: MessageType::Personal.as_str(),
            parent_message_id: None,
            related_content_id: args.related_content_id,
            related_user_id: None,
        },
        now,
    )
    .await?;
    system_logs::create(
        uow.conn(),
        sender_id,
        LogAction::MessageSent.as_str(),
        ResourceType::Message.as_str(),
        Some(message_id),
        now,
    )
    .await?;
    uow.commit().await?;

    info!(message_id, sender_id, receiver_id, "Message sent");
    Ok(message_id)
}

/// Fetches a message its receiver may answer.
pub async fn fetch_reply_target<C: Context>(
    ctx: &C,
    message_id: i64,
    user_id: i64,
) -> ServiceResult<MessageView> {
    match messages::fetch_received_detail(ctx.db(), message_id, user_id).await {
        Ok(Some(detail)) => MessageView::try_from(detail),
        Ok(None) => Err(AppError::MessagesNotFound),
        Err(e) => unexpected(e),
    }
}

pub async fn reply<C: Context>(
    ctx: &C,
    message_id: i64,
    user_id: i64,
    content: &str,
) -> ServiceResult<i64> {
    let mut uow = ctx.unit_of_work().await?;
    let original = match messages::fetch_received_detail(uow.conn(), message_id, user_id).await {
        Ok(Some(detail)) => Message::try_from(detail.message)?,
        Ok(None) => return Err(AppError::MessagesNotFound),
        Err(e) => return unexpected(e),
    };

    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::MessagesEmptyReply);
    }

    let now = Utc::now();
    let subject = original.reply_subject();
    let reply_id = messages::create(
        uow.conn(),
        CreateMessageArgs {
            sender_id: user_id,
            receiver_id: original.sender_id,
            subject: &subject,
            content,
            message_type: MessageType::Personal.as_str(),
            parent_message_id: Some(original.message_id),
            related_content_id: None,
            related_user_id: None,
        },
        now,
    )
    .await?;
    system_logs::create(
        uow.conn(),
        user_id,
        LogAction::MessageReplied.as_str(),
        ResourceType::Message.as_str(),
        Some(reply_id),
        now,
    )
    .await?;
    uow.commit().await?;

    info!(reply_id, message_id, user_id, "Reply sent");
    Ok(reply_id)
}

/// Marks a message read if `user_id` received it, then returns the
/// remaining unread count. Other users get the count without any change.
pub async fn mark_read<C: Context>(ctx: &C, message_id: i64, user_id: i64) -> ServiceResult<i64> {
    if let Err(e) = messages::mark_read(ctx.db(), message_id, user_id, Utc::now()).await {
        return unexpected(e);
    }
    unread_count(ctx, user_id).await
}

/// Hides a message from the requesting party only.
pub async fn delete<C: Context>(ctx: &C, message_id: i64, user_id: i64) -> ServiceResult<()> {
    let mut uow = ctx.unit_of_work().await?;
    let message = match messages::fetch_one(uow.conn(), message_id).await {
        Ok(Some(message)) => Message::try_from(message)?,
        Ok(None) => return Err(AppError::MessagesNotFound),
        Err(e) => return unexpected(e),
    };

    match message.party_of(user_id) {
        Some(Party::Sender) => messages::mark_deleted_by_sender(uow.conn(), message_id).await?,
        Some(Party::Receiver) => messages::mark_deleted_by_receiver(uow.conn(), message_id).await?,
        None => {
            warn!(message_id, user_id, "User tried to delete a message of other users");
            return Err(AppError::MessagesNotFound);
        }
    }
    uow.commit().await?;
    Ok(())
}

/// Whether `user_id` already has a live publication request for the content
/// addressed to the reviewer.
pub async fn publication_request_exists<C: Context>(
    ctx: &C,
    user_id: i64,
    content_id: i64,
) -> ServiceResult<bool> {
    match messages::count_marked_requests(
        ctx.db(),
        user_id,
        PUBLICATION_REVIEWER_ID,
        content_id,
        PUBLICATION_REQUEST_MARKER,
    )
    .await
    {
        Ok(count) => Ok(count > 0),
        Err(e) => unexpected(e),
    }
}

/// Delivers an automated notice from the system account.
/// Best effort: a failure is logged and reported as `false`.
pub async fn send_system_message<C: Context>(ctx: &C, args: SystemMessageArgs<'_>) -> bool {
    let result = messages::create(
        ctx.db(),
        CreateMessageArgs {
            sender_id: SYSTEM_USER_ID,
            receiver_id: args.receiver_id,
            subject: args.subject,
            content: args.content,
            message_type: args.message_type.as_str(),
            parent_message_id: None,
            related_content_id: args.related_content_id,
            related_user_id: args.related_user_id,
        },
        Utc::now(),
    )
    .await;
    match result {
        Ok(message_id) => {
            info!(
                message_id,
                receiver_id = args.receiver_id,
                message_type = args.message_type.as_str(),
                "System message sent"
            );
            true
        }
        Err(e) => {
            error!(
                receiver_id = args.receiver_id,
                "Failed to send system message: {e}"
            );
            false
        }
    }
}
