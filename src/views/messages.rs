use crate::common::flash::Flash;
use crate::include_res;
use crate::models::messages::{Inbox, InboxEntry, MessageView};
use crate::models::notifications::NotificationSetting;
use crate::models::sessions::Identity;
use crate::models::users::Recipient;
use crate::views::{escape, format_timestamp, layout};

/// Values carried into the compose form, e.g. from a publication request link.
#[derive(Debug, Default)]
pub struct ComposePrefill {
    pub receiver_id: Option<i64>,
    pub subject: String,
    pub related_content_id: Option<i64>,
}

pub fn inbox(identity: &Identity, flashes: &[Flash], inbox: &Inbox) -> String {
    let body = include_res!(str, "/pages/messages/inbox.html")
        .replace("{unread_count}", &inbox.unread_count.to_string())
        .replace("{received_rows}", &inbox_rows(&inbox.received, true))
        .replace("{sent_rows}", &inbox_rows(&inbox.sent, false));
    layout("Messages", Some(identity), flashes, &body)
}

fn inbox_rows(entries: &[InboxEntry], received: bool) -> String {
    if entries.is_empty() {
        return include_res!(str, "/pages/messages/empty_row.html").to_owned();
    }
    entries
        .iter()
        .map(|entry| {
            let unread = received && !entry.message.is_read;
            include_res!(str, "/pages/messages/inbox_row.html")
                .replace("{row_class}", if unread { "unread" } else { "" })
                .replace(
                    "{counterpart}",
                    &escape(entry.counterpart_name.as_deref().unwrap_or("Unknown user")),
                )
                .replace("{subject}", &escape(&entry.message.subject))
                .replace(
                    "{content_title}",
                    &escape(entry.content_title.as_deref().unwrap_or("")),
                )
                .replace("{sent_at}", &format_timestamp(&entry.message.sent_at))
                .replace("{message_id}", &entry.message.message_id.to_string())
        })
        .collect()
}

pub fn view(identity: &Identity, flashes: &[Flash], view: &MessageView) -> String {
    let message = &view.message;
    let read_status = match message.read_at {
        Some(read_at) => format!(" (read {})", format_timestamp(&read_at)),
        None => String::new(),
    };
    let content_title = match &view.content_title {
        Some(title) => format!("<p>About: {}</p>", escape(title)),
        None => String::new(),
    };
    let actions = if message.receiver_id == identity.user_id {
        format!(r#"<a href="/messages/reply/{}">Reply</a> "#, message.message_id)
    } else {
        String::new()
    };
    let content = escape(&message.content).replace('\n', "<br>");

    let body = include_res!(str, "/pages/messages/view.html")
        .replace("{sender_email}", &escape(view.sender_email.as_deref().unwrap_or("")))
        .replace("{receiver_email}", &escape(view.receiver_email.as_deref().unwrap_or("")))
        .replace("{sender}", &escape(view.sender_name.as_deref().unwrap_or("Unknown user")))
        .replace("{receiver}", &escape(view.receiver_name.as_deref().unwrap_or("Unknown user")))
        .replace("{sent_at}", &format_timestamp(&message.sent_at))
        .replace("{read_status}", &read_status)
        .replace("{content_title}", &content_title)
        .replace("{actions}", &actions)
        .replace("{subject}", &escape(&message.subject))
        .replace("{content}", &content);
    layout(&message.subject, Some(identity), flashes, &body)
}

pub fn compose(
    identity: &Identity,
    flashes: &[Flash],
    recipients: &[Recipient],
    prefill: &ComposePrefill,
) -> String {
    let recipient_options: String = recipients
        .iter()
        .map(|recipient| {
            let selected = if prefill.receiver_id == Some(recipient.user_id) {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{selected}>{} ({})</option>"#,
                recipient.user_id,
                escape(&recipient.full_name),
                recipient.role.display_name(),
            )
        })
        .collect();
    let related_content_id = prefill
        .related_content_id
        .map(|id| id.to_string())
        .unwrap_or_default();

    let body = include_res!(str, "/pages/messages/compose.html")
        .replace("{related_content_id}", &related_content_id)
        .replace("{recipient_options}", &recipient_options)
        .replace("{subject}", &escape(&prefill.subject));
    layout("New message", Some(identity), flashes, &body)
}

pub fn reply(identity: &Identity, flashes: &[Flash], original: &MessageView) -> String {
    let body = include_res!(str, "/pages/messages/reply.html")
        .replace("{message_id}", &original.message.message_id.to_string())
        .replace(
            "{sender}",
            &escape(original.sender_name.as_deref().unwrap_or("Unknown user")),
        )
        .replace("{subject}", &escape(&original.message.subject))
        .replace("{original_content}", &escape(&original.message.content));
    layout("Reply", Some(identity), flashes, &body)
}

pub fn notifications(
    identity: &Identity,
    flashes: &[Flash],
    settings: &[NotificationSetting],
) -> String {
    let checked = |on: bool| if on { " checked" } else { "" };
    let rows: String = settings
        .iter()
        .map(|setting| {
            let notification_type = setting.notification_type;
            include_res!(str, "/pages/messages/notification_row.html")
                .replace("{label}", notification_type.label())
                .replace("{enabled_field}", &notification_type.enabled_field())
                .replace("{email_field}", &notification_type.email_field())
                .replace("{enabled_checked}", checked(setting.is_enabled))
                .replace("{email_checked}", checked(setting.email_enabled))
        })
        .collect();
    let body = include_res!(str, "/pages/messages/notifications.html").replace("{rows}", &rows);
    layout("Notification settings", Some(identity), flashes, &body)
}
