use crate::api::AuthenticatedContext;
use crate::common::error::AppError;
use crate::common::flash;
use crate::common::state::AppState;
use crate::models::messages::{ComposeArgs, Inbox};
use crate::models::notifications::NotificationPreference;
use crate::models::responses::{
    AckResponse, MarkReadResponse, PublicationRequestStatus, UnreadCount,
};
use crate::usecases::{messages, notifications, users};
use crate::views;
use crate::views::messages::ComposePrefill;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::collections::HashMap;

const INBOX_PATH: &str = "/messages/";
const COMPOSE_PATH: &str = "/messages/compose";
const NOTIFICATIONS_PATH: &str = "/messages/notifications";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(inbox))
        .route("/messages/", get(inbox))
        .route("/messages/{message_id}", get(view_message))
        .route("/messages/compose", get(compose_page).post(compose))
        .route("/messages/reply/{message_id}", get(reply_page).post(reply))
        .route("/messages/mark-read/{message_id}", post(mark_read))
        .route("/messages/delete/{message_id}", post(delete))
        .route("/messages/send", post(send))
        .route(
            "/messages/notifications",
            get(notification_settings).post(update_notification_settings),
        )
        .route(
            "/messages/check-publication-request/{content_id}",
            get(check_publication_request),
        )
        .route("/messages/api/unread-count", get(unread_count))
}

/// Parses an optional numeric form field, treating blanks as absent.
fn parse_id(value: Option<&str>) -> Option<i64> {
    value.map(str::trim).and_then(|value| value.parse().ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComposeQuery {
    pub receiver_id: Option<String>,
    pub subject: Option<String>,
    pub related_content_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComposeForm {
    pub receiver_id: String,
    pub subject: String,
    pub content: String,
    pub related_content_id: String,
}

impl From<ComposeForm> for ComposeArgs {
    fn from(form: ComposeForm) -> Self {
        Self {
            receiver_id: parse_id(Some(&form.receiver_id)),
            subject: form.subject,
            content: form.content,
            related_content_id: parse_id(Some(&form.related_content_id)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplyForm {
    pub content: String,
}

pub async fn inbox(ctx: AuthenticatedContext) -> Html<String> {
    let inbox = match messages::fetch_inbox(&ctx, ctx.identity.user_id).await {
        Ok(inbox) => inbox,
        Err(e) => {
            flash::error(&ctx.session, format!("Error loading messages: {}", e.message())).await;
            Inbox::default()
        }
    };
    let flashes = flash::take(&ctx.session).await;
    Html(views::messages::inbox(&ctx.identity, &flashes, &inbox))
}

pub async fn view_message(ctx: AuthenticatedContext, Path(message_id): Path<i64>) -> Response {
    match messages::view(&ctx, message_id, ctx.identity.user_id).await {
        Ok(view) => {
            let flashes = flash::take(&ctx.session).await;
            Html(views::messages::view(&ctx.identity, &flashes, &view)).into_response()
        }
        Err(e) => {
            flash::error(&ctx.session, e.message()).await;
            Redirect::to(INBOX_PATH).into_response()
        }
    }
}

pub async fn compose_page(
    ctx: AuthenticatedContext,
    Query(query): Query<ComposeQuery>,
) -> Html<String> {
    let recipients = match users::fetch_recipients(&ctx, ctx.identity.user_id).await {
        Ok(recipients) => recipients,
        Err(e) => {
            flash::error(&ctx.session, format!("Error loading users: {}", e.message())).await;
            Vec::new()
        }
    };
    let prefill = ComposePrefill {
        receiver_id: parse_id(query.receiver_id.as_deref()),
        subject: query.subject.unwrap_or_default(),
        related_content_id: parse_id(query.related_content_id.as_deref()),
    };
    let flashes = flash::take(&ctx.session).await;
    Html(views::messages::compose(
        &ctx.identity,
        &flashes,
        &recipients,
        &prefill,
    ))
}

pub async fn compose(ctx: AuthenticatedContext, Form(form): Form<ComposeForm>) -> Redirect {
    match messages::compose(&ctx, ctx.identity.user_id, form.into()).await {
        Ok(_) => {
            flash::success(&ctx.session, "Message sent successfully!").await;
            Redirect::to(INBOX_PATH)
        }
        Err(e) => {
            flash::error(&ctx.session, e.message()).await;
            Redirect::to(COMPOSE_PATH)
        }
    }
}

pub async fn reply_page(ctx: AuthenticatedContext, Path(message_id): Path<i64>) -> Response {
    match messages::fetch_reply_target(&ctx, message_id, ctx.identity.user_id).await {
        Ok(original) => {
            let flashes = flash::take(&ctx.session).await;
            Html(views::messages::reply(&ctx.identity, &flashes, &original)).into_response()
        }
        Err(e) => {
            flash::error(&ctx.session, e.message()).await;
            Redirect::to(INBOX_PATH).into_response()
        }
    }
}

pub async fn reply(
    ctx: AuthenticatedContext,
    Path(message_id): Path<i64>,
    Form(form): Form<ReplyForm>,
) -> Response {
    let user_id = ctx.identity.user_id;
    let error = match messages::reply(&ctx, message_id, user_id, &form.content).await {
        Ok(_) => {
            flash::success(&ctx.session, "Reply sent successfully!").await;
            return Redirect::to(INBOX_PATH).into_response();
        }
        Err(e) => e,
    };

    flash::error(&ctx.session, error.message()).await;
    if error == AppError::MessagesNotFound {
        return Redirect::to(INBOX_PATH).into_response();
    }
    match messages::fetch_reply_target(&ctx, message_id, user_id).await {
        Ok(original) => {
            let flashes = flash::take(&ctx.session).await;
            Html(views::messages::reply(&ctx.identity, &flashes, &original)).into_response()
        }
        Err(_) => Redirect::to(INBOX_PATH).into_response(),
    }
}

pub async fn mark_read(
    ctx: AuthenticatedContext,
    Path(message_id): Path<i64>,
) -> Json<MarkReadResponse> {
    let response = match messages::mark_read(&ctx, message_id, ctx.identity.user_id).await {
        Ok(unread_count) => MarkReadResponse {
            success: true,
            unread_count: Some(unread_count),
            error: None,
        },
        Err(e) => MarkReadResponse {
            success: false,
            unread_count: None,
            error: Some(e.message()),
        },
    };
    Json(response)
}

pub async fn delete(ctx: AuthenticatedContext, Path(message_id): Path<i64>) -> Json<AckResponse> {
    match messages::delete(&ctx, message_id, ctx.identity.user_id).await {
        Ok(()) => Json(AckResponse::ok()),
        Err(e) => Json(AckResponse::failed(e.message())),
    }
}

pub async fn send(
    ctx: AuthenticatedContext,
    payload: Result<Json<ComposeArgs>, JsonRejection>,
) -> (StatusCode, Json<AckResponse>) {
    let args = match payload {
        Ok(Json(args)) => args,
        Err(rejection) => {
            tracing::warn!("Rejected message payload: {rejection}");
            let e = AppError::DecodingRequestFailed;
            return (e.http_status_code(), Json(AckResponse::failed(e.message())));
        }
    };
    match messages::compose(&ctx, ctx.identity.user_id, args).await {
        Ok(_) => (
            StatusCode::OK,
            Json(AckResponse::ok_with("Message sent successfully")),
        ),
        Err(e) => (e.http_status_code(), Json(AckResponse::failed(e.message()))),
    }
}

pub async fn notification_settings(ctx: AuthenticatedContext) -> Html<String> {
    let settings = match notifications::fetch_settings(&ctx, ctx.identity.user_id).await {
        Ok(settings) => settings,
        Err(e) => {
            let message = format!("Error loading notification settings: {}", e.message());
            flash::error(&ctx.session, message).await;
            Vec::new()
        }
    };
    let flashes = flash::take(&ctx.session).await;
    Html(views::messages::notifications(
        &ctx.identity,
        &flashes,
        &settings,
    ))
}

pub async fn update_notification_settings(
    ctx: AuthenticatedContext,
    Form(fields): Form<HashMap<String, String>>,
) -> Redirect {
    let preferences = NotificationPreference::from_form(&fields);
    match notifications::update_settings(&ctx, ctx.identity.user_id, &preferences).await {
        Ok(_) => flash::success(&ctx.session, "Notification settings updated successfully!").await,
        Err(e) => {
            let message = format!("Error updating settings: {}", e.message());
            flash::error(&ctx.session, message).await
        }
    }
    Redirect::to(NOTIFICATIONS_PATH)
}

pub async fn check_publication_request(
    ctx: AuthenticatedContext,
    Path(content_id): Path<i64>,
) -> Json<PublicationRequestStatus> {
    let status =
        match messages::publication_request_exists(&ctx, ctx.identity.user_id, content_id).await {
            Ok(exists) => PublicationRequestStatus {
                exists,
                error: None,
            },
            Err(e) => PublicationRequestStatus {
                exists: false,
                error: Some(e.message()),
            },
        };
    Json(status)
}

pub async fn unread_count(ctx: AuthenticatedContext) -> Json<UnreadCount> {
    let count = messages::unread_count(&ctx, ctx.identity.user_id)
        .await
        .unwrap_or_default();
    Json(UnreadCount { count })
}
