mod common;

use common::*;
use edumate_service::api;
use edumate_service::common::state::AppState;
use edumate_service::models::notifications::NotificationType;
use edumate_service::usecases::notifications;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use serde_json::{Value, json};
use tower_sessions::{MemoryStore, SessionManagerLayer};

async fn spawn_app() -> (String, TestContext) {
    let ctx = setup().await;
    let state = AppState { db: ctx.db.clone() };
    let sessions = SessionManagerLayer::new(MemoryStore::default()).with_secure(false);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, api::app(state, sessions))
            .await
            .expect("server error");
    });
    (format!("http://{addr}"), ctx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("build client")
}

async fn logged_in(base: &str, email: &str) -> reqwest::Client {
    let client = client();
    let response = client
        .post(format!("{base}/auth/login"))
        .form(&[("email", email), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/dashboard");
    client
}

async fn send(client: &reqwest::Client, base: &str, body: Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{base}/messages/send"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn anonymous_users_are_sent_to_login() {
    let (base, _) = spawn_app().await;
    let client = client();

    for path in ["/messages/", "/messages/compose", "/dashboard"] {
        let response = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.headers()[LOCATION], "/auth/login");
    }

    let login_page = client.get(format!("{base}/auth/login")).send().await.unwrap();
    let html = login_page.text().await.unwrap();
    assert!(html.contains("Please log in to access this page."));
}

#[tokio::test]
async fn wrong_password_renders_login_with_error() {
    let (base, _) = spawn_app().await;
    let response = client()
        .post(format!("{base}/auth/login"))
        .form(&[("email", "sam@school.com"), ("password", "wrong")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Invalid email or password"));
}

#[tokio::test]
async fn json_send_then_read_and_count() {
    let (base, _) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;
    let ivy = logged_in(&base, "ivy@school.com").await;

    let (status, body) = send(
        &sam,
        &base,
        json!({"receiver_id": INSTRUCTOR_ID, "subject": "Hello", "content": "Hi there"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Message sent successfully"}));

    let count: Value = ivy
        .get(format!("{base}/messages/api/unread-count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, json!({"count": 1}));

    let inbox = ivy.get(format!("{base}/messages/")).send().await.unwrap();
    assert_eq!(inbox.status(), StatusCode::OK);
    assert!(inbox.text().await.unwrap().contains("Hello"));

    let marked: Value = ivy
        .post(format!("{base}/messages/mark-read/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(marked, json!({"success": true, "unread_count": 0}));
}

#[tokio::test]
async fn json_send_rejects_invalid_payloads() {
    let (base, _) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;

    let (status, body) = send(
        &sam,
        &base,
        json!({"receiver_id": INSTRUCTOR_ID, "subject": "", "content": "Hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "All fields are required."}));

    let request = json!({
        "receiver_id": ADMIN_ID,
        "subject": "Publication Request: Algebra Basics",
        "content": "Please review",
        "related_content_id": CONTENT_ID,
    });
    let (status, _) = send(&sam, &base, request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&sam, &base, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"],
        json!("You have already sent a publication request for this content. Please wait for admin review.")
    );

    let request_status: Value = sam
        .get(format!("{base}/messages/check-publication-request/{CONTENT_ID}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(request_status, json!({"exists": true}));
}

#[tokio::test]
async fn strangers_cannot_delete_or_view() {
    let (base, _) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;
    let olga = logged_in(&base, "olga@school.com").await;

    let (status, _) = send(
        &sam,
        &base,
        json!({"receiver_id": INSTRUCTOR_ID, "subject": "Hello", "content": "Hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let deleted: Value = olga
        .post(format!("{base}/messages/delete/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        deleted,
        json!({"success": false, "error": "Message not found or access denied."})
    );

    let viewed = olga.get(format!("{base}/messages/1")).send().await.unwrap();
    assert_eq!(viewed.status(), StatusCode::SEE_OTHER);
    assert_eq!(viewed.headers()[LOCATION], "/messages/");

    let deleted: Value = sam
        .post(format!("{base}/messages/delete/1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted, json!({"success": true}));
}

#[tokio::test]
async fn compose_form_flashes_validation_errors() {
    let (base, _) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;

    let response = sam
        .post(format!("{base}/messages/compose"))
        .form(&[("receiver_id", ""), ("subject", "Hello"), ("content", "Hi")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/messages/compose");

    let page = sam
        .get(format!("{base}/messages/compose"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("All fields are required."));
    assert!(page.contains("Ivy Instructor"));
    assert!(!page.contains("Ian Inactive"));
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (base, _) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;

    let response = sam.get(format!("{base}/auth/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/auth/login");

    let response = sam.get(format!("{base}/messages/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn json_send_accepts_numeric_string_ids() {
    let (base, ctx) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;

    let (status, body) = send(
        &sam,
        &base,
        json!({"receiver_id": "8", "subject": "Hello", "content": "Hi", "related_content_id": "3"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let stored = fetch_message(&ctx, 1).await;
    assert_eq!(stored.receiver_id, INSTRUCTOR_ID);
    assert_eq!(stored.related_content_id, Some(CONTENT_ID));

    let (status, body) = send(
        &sam,
        &base,
        json!({"receiver_id": "ivy", "subject": "Hello", "content": "Hi"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(count_messages(&ctx).await, 1);
}

#[tokio::test]
async fn receiver_reply_threads_under_the_original() {
    let (base, ctx) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;
    let ivy = logged_in(&base, "ivy@school.com").await;
    send(
        &sam,
        &base,
        json!({"receiver_id": INSTRUCTOR_ID, "subject": "Homework", "content": "Question 2?"}),
    )
    .await;

    let page = ivy.get(format!("{base}/messages/reply/1")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("Homework"));

    let response = ivy
        .post(format!("{base}/messages/reply/1"))
        .form(&[("content", "See chapter 4.")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/messages/");

    let reply = fetch_message(&ctx, 2).await;
    assert_eq!(reply.sender_id, INSTRUCTOR_ID);
    assert_eq!(reply.receiver_id, STUDENT_ID);
    assert_eq!(reply.subject, "Re: Homework");
    assert_eq!(reply.content, "See chapter 4.");
    assert_eq!(reply.parent_message_id, Some(1));

    let inbox = ivy.get(format!("{base}/messages/")).send().await.unwrap();
    assert!(inbox.text().await.unwrap().contains("Reply sent successfully!"));
}

#[tokio::test]
async fn blank_reply_renders_the_form_again() {
    let (base, ctx) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;
    let ivy = logged_in(&base, "ivy@school.com").await;
    send(
        &sam,
        &base,
        json!({"receiver_id": INSTRUCTOR_ID, "subject": "Homework", "content": "Question 2?"}),
    )
    .await;

    let response = ivy
        .post(format!("{base}/messages/reply/1"))
        .form(&[("content", "   ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Message content is required."));
    assert!(html.contains("Homework"));
    assert_eq!(count_messages(&ctx).await, 1);
}

#[tokio::test]
async fn only_the_receiver_can_reply() {
    let (base, ctx) = spawn_app().await;
    let sam = logged_in(&base, "sam@school.com").await;
    send(
        &sam,
        &base,
        json!({"receiver_id": INSTRUCTOR_ID, "subject": "Homework", "content": "Question 2?"}),
    )
    .await;

    let page = sam.get(format!("{base}/messages/reply/1")).send().await.unwrap();
    assert_eq!(page.status(), StatusCode::SEE_OTHER);
    assert_eq!(page.headers()[LOCATION], "/messages/");

    let response = sam
        .post(format!("{base}/messages/reply/1"))
        .form(&[("content", "Talking to myself")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/messages/");
    assert_eq!(count_messages(&ctx).await, 1);

    let inbox = sam.get(format!("{base}/messages/")).send().await.unwrap();
    assert!(inbox.text().await.unwrap().contains("Message not found or access denied."));
}

#[tokio::test]
async fn notification_form_stores_unchecked_boxes_as_off() {
    let (base, ctx) = spawn_app().await;
    let mut conn = ctx.db.acquire().await.unwrap();
    notifications::create_defaults(&mut conn, INSTRUCTOR_ID, chrono::Utc::now())
        .await
        .unwrap();
    drop(conn);
    let ivy = logged_in(&base, "ivy@school.com").await;

    let response = ivy
        .post(format!("{base}/messages/notifications"))
        .form(&[
            ("new_message_enabled", "on"),
            ("message_reply_email", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/messages/notifications");

    let settings = notifications::fetch_settings(&ctx, INSTRUCTOR_ID).await.unwrap();
    assert_eq!(settings.len(), 4);
    for setting in settings {
        let (enabled, email) = match setting.notification_type {
            NotificationType::NewMessage => (true, false),
            NotificationType::MessageReply => (false, true),
            _ => (false, false),
        };
        assert_eq!(setting.is_enabled, enabled, "{:?}", setting.notification_type);
        assert_eq!(setting.email_enabled, email, "{:?}", setting.notification_type);
    }

    let page = ivy.get(format!("{base}/messages/notifications")).send().await.unwrap();
    assert!(page.text().await.unwrap().contains("Notification settings updated successfully!"));
}
