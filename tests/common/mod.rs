#![allow(dead_code)]

use chrono::Utc;
use edumate_service::common::context::Context;
use edumate_service::common::init::MIGRATOR;
use edumate_service::entities::messages::Message;
use edumate_service::repositories::messages;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

pub const ADMIN_ID: i64 = 1;
pub const STUDENT_ID: i64 = 5;
pub const INSTRUCTOR_ID: i64 = 8;
pub const OTHER_STUDENT_ID: i64 = 9;
pub const INACTIVE_ID: i64 = 12;
pub const CONTENT_ID: i64 = 3;
pub const PASSWORD: &str = "secret123";

pub struct TestContext {
    pub db: Pool<Sqlite>,
}

impl Context for TestContext {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }
}

pub async fn setup() -> TestContext {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite");
    MIGRATOR.run(&db).await.expect("run migrations");

    let password_hash = bcrypt::hash(PASSWORD, 4).expect("hash password");
    let users = [
        (ADMIN_ID, "admin", "admin@edumate.com", "EduMate Admin", "1000", "admin", true),
        (STUDENT_ID, "sam", "sam@school.com", "Sam Student", "1005", "student", true),
        (INSTRUCTOR_ID, "ivy", "ivy@school.com", "Ivy Instructor", "1008", "instructor", true),
        (OTHER_STUDENT_ID, "olga", "olga@school.com", "Olga Other", "1009", "student", true),
        (INACTIVE_ID, "ian", "ian@school.com", "Ian Inactive", "1012", "student", false),
    ];
    for (id, username, email, full_name, id_number, role, is_active) in users {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, full_name, id_number, role,
             is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(full_name)
        .bind(id_number)
        .bind(role)
        .bind(is_active)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&db)
        .await
        .expect("seed user");
    }
    sqlx::query("INSERT INTO content (id, title, uploaded_by, created_at) VALUES (?, ?, ?, ?)")
        .bind(CONTENT_ID)
        .bind("Algebra Basics")
        .bind(STUDENT_ID)
        .bind(Utc::now())
        .execute(&db)
        .await
        .expect("seed content");

    TestContext { db }
}

pub async fn fetch_message(ctx: &TestContext, message_id: i64) -> Message {
    messages::fetch_one(&ctx.db, message_id)
        .await
        .expect("fetch message")
        .expect("message exists")
}

pub async fn count_messages(ctx: &TestContext) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(&ctx.db)
        .await
        .expect("count messages")
}
