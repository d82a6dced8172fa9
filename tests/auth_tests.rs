mod common;

use common::*;
use edumate_service::common::error::AppError;
use edumate_service::models::messages::MessageType;
use edumate_service::models::sessions::LoginArgs;
use edumate_service::models::users::{PasswordResetArgs, RegistrationArgs, Role};
use edumate_service::repositories::system_logs;
use edumate_service::usecases::{messages, notifications, sessions, users};

fn registration() -> RegistrationArgs {
    RegistrationArgs {
        username: "nina".to_owned(),
        email: "nina@school.com".to_owned(),
        password: "letmein42".to_owned(),
        confirm_password: "letmein42".to_owned(),
        full_name: "Nina New".to_owned(),
        id_number: "2024001".to_owned(),
        role: Some("instructor".to_owned()),
        interests: vec!["math".to_owned(), "physics".to_owned()],
        terms_accepted: true,
    }
}

fn login_args(email: &str, password: &str) -> LoginArgs {
    LoginArgs {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn registration_seeds_the_new_account() {
    let ctx = setup().await;
    let user_id = users::register(&ctx, registration()).await.unwrap();

    let user = users::fetch_one(&ctx, user_id).await.unwrap();
    assert_eq!(user.username, "nina");
    assert_eq!(user.role, Role::Instructor);
    assert!(user.is_active);

    let settings = notifications::fetch_settings(&ctx, user_id).await.unwrap();
    assert_eq!(settings.len(), 4);
    assert!(settings.iter().all(|setting| setting.is_enabled && !setting.email_enabled));

    let inbox = messages::fetch_inbox(&ctx, user_id).await.unwrap();
    assert_eq!(inbox.received.len(), 1);
    assert_eq!(inbox.received[0].message.sender_id, ADMIN_ID);
    assert_eq!(inbox.received[0].message.message_type, MessageType::System);
    assert_eq!(inbox.unread_count, 1);

    let logs = system_logs::fetch_by_user(&ctx.db, user_id).await.unwrap();
    assert!(logs.iter().any(|log| log.action == "REGISTERED"));
}

#[tokio::test]
async fn registration_validates_input_in_order() {
    let ctx = setup().await;
    let cases = [
        (
            RegistrationArgs {
                full_name: " ".to_owned(),
                ..registration()
            },
            AppError::RegistrationMissingFields,
        ),
        (
            RegistrationArgs {
                id_number: "20-24".to_owned(),
                ..registration()
            },
            AppError::RegistrationInvalidIdNumber,
        ),
        (
            RegistrationArgs {
                email: "nina@school.org".to_owned(),
                ..registration()
            },
            AppError::RegistrationInvalidEmail,
        ),
        (
            RegistrationArgs {
                password: "let-me-in".to_owned(),
                confirm_password: "let-me-in".to_owned(),
                terms_accepted: false,
                ..registration()
            },
            AppError::CredentialsInvalidPassword,
        ),
        (
            RegistrationArgs {
                terms_accepted: false,
                confirm_password: "different1".to_owned(),
                ..registration()
            },
            AppError::RegistrationTermsNotAccepted,
        ),
        (
            RegistrationArgs {
                confirm_password: "different1".to_owned(),
                ..registration()
            },
            AppError::CredentialsPasswordMismatch,
        ),
        (
            RegistrationArgs {
                password: "abc12".to_owned(),
                confirm_password: "abc12".to_owned(),
                ..registration()
            },
            AppError::CredentialsPasswordTooShort,
        ),
        (
            RegistrationArgs {
                role: Some("admin".to_owned()),
                ..registration()
            },
            AppError::RegistrationInvalidRole,
        ),
    ];

    for (args, expected) in cases {
        assert_eq!(users::register(&ctx, args).await.unwrap_err(), expected);
    }
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&ctx.db)
        .await
        .unwrap();
    assert_eq!(count, 5);
}

#[tokio::test]
async fn registration_rejects_taken_identifiers() {
    let ctx = setup().await;
    let args = RegistrationArgs {
        email: "sam@school.com".to_owned(),
        ..registration()
    };
    let result = users::register(&ctx, args).await;
    assert_eq!(result.unwrap_err(), AppError::RegistrationAlreadyExists);
}

#[tokio::test]
async fn login_checks_password_and_activity() {
    let ctx = setup().await;

    let user = sessions::create(&ctx, login_args("sam@school.com", PASSWORD))
        .await
        .unwrap();
    assert_eq!(user.user_id, STUDENT_ID);
    assert_eq!(user.role, Role::Student);
    let stored = users::fetch_one(&ctx, STUDENT_ID).await.unwrap();
    assert!(stored.last_login.is_some());

    let wrong = sessions::create(&ctx, login_args("sam@school.com", "nope1234")).await;
    assert_eq!(wrong.unwrap_err(), AppError::SessionsInvalidCredentials);

    let inactive = sessions::create(&ctx, login_args("ian@school.com", PASSWORD)).await;
    assert_eq!(inactive.unwrap_err(), AppError::SessionsInvalidCredentials);

    let unknown = sessions::create(&ctx, login_args("who@school.com", PASSWORD)).await;
    assert_eq!(unknown.unwrap_err(), AppError::SessionsInvalidCredentials);

    let empty = sessions::create(&ctx, login_args(" ", "")).await;
    assert_eq!(empty.unwrap_err(), AppError::SessionsMissingCredentials);
}

#[tokio::test]
async fn password_reset_needs_matching_identity() {
    let ctx = setup().await;
    let reset = |id_number: &str| PasswordResetArgs {
        email: "sam@school.com".to_owned(),
        id_number: id_number.to_owned(),
        new_password: "brandnew9".to_owned(),
        confirm_password: "brandnew9".to_owned(),
    };

    let mismatch = users::reset_password(&ctx, reset("9999")).await;
    assert_eq!(mismatch.unwrap_err(), AppError::PasswordResetNoMatch);

    let missing = users::reset_password(&ctx, PasswordResetArgs::default()).await;
    assert_eq!(missing.unwrap_err(), AppError::PasswordResetMissingIdentity);

    users::reset_password(&ctx, reset("1005")).await.unwrap();
    let old = sessions::create(&ctx, login_args("sam@school.com", PASSWORD)).await;
    assert_eq!(old.unwrap_err(), AppError::SessionsInvalidCredentials);
    let user = sessions::create(&ctx, login_args("sam@school.com", "brandnew9"))
        .await
        .unwrap();
    assert_eq!(user.user_id, STUDENT_ID);
}
