use crate::api::RequestContext;
use crate::common::error::{LOGIN_PATH, ServiceResult};
use crate::common::flash::{self, FlashCategory};
use crate::common::state::AppState;
use crate::models::sessions::{Identity, LoginArgs};
use crate::models::users::{PasswordResetArgs, RegistrationArgs};
use crate::usecases::{sessions, users};
use crate::views;
use axum::extract::Form;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Router;
use axum::routing::{any, get};
use serde::Deserialize;

const DASHBOARD_PATH: &str = "/dashboard";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", any(logout))
        .route(
            "/forgot-password",
            get(forgot_password_page).post(forgot_password),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub id_number: String,
    pub role: Option<String>,
    pub interests: String,
    pub terms: Option<String>,
}

impl From<RegisterForm> for RegistrationArgs {
    fn from(form: RegisterForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
            full_name: form.full_name,
            id_number: form.id_number,
            role: form.role,
            interests: form
                .interests
                .split(',')
                .map(str::trim)
                .filter(|interest| !interest.is_empty())
                .map(str::to_owned)
                .collect(),
            terms_accepted: form.terms.is_some(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordForm {
    pub email: String,
    pub id_number: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn login_page(ctx: RequestContext) -> Response {
    if ctx.identity().await.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    let flashes = flash::take(&ctx.session).await;
    Html(views::auth::login(&flashes)).into_response()
}

pub async fn login(ctx: RequestContext, Form(form): Form<LoginForm>) -> ServiceResult<Response> {
    let args = LoginArgs {
        email: form.email,
        password: form.password,
    };
    match sessions::create(&ctx, args).await {
        Ok(user) => {
            ctx.sign_in(&Identity::from(&user)).await?;
            flash::success(&ctx.session, format!("Welcome back, {}!", user.full_name)).await;
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(e) => {
            flash::error(&ctx.session, e.message()).await;
            let flashes = flash::take(&ctx.session).await;
            Ok(Html(views::auth::login(&flashes)).into_response())
        }
    }
}

pub async fn register_page(ctx: RequestContext) -> Response {
    if ctx.identity().await.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    let flashes = flash::take(&ctx.session).await;
    Html(views::auth::register(&flashes)).into_response()
}

pub async fn register(ctx: RequestContext, Form(form): Form<RegisterForm>) -> Response {
    match users::register(&ctx, form.into()).await {
        Ok(_) => {
            flash::success(&ctx.session, "Registration successful! Please login.").await;
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(e) => {
            flash::error(&ctx.session, e.message()).await;
            let flashes = flash::take(&ctx.session).await;
            Html(views::auth::register(&flashes)).into_response()
        }
    }
}

pub async fn logout(ctx: RequestContext) -> ServiceResult<Redirect> {
    if let Some(identity) = ctx.identity().await {
        sessions::delete(&ctx, identity.user_id).await;
    }
    ctx.session.flush().await?;
    flash::push(
        &ctx.session,
        FlashCategory::Info,
        "You have been logged out successfully",
    )
    .await;
    Ok(Redirect::to(LOGIN_PATH))
}

pub async fn forgot_password_page(ctx: RequestContext) -> Html<String> {
    let flashes = flash::take(&ctx.session).await;
    Html(views::auth::forgot_password(&flashes))
}

pub async fn forgot_password(
    ctx: RequestContext,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let args = PasswordResetArgs {
        email: form.email,
        id_number: form.id_number,
        new_password: form.new_password,
        confirm_password: form.confirm_password,
    };
    match users::reset_password(&ctx, args).await {
        Ok(()) => {
            flash::success(
                &ctx.session,
                "Password reset successfully! Please login with your new password.",
            )
            .await;
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(e) => {
            flash::error(&ctx.session, e.message()).await;
            let flashes = flash::take(&ctx.session).await;
            Html(views::auth::forgot_password(&flashes)).into_response()
        }
    }
}
