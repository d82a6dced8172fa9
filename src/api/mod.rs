use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::common::flash::{self, FlashCategory};
use crate::common::init;
use crate::common::state::AppState;
use crate::models::sessions::Identity;
use crate::settings::AppSettings;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::get;
use sqlx::{Pool, Sqlite};
use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};
use tracing::info;

pub mod auth;
pub mod messages;
pub mod pages;

const IDENTITY_KEY: &str = "identity";

/// Per-request context for pages open to visitors.
pub struct RequestContext {
    pub db: Pool<Sqlite>,
    pub session: Session,
}

/// Per-request context of a signed-in user. Extraction fails with
/// [`AppError::Unauthenticated`], which redirects to the login page.
pub struct AuthenticatedContext {
    pub db: Pool<Sqlite>,
    pub session: Session,
    pub identity: Identity,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/dashboard", get(pages::dashboard))
        .nest("/auth", auth::router())
        .merge(messages::router())
}

pub fn app(state: AppState, sessions: SessionManagerLayer<MemoryStore>) -> Router {
    router()
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let sessions = init::initialize_sessions(settings);
    let listener = tokio::net::TcpListener::bind((settings.app_host, settings.app_port)).await?;
    info!("Serving on {}", listener.local_addr()?);
    axum::serve(listener, app(state, sessions)).await?;
    Ok(())
}

impl RequestContext {
    pub async fn identity(&self) -> Option<Identity> {
        match self.session.get::<Identity>(IDENTITY_KEY).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!("Failed to read identity from session: {e}");
                None
            }
        }
    }

    /// Binds the session to `identity` under a fresh session id.
    pub async fn sign_in(&self, identity: &Identity) -> ServiceResult<()> {
        self.session.cycle_id().await?;
        self.session.insert(IDENTITY_KEY, identity).await?;
        Ok(())
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = match Session::from_request_parts(parts, state).await {
            Ok(session) => session,
            Err((_, reason)) => return Err(AppError::InternalServerError(reason)),
        };
        Ok(Self {
            db: state.db.clone(),
            session,
        })
    }
}

impl FromRequestParts<AppState> for AuthenticatedContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequestContext { db, session } =
            RequestContext::from_request_parts(parts, state).await?;
        match session.get::<Identity>(IDENTITY_KEY).await {
            Ok(Some(identity)) => Ok(Self {
                db,
                session,
                identity,
            }),
            Ok(None) => {
                let reason = AppError::Unauthenticated;
                flash::push(&session, FlashCategory::Warning, reason.message()).await;
                Err(reason)
            }
            Err(e) => unexpected(e),
        }
    }
}

impl Context for RequestContext {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }
}

impl Context for AuthenticatedContext {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }
}
