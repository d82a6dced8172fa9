use crate::common::state::AppState;
use crate::settings::AppSettings;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let db = initialize_db(settings).await?;
    run_migrations(&db).await?;
    Ok(AppState { db })
}

pub async fn initialize_db(settings: &AppSettings) -> anyhow::Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal);
    let db = SqlitePoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections)
        .connect_with(options)
        .await?;
    Ok(db)
}

pub async fn run_migrations(db: &Pool<Sqlite>) -> anyhow::Result<()> {
    MIGRATOR.run(db).await?;
    tracing::info!("Database migrations are up to date");
    Ok(())
}

pub fn initialize_sessions(settings: &AppSettings) -> SessionManagerLayer<MemoryStore> {
    let lifetime = time::Duration::seconds(settings.session_lifetime.as_secs() as i64);
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(settings.session_secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(lifetime))
}
