use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const FLASHES_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashCategory {
    Success,
    Info,
    Warning,
    Error,
}

impl FlashCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Info => "info",
            FlashCategory::Warning => "warning",
            FlashCategory::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

/// Queues a one-shot notice for the next rendered page.
/// Failures are logged and swallowed, a lost notice never fails the request.
pub async fn push(session: &Session, category: FlashCategory, message: impl Into<String>) {
    let mut flashes: Vec<Flash> = match session.get(FLASHES_KEY).await {
        Ok(flashes) => flashes.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read flashes from session: {e}");
            Vec::new()
        }
    };
    flashes.push(Flash {
        category,
        message: message.into(),
    });
    if let Err(e) = session.insert(FLASHES_KEY, flashes).await {
        tracing::warn!("Failed to store flash in session: {e}");
    }
}

pub async fn error(session: &Session, message: impl Into<String>) {
    push(session, FlashCategory::Error, message).await
}

pub async fn success(session: &Session, message: impl Into<String>) {
    push(session, FlashCategory::Success, message).await
}

/// Drains every queued notice.
pub async fn take(session: &Session) -> Vec<Flash> {
    match session.remove::<Vec<Flash>>(FLASHES_KEY).await {
        Ok(flashes) => flashes.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to take flashes from session: {e}");
            Vec::new()
        }
    }
}
