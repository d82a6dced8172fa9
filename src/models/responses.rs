use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl AckResponse {
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
            error: None,
        }
    }

    pub const fn ok_with(message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            error: None,
        }
    }

    pub const fn failed(error: &'static str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicationRequestStatus {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}
