use thiserror::Error;

const ERROR_BODY_EXCERPT_LIMIT: usize = 320;

#[derive(Debug, Error)]
/// Failure of a single backend round trip.
pub enum RequestError {
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Derives a human-readable message for a non-2xx response.
///
/// The backend reports errors as `{"detail": …}`; anything else falls back to
/// a bounded excerpt of the raw body, then to the canonical status reason.
pub(crate) fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|detail| detail.as_str()) {
            if !detail.trim().is_empty() {
                return detail.trim().to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return truncate_for_error(trimmed, ERROR_BODY_EXCERPT_LIMIT);
    }
    format!(
        "request failed with status {}",
        status.canonical_reason().unwrap_or(status.as_str())
    )
}

pub(crate) fn truncate_for_error(body: &str, limit: usize) -> String {
    if body.chars().count() <= limit {
        return body.to_string();
    }
    let excerpt: String = body.chars().take(limit).collect();
    format!("{excerpt}…")
}
