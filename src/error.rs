use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Expected a response body but the server sent none.")]
    EmptyResponse,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
}

impl ApiError {
    /// Human-readable text for toasts and log lines.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Builds the error for a non-success response from whatever body the server sent.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| message_field(&value))
            .unwrap_or_else(|| {
                format!(
                    "Request failed: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )
                .trim_end()
                .to_string()
            });
        ApiError::Status { status, message }
    }
}

fn message_field(value: &serde_json::Value) -> Option<String> {
    match value.get("message")? {
        serde_json::Value::String(message) if !message.is_empty() => Some(message.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|item| item.as_str()).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
