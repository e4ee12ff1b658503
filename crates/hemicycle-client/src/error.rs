use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the client.
///
/// Payloads of an unexpected shape are not errors: the normaliser absorbs
/// them into empty lists.
#[derive(Error, Debug, Clone)]
pub enum ClientError {
    /// Backend unreachable, connection dropped, or timed out.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned {status}: {}", message.as_deref().unwrap_or("no detail"))]
    HttpStatus {
        status: u16,
        /// `message` or `detail` from a JSON error body.
        message: Option<String>,
    },

    #[error("gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an [`ClientError::HttpStatus`] from a non-2xx response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(structured_message);
        Self::HttpStatus { status, message }
    }

    /// Whether the retry controller may try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }

    /// HTTP status of the underlying failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RetryExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Text to show the user: the backend's own message when it sent one,
    /// else the transport's.
    pub fn user_message(&self) -> String {
        match self {
            Self::HttpStatus {
                message: Some(m), ..
            } => m.clone(),
            Self::HttpStatus {
                status,
                message: None,
            } => format!("server returned HTTP {status}"),
            Self::Transport(m) | Self::Config(m) => m.clone(),
            Self::RetryExhausted { last, .. } => last.user_message(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport(format!("request timed out: {e}"))
        } else if e.is_builder() {
            Self::Config(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// `message`, else `detail` (a string, or a list of strings).
fn structured_message(body: &Value) -> Option<String> {
    let pick = |v: &Value| match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    };
    body.get("message")
        .and_then(pick)
        .or_else(|| body.get("detail").and_then(pick))
}
