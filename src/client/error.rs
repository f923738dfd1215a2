use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: Value },
}

impl ClientError {
    /// HTTP status of an API failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Url(_) => None,
        }
    }

    /// Error payload returned by the server, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ClientError::Api { body, .. } if !body.is_null() => Some(body),
            _ => None,
        }
    }
}

/// First human-readable message in a DRF-style error payload.
///
/// `{"detail": "..."}` wins; otherwise the first field error, where a field
/// maps to either a string or a list of strings.
pub fn first_error_message(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;

    if let Some(detail) = object.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }

    object.iter().find_map(|(field, value)| {
        let message = match value {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(|i| i.as_str().map(str::to_string)),
            _ => None,
        }?;
        Some(format!("{}: {}", field, message))
    })
}
