use std::collections::BTreeMap;
use thiserror::Error;

/// Per-field messages as returned by the server for a 400 response.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum BlogClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Бизнес-логика ошибки
    #[error("Validation failed: {}", describe_fields(.0))]
    Validation(FieldErrors),

    #[error("Resource not found")]
    NotFound,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BlogClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogClientError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BlogClientError::Unauthorized(_))
    }

    /// Maps a non-success status and its body to an error.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 => match serde_json::from_str::<FieldErrors>(body) {
                Ok(fields) if !fields.is_empty() => BlogClientError::Validation(fields),
                _ => BlogClientError::InvalidRequest(error_message(body)),
            },
            401 => BlogClientError::Unauthorized(error_message(body)),
            403 => BlogClientError::Forbidden(error_message(body)),
            404 => BlogClientError::NotFound,
            _ => BlogClientError::TransportError(format!("HTTP {}: {}", status, body)),
        }
    }
}

/// Pulls `error` out of a `{"error": "..."}` body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn describe_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn bad_request_with_field_map_becomes_validation() {
        let err = BlogClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"description": ["This field is required."]}"#,
        );
        match &err {
            BlogClientError::Validation(fields) => {
                assert_eq!(fields["description"], vec!["This field is required."]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Validation failed: description: This field is required."
        );
    }

    #[test]
    fn bad_request_with_error_body_is_invalid_request() {
        let err = BlogClientError::from_status(StatusCode::BAD_REQUEST, r#"{"error": "bad json"}"#);
        assert!(matches!(err, BlogClientError::InvalidRequest(ref m) if m == "bad json"));
    }

    #[test]
    fn status_mapping() {
        assert!(BlogClientError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(BlogClientError::from_status(StatusCode::NOT_FOUND, "{}").is_not_found());
        assert!(matches!(
            BlogClientError::from_status(StatusCode::FORBIDDEN, r#"{"error": "nope"}"#),
            BlogClientError::Forbidden(ref m) if m == "nope"
        ));
        assert!(matches!(
            BlogClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            BlogClientError::TransportError(_)
        ));
    }
}
