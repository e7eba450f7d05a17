// ============================================================================
// API ERROR - Taxonomía de errores + normalización a un único mensaje
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::utils::constants::GENERIC_ERROR_MESSAGE;
use crate::utils::storage::StorageError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Fallo de red / transporte (sin respuesta HTTP)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// 401: ya se disparó el logout global antes de llegar aquí
    #[error("Unauthorized")]
    Unauthorized { body: Option<Value> },

    /// Cualquier otro status no 2xx (validación 4xx, fallo 5xx)
    #[error("HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No se pudo persistir el token en el storage local
    #[error("Storage error: {0}")]
    Storage(String),

    /// Ya hay un alta del mismo tipo en vuelo
    #[error("A submission of this kind is already in progress")]
    DuplicateSubmission,

    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Unauthorized { body } | ApiError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Mensaje para la UI, por prioridad:
    /// campo `error` del servidor → `message` → `detail` → mensaje genérico de
    /// la operación → "An error occurred".
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(body) = self.body() {
            for field in ["error", "message", "detail"] {
                if let Some(text) = body.get(field).and_then(Value::as_str) {
                    if !text.trim().is_empty() {
                        return text.to_string();
                    }
                }
            }
        }
        if !fallback.trim().is_empty() {
            return fallback.to_string();
        }
        GENERIC_ERROR_MESSAGE.to_string()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Parse(e.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(body: Value) -> ApiError {
        ApiError::Status { status: 400, body: Some(body) }
    }

    #[test]
    fn test_error_field_wins_over_message() {
        let err = status(json!({ "error": "name already exists", "message": "Invalid input" }));
        assert_eq!(err.user_message("Failed to create department"), "name already exists");
    }

    #[test]
    fn test_message_then_detail_then_fallback() {
        assert_eq!(status(json!({ "message": "Invalid input data" })).user_message("x"), "Invalid input data");
        assert_eq!(
            status(json!({ "detail": "Not found." })).user_message("x"),
            "Not found."
        );
        assert_eq!(
            status(json!({ "name": ["This field is required."] })).user_message("Failed to create department"),
            "Failed to create department"
        );
    }

    #[test]
    fn test_literal_fallback_when_nothing_usable() {
        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.user_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(ApiError::Status { status: 500, body: None }.user_message("  "), "An error occurred");
    }

    #[test]
    fn test_non_string_error_field_is_skipped() {
        let err = status(json!({ "error": { "code": 12 }, "message": "Registration failed." }));
        assert_eq!(err.user_message("x"), "Registration failed.");
    }
}
