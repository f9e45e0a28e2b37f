// Input validation for event APIs
//
// Last-resort size limits applied before a request reaches the service.
// These are hard limits, not configurable.

use super::common::ErrorResponse;
use axum::http::StatusCode;
use axum::Json;

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum size for the event name.
pub const MAX_EVENT_NAME_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum size for a custom message.
pub const MAX_CUSTOM_MESSAGE_BYTES: usize = 10 * 1024; // 10 KB

/// Maximum size for the contact destination (address, phone, webhook).
pub const MAX_CONTACT_DESTINATION_BYTES: usize = 2 * 1024; // 2 KB

/// Maximum number of tags on one event.
pub const MAX_EVENT_TAGS: usize = 50;

/// Maximum size for a CSV import body.
pub const MAX_IMPORT_BODY_BYTES: usize = 5 * 1024 * 1024; // 5 MB

/// Generic validation error message returned to clients.
pub const VALIDATION_ERROR_MESSAGE: &str = "Input exceeds allowed limits";

// =============================================================================
// Validation Functions
// =============================================================================

/// Validation error - returns generic message to avoid leaking details
#[derive(Debug)]
pub struct ValidationError;

impl From<ValidationError> for StatusCode {
    fn from(_: ValidationError) -> Self {
        StatusCode::BAD_REQUEST
    }
}

impl From<ValidationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(_: ValidationError) -> Self {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(VALIDATION_ERROR_MESSAGE)),
        )
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        tracing::warn!(
            "Event {} exceeds limit: {} bytes (max: {})",
            field,
            value.len(),
            max
        );
        return Err(ValidationError);
    }
    Ok(())
}

pub fn validate_event_name(name: &str) -> Result<(), ValidationError> {
    check_len("name", name, MAX_EVENT_NAME_BYTES)
}

pub fn validate_custom_message(message: &str) -> Result<(), ValidationError> {
    check_len("custom message", message, MAX_CUSTOM_MESSAGE_BYTES)
}

pub fn validate_contact_destination(contact: &str) -> Result<(), ValidationError> {
    check_len("contact destination", contact, MAX_CONTACT_DESTINATION_BYTES)
}

/// Validate tag count and each tag against the name limit
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_EVENT_TAGS {
        tracing::warn!(
            "Event tags exceed limit: {} (max: {})",
            tags.len(),
            MAX_EVENT_TAGS
        );
        return Err(ValidationError);
    }
    tags.iter()
        .try_for_each(|tag| check_len("tag", tag, MAX_EVENT_NAME_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_at_limit_is_accepted() {
        assert!(validate_event_name(&"a".repeat(MAX_EVENT_NAME_BYTES)).is_ok());
        assert!(validate_event_name(&"a".repeat(MAX_EVENT_NAME_BYTES + 1)).is_err());
    }

    #[test]
    fn test_limits_count_bytes_not_chars() {
        // "ã" is two bytes in UTF-8
        let name = "ã".repeat(MAX_EVENT_NAME_BYTES / 2 + 1);
        assert!(validate_event_name(&name).is_err());
    }

    #[test]
    fn test_custom_message_and_contact() {
        assert!(validate_custom_message(&"x".repeat(MAX_CUSTOM_MESSAGE_BYTES)).is_ok());
        assert!(validate_custom_message(&"x".repeat(MAX_CUSTOM_MESSAGE_BYTES + 1)).is_err());
        assert!(validate_contact_destination("ana@example.com").is_ok());
        assert!(
            validate_contact_destination(&"x".repeat(MAX_CONTACT_DESTINATION_BYTES + 1))
                .is_err()
        );
    }

    #[test]
    fn test_tags() {
        let tags = vec!["family".to_string(); MAX_EVENT_TAGS];
        assert!(validate_tags(&tags).is_ok());

        let too_many = vec!["family".to_string(); MAX_EVENT_TAGS + 1];
        assert!(validate_tags(&too_many).is_err());

        let too_long = vec!["t".repeat(MAX_EVENT_NAME_BYTES + 1)];
        assert!(validate_tags(&too_long).is_err());
    }

    #[test]
    fn test_error_conversion() {
        let status: StatusCode = ValidationError.into();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, Json(body)): (StatusCode, Json<ErrorResponse>) = ValidationError.into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, VALIDATION_ERROR_MESSAGE);
    }
}
