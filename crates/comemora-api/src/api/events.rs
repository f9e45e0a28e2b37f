// Event CRUD and CSV transfer HTTP routes

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use comemora_core::{Event, EventId, EventType, NotificationChannel};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{not_found, service_error, ApiError, ErrorResponse, ListResponse};
use super::validation::{self, ValidationError, MAX_IMPORT_BODY_BYTES};
use super::AppState;

/// Request to create a new event
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Who or what is being celebrated. Must not be empty.
    #[schema(example = "Ana")]
    pub name: String,
    /// Day of month (1-31).
    #[schema(example = 15)]
    pub day: u32,
    /// Month (1-12).
    #[schema(example = 6)]
    pub month: u32,
    /// Year of the first occurrence, 0 when unknown. Never used for matching.
    #[serde(default)]
    #[schema(example = 1990)]
    pub year: i32,
    /// Event type tag. Unknown tags are kept and use the generic template.
    #[serde(rename = "type", default)]
    #[schema(value_type = String, example = "aniversario")]
    pub event_type: EventType,
    #[serde(default)]
    #[schema(example = json!(["family"]))]
    pub tags: Vec<String>,
    /// Delivery channel: Email, Teams, WhatsApp or SMS.
    #[serde(default)]
    #[schema(value_type = String, example = "Email")]
    pub preferred_channel: NotificationChannel,
    /// Address, phone number or webhook for the channel.
    #[serde(default)]
    #[schema(example = "ana@example.com")]
    pub contact_destination: String,
    /// Replaces the type template verbatim when set.
    #[serde(default)]
    pub custom_message: String,
    /// Important events are also notified ahead of time.
    #[serde(default)]
    pub is_important: bool,
}

impl CreateEventRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_event_name(&self.name)?;
        validation::validate_custom_message(&self.custom_message)?;
        validation::validate_contact_destination(&self.contact_destination)?;
        validation::validate_tags(&self.tags)
    }

    fn into_event(self) -> Event {
        Event::new(self.name, self.day, self.month, self.event_type)
            .with_year(self.year)
            .with_tags(self.tags)
            .with_channel(self.preferred_channel, self.contact_destination)
            .with_custom_message(self.custom_message)
            .important(self.is_important)
    }
}

/// Result of a CSV import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    /// Number of rows saved as new events.
    #[schema(example = 2)]
    pub imported: usize,
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events", post(create_event).get(list_events))
        .route("/v1/events/export", get(export_events))
        .route(
            "/v1/events/import",
            post(import_events).layer(DefaultBodyLimit::max(MAX_IMPORT_BODY_BYTES)),
        )
        .route("/v1/events/:event_id", get(get_event).delete(delete_event))
        .with_state(state)
}

/// POST /v1/events - Create a new event
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created successfully", body = Event),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    req.validate()?;

    let event = state
        .service
        .create_event(req.into_event(), &state.request_token())
        .await
        .map_err(|e| service_error("create event", e))?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events - List all events
#[utoipa::path(
    get,
    path = "/v1/events",
    responses(
        (status = 200, description = "List of events", body = ListResponse<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state
        .service
        .list_events(&state.request_token())
        .await
        .map_err(|e| service_error("list events", e))?;

    Ok(Json(ListResponse::new(events)))
}

/// GET /v1/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .service
        .get_event(event_id, &state.request_token())
        .await
        .map_err(|e| service_error("get event", e))?
        .ok_or_else(|| not_found("Event"))?;

    Ok(Json(event))
}

/// DELETE /v1/events/{event_id} - Delete event
#[utoipa::path(
    delete,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .service
        .delete_event(event_id, &state.request_token())
        .await
        .map_err(|e| service_error("delete event", e))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Event"))
    }
}

/// GET /v1/events/export - Export all events as CSV
#[utoipa::path(
    get,
    path = "/v1/events/export",
    responses(
        (status = 200, description = "Events exported as CSV", content_type = "text/csv"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn export_events(State(state): State<AppState>) -> Result<Response, ApiError> {
    let data = state
        .service
        .export_events(&state.request_token())
        .await
        .map_err(|e| service_error("export events", e))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=events.csv"),
        ],
        data,
    )
        .into_response())
}

/// POST /v1/events/import - Import events from CSV
///
/// The first line is a header and is ignored. Rows with fewer than nine
/// fields are skipped. Every imported row becomes a new event, whatever
/// its ID column says.
#[utoipa::path(
    post,
    path = "/v1/events/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Events imported", body = ImportResponse),
        (status = 400, description = "Unreadable CSV", body = ErrorResponse),
        (status = 413, description = "Body too large"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn import_events(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, ApiError> {
    let imported = state
        .service
        .import_events(&body, &state.request_token())
        .await
        .map_err(|e| service_error("import events", e))?;

    Ok(Json(ImportResponse { imported }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateEventRequest =
            serde_json::from_str(r#"{"name": "Ana", "day": 15, "month": 6}"#).unwrap();
        assert_eq!(req.year, 0);
        assert_eq!(req.event_type, EventType::Other);
        assert_eq!(req.preferred_channel, NotificationChannel::Email);
        assert!(!req.is_important);

        let event = req.into_event();
        assert_eq!(event.id, 0);
        assert!(event.occurs_on(15, 6));
    }

    #[test]
    fn test_create_request_full() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{
                "name": "Rex",
                "day": 1,
                "month": 2,
                "year": 2019,
                "type": "pet",
                "tags": ["dog"],
                "preferred_channel": "WhatsApp",
                "contact_destination": "+5511999999999",
                "custom_message": "Happy birthday, {name}",
                "is_important": true
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let event = req.into_event();
        assert_eq!(event.event_type, EventType::Pet);
        assert_eq!(event.preferred_channel, NotificationChannel::WhatsApp);
        assert_eq!(event.tags, vec!["dog"]);
        assert!(event.is_important);
        assert_eq!(event.render_content(), "Happy birthday, {name}");
    }

    #[test]
    fn test_create_request_oversized_message() {
        let req = CreateEventRequest {
            name: "Ana".to_string(),
            day: 1,
            month: 1,
            year: 0,
            event_type: EventType::Other,
            tags: vec![],
            preferred_channel: NotificationChannel::Email,
            contact_destination: String::new(),
            custom_message: "x".repeat(validation::MAX_CUSTOM_MESSAGE_BYTES + 1),
            is_important: false,
        };
        assert!(req.validate().is_err());
    }
}
