// OpenAPI specification generation
//
// Shared by the server (Swagger UI) and the export-openapi binary.

use crate::api;
use crate::api::ListResponse;
use comemora_core::Event;
use utoipa::OpenApi;

/// OpenAPI documentation for the Comemora API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::create_event,
        api::events::list_events,
        api::events::get_event,
        api::events::delete_event,
        api::events::export_events,
        api::events::import_events,
        api::notifications::check_and_notify,
        api::notifications::trigger_check,
    ),
    components(
        schemas(
            Event,
            ListResponse<Event>,
            api::ErrorResponse,
            api::events::CreateEventRequest,
            api::events::ImportResponse,
            api::notifications::CheckResponse,
        )
    ),
    tags(
        (name = "events", description = "Celebration event management and CSV transfer"),
        (name = "notifications", description = "Notification trigger endpoints")
    ),
    info(
        title = "Comemora API",
        version = "0.1.0",
        description = "API for recurring celebration events and their notifications",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
