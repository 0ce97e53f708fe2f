//! HTTP handlers for the events API

use crate::error::{EventError, Result};
use crate::models::{EventInput, EventResponse, PageRequest, parse_event_id};
use crate::repository::EventRepository;
use crate::service::EventService;
use crate::storage::{ImageStore, UploadedImage};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

/// Events router state
pub type EventsState<R, S> = Arc<EventService<R, S>>;

/// Create the events router
pub fn events_router<R, S>() -> Router<EventsState<R, S>>
where
    R: EventRepository + 'static,
    S: ImageStore + 'static,
{
    Router::new()
        .route("/", get(lookup_events::<R, S>).post(create_event::<R, S>))
        .route(
            "/{id}",
            axum::routing::put(update_event::<R, S>).delete(delete_event::<R, S>),
        )
}

/// Query parameters accepted by the lookup endpoint.
///
/// Exactly one mode applies per request: `id` wins when present, otherwise
/// `type=latest` selects the paged scan.
#[derive(Debug, Default, serde::Deserialize, IntoParams)]
pub struct ListQuery {
    /// Event identifier, 24-char hex
    pub id: Option<String>,

    /// Lookup mode; only `latest` is recognized
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Page size, defaults to 10
    pub limit: Option<i64>,

    /// 1-based page number, defaults to 1
    pub page: Option<u64>,
}

/// Look up a single event by id, or page over the latest events
#[utoipa::path(
    get,
    path = "/",
    params(ListQuery),
    responses(
        (status = 200, description = "Event or page of events", body = EventResponse),
        (status = 400, description = "Invalid request parameters"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn lookup_events<R: EventRepository, S: ImageStore>(
    State(state): State<EventsState<R, S>>,
    uri: Uri,
) -> Result<Response> {
    // Malformed query values map to the standard `{"message"}` body,
    // not axum's plain-text rejection
    let Query(query) = Query::<ListQuery>::try_from_uri(&uri)?;

    if let Some(id) = &query.id {
        let id = parse_event_id(id)?;
        let record = state.get_by_id(&id).await?;
        return Ok(Json(EventResponse::from(record)).into_response());
    }

    match query.kind.as_deref() {
        Some("latest") => {
            let page = PageRequest::new(query.limit, query.page)?;
            let records = state.latest(&page).await?;
            let events: Vec<EventResponse> = records.into_iter().map(Into::into).collect();
            Ok(Json(events).into_response())
        }
        _ => Err(EventError::Validation {
            message: "Invalid request parameters".to_string(),
        }),
    }
}

/// Create a new event from a multipart form
#[utoipa::path(
    post,
    path = "/",
    request_body(content = EventInput, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Event created", body = CreateEventResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state, multipart))]
pub async fn create_event<R: EventRepository, S: ImageStore>(
    State(state): State<EventsState<R, S>>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (input, upload) = read_event_form(multipart).await?;
    let id = state.create(input, upload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event_id: id.to_hex(),
        }),
    ))
}

/// Replace an event's attributes
#[utoipa::path(
    put,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event identifier, 24-char hex")
    ),
    request_body(content = EventInput, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Event updated", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state, multipart))]
pub async fn update_event<R: EventRepository, S: ImageStore>(
    State(state): State<EventsState<R, S>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>> {
    let id = parse_event_id(&id)?;
    let (input, upload) = read_event_form(multipart).await?;
    state.update(&id, input, upload).await?;
    Ok(Json(MessageResponse {
        message: "Event updated successfully".to_string(),
    }))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event identifier, 24-char hex")
    ),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal error")
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn delete_event<R: EventRepository, S: ImageStore>(
    State(state): State<EventsState<R, S>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_event_id(&id)?;
    state.delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Event deleted successfully".to_string(),
    }))
}

/// Parse a multipart form into a typed event payload.
///
/// A part carrying a filename is treated as the image upload regardless of
/// its field name; the first such part wins. Text parts map to fields by
/// name, absent text fields default to empty, and `rigor_rank` must be
/// present and parse as an integer.
async fn read_event_form(
    mut multipart: Multipart,
) -> Result<(EventInput, Option<UploadedImage>)> {
    let mut input = EventInput::default();
    let mut upload: Option<UploadedImage> = None;
    let mut rigor_rank: Option<i64> = None;

    while let Some(field) = multipart.next_field().await? {
        if let Some(filename) = field.file_name() {
            let filename = filename.to_string();
            let bytes = field.bytes().await?;
            if upload.is_none() {
                upload = Some(UploadedImage {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await?;
        match name.as_str() {
            "name" => input.name = value,
            "tagline" => input.tagline = value,
            "description" => input.description = value,
            "moderator" => input.moderator = value,
            "category" => input.category = value,
            "sub_category" => input.sub_category = value,
            "schedule" => input.schedule = value,
            "rigor_rank" => {
                let parsed = value.parse().map_err(|_| EventError::Validation {
                    message: format!("rigor_rank must be an integer, got '{}'", value),
                })?;
                rigor_rank = Some(parsed);
            }
            _ => {}
        }
    }

    input.rigor_rank = rigor_rank.ok_or_else(|| EventError::Validation {
        message: "rigor_rank is required".to_string(),
    })?;

    Ok((input, upload))
}

/// Body returned by the create endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    pub event_id: String,
}

/// Body returned by the update and delete endpoints
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
