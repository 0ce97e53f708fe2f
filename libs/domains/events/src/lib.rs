//! Events Domain
//!
//! CRUD over event records with:
//! - MongoDB for event persistence
//! - Filesystem-backed storage for uploaded event images
//!
//! Events are looked up either by identifier or as a page of the most
//! recent records ordered by their `schedule` key. Create and update
//! accept multipart forms so an image file can ride along with the text
//! attributes.

use utoipa::OpenApi;

mod error;
mod handlers;
mod models;
mod mongodb;
mod repository;
mod service;
mod storage;

pub use error::{EventError, Result};
pub use handlers::{CreateEventResponse, ListQuery, MessageResponse, events_router};
pub use models::{EVENT_KIND, EventInput, EventRecord, EventResponse, PageRequest, parse_event_id};
pub use mongodb::MongoEventRepository;
pub use repository::EventRepository;
pub use service::EventService;
pub use storage::{FsImageStore, ImageStore, UploadedImage};

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::lookup_events,
        handlers::create_event,
        handlers::update_event,
        handlers::delete_event,
    ),
    components(schemas(
        EventInput,
        EventResponse,
        CreateEventResponse,
        MessageResponse,
    )),
    tags(
        (name = "events", description = "Event records with MongoDB storage and image uploads")
    )
)]
pub struct ApiDoc;
