//! Handler tests for the events domain
//!
//! These tests drive the full router over in-memory backends:
//! - multipart form parsing (text fields + optional image part)
//! - lookup modes (by id, latest page)
//! - HTTP status codes and error bodies
//!
//! Unlike the ignored MongoDB tests, nothing here needs a running server.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_events::*;
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // For oneshot()

const BOUNDARY: &str = "test-boundary";

/// In-memory repository backing the router under test
#[derive(Default, Clone)]
struct InMemoryRepository {
    records: Arc<Mutex<Vec<EventRecord>>>,
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn insert(&self, mut record: EventRecord) -> Result<ObjectId> {
        let id = ObjectId::new();
        record.id = Some(id);
        self.records.lock().unwrap().push(record);
        Ok(id)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<EventRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == Some(*id)).cloned())
    }

    async fn find_latest(&self, page: &PageRequest) -> Result<Vec<EventRecord>> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.schedule.cmp(&a.schedule));
        Ok(records
            .into_iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn update(
        &self,
        id: &ObjectId,
        input: EventInput,
        image: Option<String>,
    ) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == Some(*id)) {
            Some(record) => {
                record.name = input.name;
                record.tagline = input.tagline;
                record.description = input.description;
                record.moderator = input.moderator;
                record.category = input.category;
                record.sub_category = input.sub_category;
                record.schedule = input.schedule;
                record.rigor_rank = input.rigor_rank;
                if image.is_some() {
                    record.image = image;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != Some(*id));
        Ok(records.len() < before)
    }
}

/// Image store that never touches the filesystem
#[derive(Default, Clone)]
struct FakeImageStore;

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn store(&self, upload: &UploadedImage) -> Result<String> {
        Ok(format!("uploads/{}", upload.filename))
    }
}

fn test_app() -> (Router, InMemoryRepository) {
    let repo = InMemoryRepository::default();
    let service = EventService::new(repo.clone(), FakeImageStore);
    let app = events_router().with_state(Arc::new(service));
    (app, repo)
}

/// Build one multipart text part
fn text_part(name: &str, value: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
    )
}

/// Build one multipart file part
fn file_part(name: &str, filename: &str, bytes: &str) -> String {
    format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n{bytes}\r\n"
    )
}

fn close_form(mut body: String) -> String {
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

/// Full text form for an event named `name` scheduled at `schedule`
fn event_form(name: &str, schedule: &str) -> String {
    [
        text_part("name", name),
        text_part("tagline", "tagline"),
        text_part("description", "description"),
        text_part("moderator", "moderator"),
        text_part("category", "category"),
        text_part("sub_category", "sub"),
        text_part("schedule", schedule),
        text_part("rigor_rank", "5"),
    ]
    .concat()
}

fn multipart_request(method: &str, uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(close_form(body)))
        .unwrap()
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST a form and return the new event's hex id
async fn create_event(app: &Router, body: String) -> String {
    let response = app
        .clone()
        .oneshot(multipart_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response.into_body()).await;
    json["eventId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (app, _repo) = test_app();
    let id = create_event(&app, event_form("Launch", "2024-05-01")).await;

    let request = Request::builder()
        .uri(format!("/?id={id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response.into_body()).await;
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["type"], "event");
    assert_eq!(json["name"], "Launch");
    assert_eq!(json["rigor_rank"], 5);
    assert_eq!(json["attendees"], serde_json::json!([]));
}

#[tokio::test]
async fn test_create_with_image_stores_path() {
    let (app, _repo) = test_app();
    let body = event_form("Launch", "2024-05-01")
        + &file_part("files[image]", "banner.png", "png-bytes");
    let id = create_event(&app, body).await;

    let request = Request::builder()
        .uri(format!("/?id={id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let json = json_body(response.into_body()).await;
    assert_eq!(json["image"], "uploads/banner.png");
}

#[tokio::test]
async fn test_create_missing_rigor_rank_returns_400() {
    let (app, repo) = test_app();
    let body = text_part("name", "Launch");

    let response = app
        .oneshot(multipart_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(repo.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_non_numeric_rigor_rank_returns_400() {
    let (app, _repo) = test_app();
    let body = text_part("name", "Launch") + &text_part("rigor_rank", "high");

    let response = app
        .oneshot(multipart_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("rigor_rank"));
}

#[tokio::test]
async fn test_get_unknown_id_returns_404() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .uri(format!("/?id={}", ObjectId::new().to_hex()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_malformed_id_returns_400() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .uri("/?id=not-a-hex-id")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_without_id_or_type_returns_400() {
    let (app, _repo) = test_app();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response.into_body()).await;
    assert_eq!(json["message"], "Invalid request parameters");
}

#[tokio::test]
async fn test_latest_pages_by_schedule_descending() {
    let (app, _repo) = test_app();
    create_event(&app, event_form("a", "2024-01-01")).await;
    create_event(&app, event_form("b", "2024-03-01")).await;
    create_event(&app, event_form("c", "2024-02-01")).await;

    let request = Request::builder()
        .uri("/?type=latest&limit=2&page=1")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response.into_body()).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["b", "c"]);

    let request = Request::builder()
        .uri("/?type=latest&limit=2&page=2")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let json = json_body(response.into_body()).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a"]);
}

#[tokio::test]
async fn test_latest_rejects_zero_limit() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .uri("/?type=latest&limit=0")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_latest_rejects_non_numeric_limit_with_json_body() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .uri("/?type=latest&limit=ten")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response.into_body()).await;
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_latest_rejects_page_that_overflows_skip() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .uri(format!("/?type=latest&limit=2&page={}", u64::MAX))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response.into_body()).await;
    assert!(json["message"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn test_update_replaces_fields_and_reports_success() {
    let (app, _repo) = test_app();
    let id = create_event(&app, event_form("Launch", "2024-05-01")).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            &format!("/{id}"),
            event_form("Renamed", "2024-06-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response.into_body()).await;
    assert_eq!(json["message"], "Event updated successfully");

    let request = Request::builder()
        .uri(format!("/?id={id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let json = json_body(response.into_body()).await;
    assert_eq!(json["name"], "Renamed");
    assert_eq!(json["schedule"], "2024-06-01");
}

#[tokio::test]
async fn test_update_without_file_keeps_existing_image() {
    let (app, _repo) = test_app();
    let body = event_form("Launch", "2024-05-01")
        + &file_part("files[image]", "banner.png", "png-bytes");
    let id = create_event(&app, body).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "PUT",
            &format!("/{id}"),
            event_form("Renamed", "2024-05-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri(format!("/?id={id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let json = json_body(response.into_body()).await;
    assert_eq!(json["image"], "uploads/banner.png");
}

#[tokio::test]
async fn test_update_with_file_replaces_image() {
    let (app, _repo) = test_app();
    let body = event_form("Launch", "2024-05-01")
        + &file_part("files[image]", "banner.png", "png-bytes");
    let id = create_event(&app, body).await;

    let body = event_form("Launch", "2024-05-01")
        + &file_part("files[image]", "poster.png", "other-bytes");
    let response = app
        .clone()
        .oneshot(multipart_request("PUT", &format!("/{id}"), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri(format!("/?id={id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let json = json_body(response.into_body()).await;
    assert_eq!(json["image"], "uploads/poster.png");
}

#[tokio::test]
async fn test_update_unknown_id_returns_404_without_insert() {
    let (app, repo) = test_app();

    let response = app
        .oneshot(multipart_request(
            "PUT",
            &format!("/{}", ObjectId::new().to_hex()),
            event_form("Ghost", "2024-05-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(repo.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_malformed_id_returns_400() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(multipart_request(
            "PUT",
            "/not-a-hex-id",
            event_form("Ghost", "2024-05-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_returns_404() {
    let (app, _repo) = test_app();
    let id = create_event(&app, event_form("Launch", "2024-05-01")).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response.into_body()).await;
    assert_eq!(json["message"], "Event deleted successfully");

    let request = Request::builder()
        .uri(format!("/?id={id}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_id_returns_404() {
    let (app, _repo) = test_app();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", ObjectId::new().to_hex()))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
