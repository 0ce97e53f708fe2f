//! Event domain models

use crate::error::{EventError, Result};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tag value stored in every document created through this API
pub const EVENT_KIND: &str = "event";

/// Parse an event identifier from its 24-char hex form.
///
/// Malformed input is a [`EventError::InvalidId`], surfaced to clients as a
/// 400 rather than a generic failure.
pub fn parse_event_id(value: &str) -> Result<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| EventError::InvalidId {
        value: value.to_string(),
    })
}

/// The Event document as persisted in the `events` collection.
///
/// `id` is absent until the persistence layer assigns one at insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Always [`EVENT_KIND`] for records created through this API
    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,
    pub tagline: String,
    pub description: String,
    pub moderator: String,
    pub category: String,
    pub sub_category: String,

    /// Opaque sort key; ordered on, never parsed
    pub schedule: String,

    pub rigor_rank: i64,

    /// Path reference returned by the image store, absent when no file was uploaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Attendee references; initialized empty, never mutated through this API
    #[serde(default)]
    pub attendees: Vec<ObjectId>,
}

/// JSON shape returned to clients: identifiers rendered as hex strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub name: String,
    pub tagline: String,
    pub description: String,
    pub moderator: String,
    pub category: String,
    pub sub_category: String,
    pub schedule: String,
    pub rigor_rank: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub attendees: Vec<String>,
}

impl From<EventRecord> for EventResponse {
    fn from(record: EventRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            kind: record.kind,
            name: record.name,
            tagline: record.tagline,
            description: record.description,
            moderator: record.moderator,
            category: record.category,
            sub_category: record.sub_category,
            schedule: record.schedule,
            rigor_rank: record.rigor_rank,
            image: record.image,
            attendees: record.attendees.iter().map(|id| id.to_hex()).collect(),
        }
    }
}

/// Typed form payload shared by the create and update operations.
///
/// All text fields default to the empty string when absent from the form;
/// `rigor_rank` is required and must parse as an integer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EventInput {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub moderator: String,
    pub category: String,
    pub sub_category: String,
    pub schedule: String,
    pub rigor_rank: i64,
}

impl EventInput {
    /// Build a fresh document for insertion: tagged, with empty attendees.
    pub fn into_record(self, image: Option<String>) -> EventRecord {
        EventRecord {
            id: None,
            kind: EVENT_KIND.to_string(),
            name: self.name,
            tagline: self.tagline,
            description: self.description,
            moderator: self.moderator,
            category: self.category,
            sub_category: self.sub_category,
            schedule: self.schedule,
            rigor_rank: self.rigor_rank,
            image,
            attendees: Vec::new(),
        }
    }
}

/// Validated pagination for the latest-page scan.
///
/// Policy: `limit` defaults to 10, `page` to 1 (1-based); values below 1 are
/// rejected. Skip is `(page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub skip: u64,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: i64 = 10;

    pub fn new(limit: Option<i64>, page: Option<u64>) -> Result<Self> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        let page = page.unwrap_or(1);

        if limit < 1 {
            return Err(EventError::Validation {
                message: format!("limit must be at least 1, got {}", limit),
            });
        }
        if page < 1 {
            return Err(EventError::Validation {
                message: format!("page must be at least 1, got {}", page),
            });
        }

        let skip = (page - 1)
            .checked_mul(limit as u64)
            .ok_or_else(|| EventError::Validation {
                message: format!("page {} is out of range", page),
            })?;

        Ok(Self { limit, skip })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            skip: 0,
        }
    }
}
