//! Event repository trait

use crate::error::Result;
use crate::models::{EventInput, EventRecord, PageRequest};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Repository trait for event storage operations
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new record and return the assigned identifier
    async fn insert(&self, record: EventRecord) -> Result<ObjectId>;

    /// Fetch a record by identifier
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<EventRecord>>;

    /// Page over records ordered by `schedule` descending
    async fn find_latest(&self, page: &PageRequest) -> Result<Vec<EventRecord>>;

    /// Overwrite the mutable attributes of a record; `image` is set only when
    /// provided. Returns whether a record matched the identifier.
    async fn update(
        &self,
        id: &ObjectId,
        input: EventInput,
        image: Option<String>,
    ) -> Result<bool>;

    /// Remove a record. Returns whether a record matched the identifier.
    async fn delete(&self, id: &ObjectId) -> Result<bool>;
}
