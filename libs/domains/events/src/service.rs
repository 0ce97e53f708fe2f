//! Event service layer

use crate::error::{EventError, Result};
use crate::models::{EventInput, EventRecord, PageRequest};
use crate::repository::EventRepository;
use crate::storage::{ImageStore, UploadedImage};
use mongodb::bson::oid::ObjectId;
use tracing::{info, instrument};

/// Event service that coordinates the repository and the image store
pub struct EventService<R: EventRepository, S: ImageStore> {
    repository: R,
    images: S,
}

impl<R: EventRepository, S: ImageStore> EventService<R, S> {
    /// Create a new event service
    pub fn new(repository: R, images: S) -> Self {
        Self { repository, images }
    }

    /// Persist an uploaded image, if any, and return its path reference.
    async fn store_image(&self, upload: Option<UploadedImage>) -> Result<Option<String>> {
        match upload {
            Some(upload) => Ok(Some(self.images.store(&upload).await?)),
            None => Ok(None),
        }
    }

    /// Create and store a new event
    #[instrument(skip(self, input, upload), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: EventInput,
        upload: Option<UploadedImage>,
    ) -> Result<ObjectId> {
        let image = self.store_image(upload).await?;
        let id = self.repository.insert(input.into_record(image)).await?;
        info!(event_id = %id.to_hex(), "Event created");
        Ok(id)
    }

    /// Get event by ID
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &ObjectId) -> Result<EventRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| EventError::NotFound { id: id.to_hex() })
    }

    /// Page over events by recency of schedule
    #[instrument(skip(self))]
    pub async fn latest(&self, page: &PageRequest) -> Result<Vec<EventRecord>> {
        self.repository.find_latest(page).await
    }

    /// Replace an event's attributes. The stored image is kept unless the
    /// request carried a new file.
    #[instrument(skip(self, input, upload))]
    pub async fn update(
        &self,
        id: &ObjectId,
        input: EventInput,
        upload: Option<UploadedImage>,
    ) -> Result<()> {
        let image = self.store_image(upload).await?;
        let matched = self.repository.update(id, input, image).await?;
        if !matched {
            return Err(EventError::NotFound { id: id.to_hex() });
        }
        info!(event_id = %id.to_hex(), "Event updated");
        Ok(())
    }

    /// Delete event by ID
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ObjectId) -> Result<()> {
        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(EventError::NotFound { id: id.to_hex() });
        }
        info!(event_id = %id.to_hex(), "Event deleted");
        Ok(())
    }
}
