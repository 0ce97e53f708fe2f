//! MongoDB implementation of EventRepository

use crate::error::{EventError, Result};
use crate::models::{EventInput, EventRecord, PageRequest};
use crate::repository::EventRepository;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Database};
use tracing::instrument;

/// MongoDB-based event repository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventRecord>,
}

impl MongoEventRepository {
    /// Create a new MongoDB event repository
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("events"),
        }
    }

    /// Create indexes for efficient querying
    pub async fn create_indexes(&self) -> Result<()> {
        use mongodb::IndexModel;

        // The latest-page scan sorts on schedule descending
        let indexes = vec![
            IndexModel::builder().keys(doc! { "schedule": -1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    /// Build the `$set` document for an update: text fields always, image
    /// only when a new one was stored.
    fn build_update(input: EventInput, image: Option<String>) -> Document {
        let mut set = doc! {
            "name": input.name,
            "tagline": input.tagline,
            "description": input.description,
            "moderator": input.moderator,
            "category": input.category,
            "sub_category": input.sub_category,
            "schedule": input.schedule,
            "rigor_rank": input.rigor_rank,
        };
        if let Some(image) = image {
            set.insert("image", image);
        }
        set
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, record), fields(name = %record.name))]
    async fn insert(&self, record: EventRecord) -> Result<ObjectId> {
        let result = self.collection.insert_one(&record).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| EventError::Database {
                message: "insert did not yield an ObjectId".to_string(),
                source: None,
            })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<EventRecord>> {
        let record = self.collection.find_one(doc! { "_id": *id }).await?;
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_latest(&self, page: &PageRequest) -> Result<Vec<EventRecord>> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "schedule": -1 })
            .skip(page.skip)
            .limit(page.limit)
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let records: Vec<EventRecord> = cursor.try_collect().await?;
        Ok(records)
    }

    #[instrument(skip(self, input))]
    async fn update(
        &self,
        id: &ObjectId,
        input: EventInput,
        image: Option<String>,
    ) -> Result<bool> {
        let set = Self::build_update(input, image);
        let result = self
            .collection
            .update_one(doc! { "_id": *id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
