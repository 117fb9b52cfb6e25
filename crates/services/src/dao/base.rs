use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{StoreError, StoreResult};

pub struct BaseDao<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + for<'de> Deserialize<'de> + Unpin + Send + Sync,
{
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<T>(collection_name),
        }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_many(&self, filter: Document, sort: Option<Document>) -> StoreResult<Vec<T>> {
        let mut cursor = if let Some(sort) = sort {
            self.collection.find(filter).sort(sort).await?
        } else {
            self.collection.find(filter).await?
        };

        let mut results = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            results.push(doc);
        }
        Ok(results)
    }

    pub async fn insert_one(&self, doc: &T) -> StoreResult<ObjectId> {
        let result = self.collection.insert_one(doc).await.map_err(|e| {
            if let mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(
                ref write_error,
            )) = *e.kind
            {
                if write_error.code == 11000 {
                    return StoreError::DuplicateKey(write_error.message.clone());
                }
            }
            StoreError::Mongo(e)
        })?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Unexpected("inserted_id is not an ObjectId".to_string()))?;
        debug!(?id, "Inserted document");
        Ok(id)
    }

    /// Applies `update` to the first match, stamping `updated_at`. Returns
    /// whether a document was modified.
    pub async fn update_one(&self, filter: Document, mut update: Document) -> StoreResult<bool> {
        match update.get_document_mut("$set") {
            Ok(set_doc) => {
                set_doc.insert("updated_at", bson::DateTime::now());
            }
            Err(_) => {
                update.insert("$set", doc! { "updated_at": bson::DateTime::now() });
            }
        }

        let result = self.collection.update_one(filter, update).await?;
        Ok(result.modified_count > 0)
    }
}
