use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use mongodb::Database;
use sellerdesk_db::models::{ContentObject, ObjectStatus};

use super::base::BaseDao;
use crate::store::{MetaFilter, NewObject, ObjectQuery, ObjectStore, SortOrder, StoreResult};

/// MongoDB-backed [`ObjectStore`] over the `objects` collection.
pub struct ObjectDao {
    pub base: BaseDao<ContentObject>,
}

impl ObjectDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, ContentObject::COLLECTION),
        }
    }
}

fn meta_path(key: &str) -> String {
    format!("metadata.{key}")
}

fn filter_document(filter: &MetaFilter) -> Document {
    match filter {
        MetaFilter::Eq(key, value) => {
            let mut d = Document::new();
            d.insert(meta_path(key), value.as_str());
            d
        }
        MetaFilter::All(filters) if filters.is_empty() => Document::new(),
        MetaFilter::All(filters) => doc! {
            "$and": filters.iter().map(|f| Bson::Document(filter_document(f))).collect::<Vec<_>>(),
        },
        // An empty disjunction matches nothing.
        MetaFilter::Any(filters) if filters.is_empty() => doc! { "_id": { "$in": [] } },
        MetaFilter::Any(filters) => doc! {
            "$or": filters.iter().map(|f| Bson::Document(filter_document(f))).collect::<Vec<_>>(),
        },
    }
}

fn query_document(query: &ObjectQuery) -> Document {
    let type_filter = doc! { "object_type": &query.object_type };
    match &query.filter {
        Some(filter) => doc! {
            "$and": vec![Bson::Document(type_filter), Bson::Document(filter_document(filter))],
        },
        None => type_filter,
    }
}

#[async_trait]
impl ObjectStore for ObjectDao {
    async fn create_object(&self, object: NewObject) -> StoreResult<ObjectId> {
        let now = DateTime::now();
        let record = ContentObject {
            id: None,
            object_type: object.object_type,
            author_id: object.author_id,
            title: object.title,
            content: object.content,
            status: ObjectStatus::Publish,
            metadata: object.metadata,
            created_at: now,
            updated_at: now,
        };
        self.base.insert_one(&record).await
    }

    async fn get_object(&self, id: ObjectId) -> StoreResult<Option<ContentObject>> {
        self.base.find_by_id(id).await
    }

    async fn query_objects(&self, query: &ObjectQuery) -> StoreResult<Vec<ContentObject>> {
        // ObjectIds grow with insertion, so they break same-instant ties.
        let direction = match query.order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        self.base
            .find_many(
                query_document(query),
                Some(doc! { "created_at": direction, "_id": direction }),
            )
            .await
    }

    async fn update_metadata(&self, id: ObjectId, key: &str, value: &str) -> StoreResult<bool> {
        let mut set = Document::new();
        set.insert(meta_path(key), value);
        self.base
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await
    }

    async fn update_metadata_if(
        &self,
        id: ObjectId,
        key: &str,
        expected: &str,
        value: &str,
    ) -> StoreResult<bool> {
        let mut filter = doc! { "_id": id };
        filter.insert(meta_path(key), expected);
        let mut set = Document::new();
        set.insert(meta_path(key), value);
        self.base.update_one(filter, doc! { "$set": set }).await
    }
}
