use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{ContentObject, User};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_unique(bson::doc! { "username": 1 }),
        ],
    )
    .await?;

    // Content objects. Messages are looked up by either participant and by
    // unread state, always ordered by creation time.
    create_indexes(
        db,
        ContentObject::COLLECTION,
        vec![
            index(bson::doc! { "object_type": 1, "created_at": -1 }),
            index(bson::doc! { "object_type": 1, "metadata.sender_id": 1, "created_at": -1 }),
            index(bson::doc! { "object_type": 1, "metadata.receiver_id": 1, "created_at": -1 }),
            index(bson::doc! {
                "object_type": 1,
                "metadata.receiver_id": 1,
                "metadata.is_read": 1,
            }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
