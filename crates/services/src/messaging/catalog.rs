use std::sync::Arc;

use bson::oid::ObjectId;
use serde::Serialize;

use crate::store::{ObjectStore, StoreResult};

pub const PRODUCT_TYPE: &str = "product";

/// What a thread shows about the product it is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSnapshot {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub price: Option<String>,
    pub url: Option<String>,
}

/// Read-only product lookups for message threads.
#[derive(Clone)]
pub struct ProductCatalog {
    objects: Arc<dyn ObjectStore>,
}

impl ProductCatalog {
    pub fn new(objects: Arc<dyn ObjectStore>) -> Self {
        Self { objects }
    }

    /// `None` when the id does not name an existing product.
    pub async fn snapshot(&self, id: ObjectId) -> StoreResult<Option<ProductSnapshot>> {
        let snapshot = self
            .objects
            .get_object(id)
            .await?
            .filter(|object| object.object_type == PRODUCT_TYPE)
            .map(|product| {
                let field = |key: &str| product.meta(key).filter(|v| !v.is_empty()).map(str::to_string);
                ProductSnapshot {
                    id: id.to_hex(),
                    title: product.title.clone(),
                    image: field("image"),
                    price: field("price"),
                    url: field("url"),
                }
            });
        Ok(snapshot)
    }
}
