use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::Database;
use sellerdesk_db::models::User;

use super::base::BaseDao;
use crate::store::{StoreResult, UserDirectory};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }
}

#[async_trait]
impl UserDirectory for UserDao {
    async fn get_user(&self, id: ObjectId) -> StoreResult<Option<User>> {
        self.base
            .find_one(doc! { "_id": id, "deleted_at": null })
            .await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.base
            .find_one(doc! { "email": email, "deleted_at": null })
            .await
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.base
            .find_one(doc! { "username": username, "deleted_at": null })
            .await
    }
}
