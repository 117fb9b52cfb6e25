use std::collections::BTreeMap;

use bson::{DateTime, oid::ObjectId};
use sellerdesk_db::models::{ContentObject, ObjectStatus, User};
use sellerdesk_services::auth::password;
use serde_json::Value;

use super::test_app::TestApp;

pub const PASSWORD: &str = "Password123!";

pub struct SeededUser {
    pub id: ObjectId,
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Put a user straight into the identity store.
    pub fn insert_user(&self, username: &str, display_name: &str, roles: &[&str]) -> ObjectId {
        let now = DateTime::now();
        self.store.insert_user(User {
            id: None,
            email: format!("{username}@shop.test"),
            username: username.to_string(),
            display_name: display_name.to_string(),
            avatar: None,
            password_hash: Some(password::hash_password(PASSWORD).expect("Failed to hash password")),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            capabilities: vec![],
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Insert a user and log them in with a separate client, so
    /// `self.client` stays anonymous.
    pub async fn seed_user(&self, username: &str, roles: &[&str]) -> SeededUser {
        let id = self.insert_user(username, &capitalize(username), roles);
        let email = format!("{username}@shop.test");

        let resp = reqwest::Client::new()
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(resp.status().as_u16(), 200, "Login failed for {username}");

        let json: Value = resp.json().await.expect("Failed to parse login response");

        SeededUser {
            id,
            email,
            username: username.to_string(),
            access_token: json["access_token"].as_str().unwrap().to_string(),
            refresh_token: json["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub fn seed_product(&self, title: &str, price: &str) -> ObjectId {
        let now = DateTime::now();
        self.store.insert_object(ContentObject {
            id: None,
            object_type: "product".to_string(),
            author_id: None,
            title: title.to_string(),
            content: String::new(),
            status: ObjectStatus::Publish,
            metadata: BTreeMap::from([
                ("price".to_string(), price.to_string()),
                ("url".to_string(), format!("http://shop.test/product/{}", title.to_lowercase())),
            ]),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch the anti-forgery nonce the dashboard hands to its client.
    pub async fn nonce_for(&self, user: &SeededUser) -> String {
        let resp = self
            .auth_get("/api/dashboard/session", &user.access_token)
            .send()
            .await
            .expect("Session request failed");
        assert_eq!(resp.status().as_u16(), 200);
        let json: Value = resp.json().await.unwrap();
        json["nonce"].as_str().unwrap().to_string()
    }

    /// POST with bearer auth and a fresh, valid nonce.
    pub async fn nonce_post(&self, path: &str, user: &SeededUser, body: Value) -> reqwest::Response {
        let nonce = self.nonce_for(user).await;
        self.auth_post(path, &user.access_token)
            .header("X-Dashboard-Nonce", nonce)
            .json(&body)
            .send()
            .await
            .expect("Request failed")
    }

    /// Send `text` from one seeded user to another through the API.
    pub async fn send(&self, from: &SeededUser, to: &SeededUser, text: &str, product: Option<ObjectId>) -> Value {
        let resp = self
            .nonce_post(
                "/api/inbox/reply",
                from,
                serde_json::json!({
                    "receiver_id": to.id.to_hex(),
                    "message": text,
                    "product_id": product.map(|p| p.to_hex()),
                }),
            )
            .await;
        assert_eq!(resp.status().as_u16(), 200, "Reply failed");
        resp.json().await.unwrap()
    }

    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
