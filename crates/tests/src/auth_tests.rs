use crate::fixtures::{seed::PASSWORD, test_app::TestApp};
use serde_json::Value;

#[tokio::test]
async fn login_by_email_returns_tokens_and_sets_cookie() {
    let app = TestApp::spawn().await;
    app.insert_user("alice", "Alice", &["customer"]);

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "alice@shop.test",
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));

    let json: Value = resp.json().await.unwrap();
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["user"]["primary_role"], "customer");
}

#[tokio::test]
async fn login_by_username_works() {
    let app = TestApp::spawn().await;
    app.insert_user("bob", "Bob", &["author"]);

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "username": "bob",
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn login_failures_are_generic() {
    let app = TestApp::spawn().await;
    app.insert_user("carol", "Carol", &["customer"]);

    for body in [
        serde_json::json!({ "email": "carol@shop.test", "password": "wrong" }),
        serde_json::json!({ "email": "nobody@shop.test", "password": PASSWORD }),
    ] {
        let resp = app
            .client
            .post(app.url("/api/auth/login"))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 401);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Unauthorized");
    }
}

#[tokio::test]
async fn login_rejects_malformed_email() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "not-an-email", "password": PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn me_reports_roles_and_capabilities() {
    let app = TestApp::spawn().await;
    let admin = app.seed_user("dana", &["customer", "administrator"]).await;

    let resp = app.auth_get("/api/auth/me", &admin.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["user"]["id"], admin.id.to_hex());
    assert_eq!(json["user"]["primary_role"], "administrator");
    assert_eq!(json["capabilities"]["can_delete_products"], true);
    let permissions: Vec<&str> = json["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p.as_str())
        .collect();
    assert!(permissions.contains(&"manage_options"));
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/api/auth/me")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app.auth_get("/api/auth/me", "garbage").send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_issues_new_tokens() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("erin", &["subscriber"]).await;

    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": user.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert!(json["access_token"].is_string());

    // An access token is not a refresh token.
    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": user.access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = TestApp::spawn().await;

    let resp = app.client.post(app.url("/api/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}
