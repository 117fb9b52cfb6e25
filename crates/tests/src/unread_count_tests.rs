use crate::fixtures::test_app::TestApp;
use serde_json::Value;

async fn count(app: &TestApp, token: Option<&str>) -> Value {
    let request = match token {
        Some(token) => app.auth_get("/api/inbox/unread-count", token),
        None => app.client.get(app.url("/api/inbox/unread-count")),
    };
    let resp = request.send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn anonymous_callers_see_zero() {
    let app = TestApp::spawn().await;

    let json = count(&app, None).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn counts_distinct_senders() {
    let app = TestApp::spawn().await;
    let me = app.seed_user("meg", &["author"]).await;
    let a = app.seed_user("amos", &["customer"]).await;
    let b = app.seed_user("bess", &["customer"]).await;

    for text in ["one", "two", "three"] {
        app.send(&a, &me, text, None).await;
    }
    app.send(&b, &me, "hello", None).await;
    app.send(&me, &a, "reply", None).await;

    assert_eq!(count(&app, Some(&me.access_token)).await["count"], 2);
    assert_eq!(count(&app, Some(&a.access_token)).await["count"], 1);

    let resp = app
        .nonce_post(
            "/api/inbox/thread",
            &me,
            serde_json::json!({ "counterpart_id": a.id.to_hex() }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(count(&app, Some(&me.access_token)).await["count"], 1);
}

#[tokio::test]
async fn dashboard_view_carries_the_count() {
    let app = TestApp::spawn().await;
    let me = app.seed_user("max", &["customer"]).await;
    let a = app.seed_user("abi", &["author"]).await;
    app.send(&a, &me, "new stock", None).await;

    let resp = app.auth_get("/user-dashboard/inbox", &me.access_token).send().await.unwrap();
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["current_tab"]["key"], "inbox");
    assert_eq!(view["unread_count"], 1);
}

#[tokio::test]
async fn disabled_messaging_counts_zero_and_refuses_writes() {
    let app = TestApp::spawn_with_settings(|s| s.messaging.enabled = false).await;
    let me = app.seed_user("mo", &["customer"]).await;
    let a = app.seed_user("ace", &["author"]).await;

    assert_eq!(count(&app, Some(&me.access_token)).await["count"], 0);

    let resp = app
        .nonce_post(
            "/api/inbox/reply",
            &a,
            serde_json::json!({ "receiver_id": me.id.to_hex(), "message": "hi" }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 403);

    let resp = app.auth_get("/api/inbox", &me.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["threads"].as_array().unwrap().len(), 0);
}
