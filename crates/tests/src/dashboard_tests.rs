use crate::fixtures::{seed::PASSWORD, test_app::TestApp};
use serde_json::Value;

fn menu_keys(view: &Value) -> Vec<String> {
    view["menu"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["key"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn anonymous_visit_redirects_to_login_once() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/user-dashboard/inbox/")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 302);
    let location = resp.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(
        location,
        "/login?redirect_to=http%3A%2F%2Fshop.test%2Fuser-dashboard%2F"
    );
}

#[tokio::test]
async fn redirect_loop_guard_answers_without_redirecting() {
    let app = TestApp::spawn().await;
    let dashboard_url = app.settings.dashboard_url();
    assert_eq!(dashboard_url, "http://shop.test/user-dashboard/");

    let resp = app
        .client
        .get(app.url("/user-dashboard/"))
        .query(&[("redirect_to", dashboard_url.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    assert!(resp.headers().get("location").is_none());
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["login_url"], "/login");
}

#[tokio::test]
async fn gate_ignores_other_paths() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Protected API routes answer 401 themselves; the gate does not redirect.
    let resp = app.client.get(app.url("/api/inbox")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
    assert!(resp.headers().get("location").is_none());
}

#[tokio::test]
async fn cors_honours_configured_origins() {
    let open = TestApp::spawn().await;
    let resp = open
        .client
        .get(open.url("/health"))
        .header("Origin", "http://anywhere.test")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let app = TestApp::spawn_with_settings(|s| {
        s.app.cors_origins = vec!["http://seller.test".to_string()];
    })
    .await;

    let resp = app
        .client
        .get(app.url("/health"))
        .header("Origin", "http://seller.test")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "http://seller.test");
    assert_eq!(resp.headers()["access-control-allow-credentials"], "true");

    let resp = app
        .client
        .get(app.url("/health"))
        .header("Origin", "http://elsewhere.test")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn seller_sees_seller_menu_and_overview_by_default() {
    let app = TestApp::spawn().await;
    let author = app.seed_user("sam", &["author"]).await;

    let resp = app.auth_get("/user-dashboard", &author.access_token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let view: Value = resp.json().await.unwrap();

    assert_eq!(view["success"], true);
    assert_eq!(view["current_tab"]["key"], "overview");
    assert_eq!(view["current_tab"]["template_ref"], "overview.php");
    assert_eq!(
        menu_keys(&view),
        vec!["overview", "products", "add-product", "inbox", "account", "logout"]
    );
    assert_eq!(view["capabilities"]["can_add_products"], true);
    assert_eq!(view["capabilities"]["can_delete_products"], false);
    assert_eq!(view["user"]["primary_role"], "author");
    assert_eq!(view["poll_interval_secs"], 30);

    let inbox = &view["menu"][3];
    assert_eq!(inbox["has_unread_counter"], true);
    assert_eq!(inbox["url"], "http://shop.test/user-dashboard/inbox/");
    assert_eq!(view["menu"][0]["active"], true);
}

#[tokio::test]
async fn administrator_role_wins_over_customer() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("ada", &["customer", "administrator"]).await;

    let resp = app
        .auth_get("/user-dashboard/products/", &user.access_token)
        .send()
        .await
        .unwrap();
    let view: Value = resp.json().await.unwrap();

    assert_eq!(view["user"]["primary_role"], "administrator");
    assert_eq!(view["current_tab"]["key"], "products");
    assert_eq!(view["capabilities"]["can_edit_all_products"], true);
}

#[tokio::test]
async fn hidden_tab_falls_back_to_overview() {
    let app = TestApp::spawn().await;
    let buyer = app.seed_user("bea", &["customer"]).await;

    let resp = app
        .auth_get("/user-dashboard/add-product", &buyer.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let view: Value = resp.json().await.unwrap();

    assert_eq!(view["current_tab"]["key"], "overview");
    assert_eq!(view["current_tab"]["fell_back"], true);
    assert_eq!(
        menu_keys(&view),
        vec!["cart", "favourites", "inbox", "account", "logout"]
    );
}

#[tokio::test]
async fn user_without_roles_gets_subscriber_set_and_no_menu() {
    let app = TestApp::spawn().await;
    let nobody = app.seed_user("nora", &[]).await;

    let resp = app.auth_get("/user-dashboard/", &nobody.access_token).send().await.unwrap();
    let view: Value = resp.json().await.unwrap();

    assert_eq!(view["user"]["primary_role"], "subscriber");
    assert_eq!(view["capabilities"]["can_manage_products"], false);
    assert!(menu_keys(&view).is_empty());
}

#[tokio::test]
async fn logout_tab_clears_session_and_redirects_home() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("lou", &["subscriber"]).await;

    let resp = app
        .auth_get("/user-dashboard/logout/", &user.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 302);
    assert_eq!(resp.headers().get("location").unwrap(), "/");
    let cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn session_cookie_opens_the_dashboard() {
    let app = TestApp::spawn().await;
    app.insert_user("cora", "Cora", &["editor"]);

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "username": "cora", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.client.get(app.url("/user-dashboard/")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["user"]["display_name"], "Cora");
}

#[tokio::test]
async fn session_bootstrap_returns_nonce_and_urls() {
    let app = TestApp::spawn().await;
    let user = app.seed_user("sid", &["customer"]).await;

    let resp = app
        .auth_get("/api/dashboard/session", &user.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();

    assert!(!json["nonce"].as_str().unwrap().is_empty());
    assert_eq!(json["dashboard_url"], "http://shop.test/user-dashboard/");
    assert_eq!(json["messaging_enabled"], true);

    let resp = app.client.get(app.url("/api/dashboard/session")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}
