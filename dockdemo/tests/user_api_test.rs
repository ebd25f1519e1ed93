mod common;

use common::{app_with, seeded_app};
use dockdemo::store::UserStore;
use serde_json::json;

#[tokio::test]
async fn list_returns_seeded_users_in_id_order() {
    seeded_app()
        .get("/api/users")
        .send()
        .await
        .assert_ok()
        .assert_json_path("len()", 2)
        .assert_json_path("[0].id", 1)
        .assert_json_path("[0].name", "Alice")
        .assert_json_path("[0].age", 30)
        .assert_json_path("[1].email", "bob@example.com");
}

#[tokio::test]
async fn list_filters_by_search_term() {
    seeded_app()
        .get("/api/users?search=BOB")
        .send()
        .await
        .assert_ok()
        .assert_json_path("len()", 1)
        .assert_json_path("[0].name", "Bob");
}

#[tokio::test]
async fn get_existing_user() {
    let resp = seeded_app()
        .get("/api/users/1")
        .send()
        .await
        .assert_ok()
        .assert_json_path("id", 1)
        .assert_json_path("email", "alice@example.com");
    let created_at: String = resp.json_path("created_at");
    assert!(created_at.contains('T'), "not RFC 3339: {created_at}");
}

#[tokio::test]
async fn get_unknown_user_is_404() {
    seeded_app()
        .get("/api/users/999")
        .send()
        .await
        .assert_not_found()
        .assert_json_path("error", "User 999 not found");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let resp = seeded_app().get("/api/users/abc").send().await.assert_bad_request();
    let error: String = resp.json_path("error");
    assert!(error.starts_with("Invalid user id"), "{error}");
}

#[tokio::test]
async fn create_returns_201_with_message_and_location() {
    let store = UserStore::seeded();
    let app = app_with(store.clone());

    app.post("/api/users")
        .json(&json!({"name": "Carol", "email": "carol@example.com", "age": 41}))
        .send()
        .await
        .assert_created()
        .assert_header("location", "/api/users/3")
        .assert_json_path("message", "User Carol created!")
        .assert_json_path("user.id", 3)
        .assert_json_path("user.age", 41);

    assert_eq!(store.count().await, 3);
    app.get("/api/users/3").send().await.assert_ok().assert_json_path("name", "Carol");
}

#[tokio::test]
async fn create_without_age_serializes_null() {
    seeded_app()
        .post("/api/users")
        .json(&json!({"name": "Dan", "email": "dan@example.com"}))
        .send()
        .await
        .assert_created()
        .assert_json_path("user.age", serde_json::Value::Null);
}

#[tokio::test]
async fn create_with_missing_fields_is_400() {
    let app = seeded_app();
    app.post("/api/users")
        .json(&json!({"name": "NoEmail"}))
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Name and email are required");

    app.post("/api/users")
        .raw_json("{not json")
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Name and email are required");

    app.post("/api/users")
        .body("name=x")
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Name and email are required");
}

#[tokio::test]
async fn create_with_invalid_fields_reports_details() {
    let resp = seeded_app()
        .post("/api/users")
        .json(&json!({"name": "", "email": "not-an-email", "age": 200}))
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Validation failed")
        .assert_json_path("details.len()", 3);

    let fields: Vec<String> = resp
        .json::<serde_json::Value>()["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect();
    for expected in ["name", "email", "age"] {
        assert!(fields.iter().any(|f| f == expected), "missing {expected} in {fields:?}");
    }
}

#[tokio::test]
async fn create_with_duplicate_email_is_409_and_changes_nothing() {
    let store = UserStore::seeded();
    app_with(store.clone())
        .post("/api/users")
        .json(&json!({"name": "Alice Again", "email": "Alice@Example.com"}))
        .send()
        .await
        .assert_conflict()
        .assert_json_path("error", "Email Alice@Example.com is already registered");
    assert_eq!(store.count().await, 2);
}

#[tokio::test]
async fn put_replaces_user() {
    seeded_app()
        .put("/api/users/2")
        .json(&json!({"name": "Robert", "email": "robert@example.com"}))
        .send()
        .await
        .assert_ok()
        .assert_json_path("id", 2)
        .assert_json_path("name", "Robert")
        .assert_json_path("age", serde_json::Value::Null);
}

#[tokio::test]
async fn put_errors() {
    let app = seeded_app();
    app.put("/api/users/999")
        .json(&json!({"name": "Ghost", "email": "ghost@example.com"}))
        .send()
        .await
        .assert_not_found()
        .assert_json_path("error", "User 999 not found");

    app.put("/api/users/1")
        .json(&json!({"name": "Alice"}))
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Name and email are required");

    app.put("/api/users/1")
        .json(&json!({"name": "Alice", "email": "bob@example.com"}))
        .send()
        .await
        .assert_conflict();

    app.put("/api/users/999")
        .json(&json!({"name": "Z", "email": "bob@example.com"}))
        .send()
        .await
        .assert_not_found()
        .assert_json_path("error", "User 999 not found");

    app.put("/api/users/x")
        .json(&json!({"name": "Alice", "email": "alice@example.com"}))
        .send()
        .await
        .assert_bad_request();
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    seeded_app()
        .patch("/api/users/1")
        .json(&json!({"age": 31}))
        .send()
        .await
        .assert_ok()
        .assert_json_path("name", "Alice")
        .assert_json_path("email", "alice@example.com")
        .assert_json_path("age", 31);
}

#[tokio::test]
async fn patch_errors() {
    let app = seeded_app();
    app.patch("/api/users/42")
        .json(&json!({"age": 5}))
        .send()
        .await
        .assert_not_found();

    app.patch("/api/users/999")
        .json(&json!({"email": "alice@example.com"}))
        .send()
        .await
        .assert_not_found()
        .assert_json_path("error", "User 999 not found");

    app.patch("/api/users/1")
        .json(&json!({"email": "nope"}))
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("error", "Validation failed")
        .assert_json_path("details[0].field", "email");

    let resp = app
        .patch("/api/users/1")
        .raw_json("[1, 2")
        .send()
        .await
        .assert_bad_request();
    let error: String = resp.json_path("error");
    assert!(error.starts_with("Invalid JSON body"), "{error}");
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let store = UserStore::seeded();
    let app = app_with(store.clone());

    let resp = app.delete("/api/users/1").send().await.assert_no_content();
    assert!(resp.body.is_empty());
    assert_eq!(store.count().await, 1);

    app.get("/api/users/1").send().await.assert_not_found();
    app.delete("/api/users/1")
        .send()
        .await
        .assert_not_found()
        .assert_json_path("error", "User 1 not found");
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let app = seeded_app();
    app.delete("/api/users/2").send().await.assert_no_content();
    app.post("/api/users")
        .json(&json!({"name": "Eve", "email": "eve@example.com"}))
        .send()
        .await
        .assert_created()
        .assert_json_path("user.id", 3);
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    app_with(UserStore::empty())
        .get("/api/users")
        .send()
        .await
        .assert_ok()
        .assert_json_path("len()", 0);
}

#[tokio::test]
async fn patch_with_null_age_clears_it_and_omitted_age_keeps_it() {
    let app = seeded_app();
    app.patch("/api/users/2")
        .json(&json!({"name": "Bobby"}))
        .send()
        .await
        .assert_ok()
        .assert_json_path("age", 25);

    app.patch("/api/users/2")
        .json(&json!({"age": null}))
        .send()
        .await
        .assert_ok()
        .assert_json_path("name", "Bobby")
        .assert_json_path("age", serde_json::Value::Null);
}

#[tokio::test]
async fn patch_rejects_out_of_range_age() {
    seeded_app()
        .patch("/api/users/1")
        .json(&json!({"age": 151}))
        .send()
        .await
        .assert_bad_request()
        .assert_json_path("details[0].field", "age");
}

#[tokio::test]
async fn list_supports_offset_and_limit() {
    let app = seeded_app();
    app.get("/api/users?limit=1")
        .send()
        .await
        .assert_ok()
        .assert_json_path("len()", 1)
        .assert_json_path("[0].name", "Alice");
    app.get("/api/users?offset=1&limit=5")
        .send()
        .await
        .assert_ok()
        .assert_json_path("len()", 1)
        .assert_json_path("[0].name", "Bob");
}

#[tokio::test]
async fn malformed_query_is_json_400() {
    let resp = seeded_app()
        .get("/api/users?limit=lots")
        .send()
        .await
        .assert_bad_request();
    let error: String = resp.json_path("error");
    assert!(error.starts_with("Invalid query"), "{error}");
}

#[tokio::test]
async fn unsupported_method_is_json_405() {
    let app = seeded_app();
    app.delete("/api/users")
        .send()
        .await
        .assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED)
        .assert_json_path("error", "Method not allowed");
    app.post("/api/users/1")
        .json(&json!({"name": "A", "email": "a@example.com"}))
        .send()
        .await
        .assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED)
        .assert_json_path("error", "Method not allowed");
}
