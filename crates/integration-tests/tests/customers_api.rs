//! End-to-end tests for `/api/customers` over real HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use customer_hub_integration_tests::{API_PASSWORD, API_USERNAME, TestServer};

fn john(username: &str) -> Value {
    json!({
        "first_name": "John",
        "last_name": "Lastname",
        "dob": "1990-11-11",
        "username": username,
        "password": "PasS1234",
    })
}

async fn create(client: &Client, server: &TestServer, body: &Value) -> (StatusCode, Value) {
    let resp = client
        .post(server.url("/api/customers"))
        .basic_auth(API_USERNAME, Some(API_PASSWORD))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get(client: &Client, server: &TestServer, path: &str) -> (StatusCode, Value) {
    let resp = client
        .get(server.url(path))
        .basic_auth(API_USERNAME, Some(API_PASSWORD))
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_requests_without_credentials_are_rejected() {
    let server = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let resp = client
        .post(server.url("/api/customers"))
        .json(&john("userjohn"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get("www-authenticate").unwrap(),
        "Basic realm=\"customers\""
    );
    assert!(server.store.is_empty());

    let resp = client
        .get(server.url("/api/customers"))
        .basic_auth(API_USERNAME, Some("wrong-password"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_credentials() {
    let server = TestServer::spawn().await.unwrap();
    let resp = Client::new().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let server = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let (status, created) = create(&client, &server, &john("userjohn")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Customer saved successfully");
    let data = &created["data"];
    assert!(data["id"].is_number());
    assert!(data.get("password").is_none());
    assert!(data["created_at"].is_string());

    let id = data["id"].as_i64().unwrap();
    let (status, fetched) = get(&client, &server, &format!("/api/customers/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["first_name"], "John");
    assert_eq!(fetched["data"]["last_name"], "Lastname");
    assert_eq!(fetched["data"]["dob"], "1990-11-11");
    assert_eq!(fetched["data"]["username"], "userjohn");
}

#[tokio::test]
async fn test_duplicate_username_leaves_first_record_unchanged() {
    let server = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let (_, first) = create(&client, &server, &john("userjohn")).await;

    let mut second = john("userjohn");
    second["first_name"] = json!("Jane");
    let (status, body) = create(&client, &server, &second).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["username"], json!(["The username has already been taken."]));

    let id = first["data"]["id"].as_i64().unwrap();
    let (_, fetched) = get(&client, &server, &format!("/api/customers/{id}")).await;
    assert_eq!(fetched["data"], first["data"]);
}

#[tokio::test]
async fn test_password_and_username_rules() {
    let server = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let cases = [
        (
            "password",
            json!("1"),
            json!([
                "The password field must be at least 8 characters.",
                "The password field format is invalid."
            ]),
        ),
        (
            "password",
            json!("1123123123123"),
            json!(["The password field format is invalid."]),
        ),
        (
            "username",
            json!("a"),
            json!(["The username field must be at least 2 characters."]),
        ),
    ];

    for (field, value, expected) in cases {
        let mut body = john("userjohn");
        body[field] = value;
        let (status, resp) = create(&client, &server, &body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{field}");
        assert_eq!(resp["status"], "error");
        assert_eq!(resp["message"], "Validation failed");
        assert_eq!(resp["errors"][field], expected, "{field}");
    }
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn test_update_and_delete_lifecycle() {
    let server = TestServer::spawn().await.unwrap();
    let client = Client::new();

    let (_, created) = create(&client, &server, &john("userjohn")).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let path = format!("/api/customers/{id}");

    let mut blank_username = john("");
    blank_username["first_name"] = json!("Johnny");
    let resp = client
        .put(server.url(&path))
        .basic_auth(API_USERNAME, Some(API_PASSWORD))
        .json(&blank_username)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["username"], json!(["The username field is required."]));

    let resp = client
        .put(server.url(&path))
        .basic_auth(API_USERNAME, Some(API_PASSWORD))
        .json(&john("johnny"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Customer updated successfully");
    assert_eq!(body["data"]["username"], "johnny");

    let resp = client
        .delete(server.url(&path))
        .basic_auth(API_USERNAME, Some(API_PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], format!("Customer {id} deleted successfully"));

    let (status, _) = get(&client, &server, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let resp = client
        .delete(server.url(&path))
        .basic_auth(API_USERNAME, Some(API_PASSWORD))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_never_exposes_passwords() {
    let server = TestServer::spawn().await.unwrap();
    let client = Client::new();

    for i in 0..20 {
        let mut body = john(&format!("user{i:02}"));
        body["last_name"] = json!(format!("Last{}", (b'a' + (i % 26)) as char));
        create(&client, &server, &body).await;
    }

    for query in ["", "?page=2", "?sort=-username", "?sort=last_name,-id&page=2", "?page=abc"] {
        let (status, body) = get(&client, &server, &format!("/api/customers{query}")).await;
        assert_eq!(status, StatusCode::OK, "{query}");

        let rows = body["data"]["data"].as_array().unwrap();
        assert!(!rows.is_empty(), "{query}");
        assert!(rows.iter().all(|r| r.get("password").is_none()), "{query}");
        assert_eq!(body["data"]["meta"]["total"], 20);
        assert_eq!(body["data"]["meta"]["per_page"], 15);
    }

    let (_, body) = get(&client, &server, "/api/customers?sort=-username").await;
    assert_eq!(body["data"]["data"][0]["username"], "user19");
    assert_eq!(
        body["data"]["links"]["next"],
        server.url("/api/customers?sort=-username&page=2")
    );
}
