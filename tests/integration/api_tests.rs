//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to post an operation request and return status and body
async fn send(client: &Client, request: Value) -> (u16, Value) {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&request)
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn create_book(client: &Client) -> String {
    let (status, body) = send(
        client,
        json!({
            "operation": "create",
            "title": "Integration Test Book",
            "borrower": "Tester",
            "borrowed_date": "2024-01-01",
        }),
    )
    .await;

    assert_eq!(status, 200);
    body["book_id"].as_str().expect("No book ID").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_missing_operation() {
    let client = Client::new();

    let (status, body) = send(&client, json!({ "title": "No operation" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing operation");
}

#[tokio::test]
#[ignore]
async fn test_invalid_operation() {
    let client = Client::new();

    let (status, body) = send(&client, json!({ "operation": "archive" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid operation");
}

#[tokio::test]
#[ignore]
async fn test_create_update_delete_book() {
    let client = Client::new();
    let book_id = create_book(&client).await;

    // Update title only
    let (status, body) = send(
        &client,
        json!({ "operation": "update", "book_id": book_id, "title": "Renamed" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Book updated");

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["title"], "Renamed");
    assert_eq!(book["borrower"], "Tester");

    // Delete twice
    for _ in 0..2 {
        let delete = json!({ "operation": "delete", "book_id": book_id });
        let (status, body) = send(&client, delete).await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Book deleted");
    }

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_create_missing_field() {
    let client = Client::new();

    let (status, body) = send(
        &client,
        json!({ "operation": "create", "title": "T", "borrower": "B" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing required field");
}

#[tokio::test]
#[ignore]
async fn test_update_without_fields() {
    let client = Client::new();
    let book_id = create_book(&client).await;

    let (status, body) = send(&client, json!({ "operation": "update", "book_id": book_id })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing required field");

    send(&client, json!({ "operation": "delete", "book_id": book_id })).await;
}

#[tokio::test]
#[ignore]
async fn test_invoke_envelope() {
    let client = Client::new();

    let response = client
        .post(format!("{}/invoke", BASE_URL))
        .json(&json!({
            "body": json!({ "operation": "delete", "book_id": "unknown" }).to_string(),
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let envelope: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(envelope["statusCode"], 200);
    assert_eq!(envelope["body"], r#"{"message":"Book deleted"}"#);
}
