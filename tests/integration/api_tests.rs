//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// ISBN unlikely to collide between runs
fn unique_isbn() -> i64 {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    (nanos % 1_000_000_000_000) as i64
}

async fn create_book(client: &Client, isbn: i64) -> Value {
    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .json(&json!({
            "title": "Integration Book",
            "author": "Test Author",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_create_get_and_delete_book() {
    let client = Client::new();
    let isbn = unique_isbn();

    let created = create_book(&client, isbn).await;
    let id = created["id"].as_i64().expect("No book ID");
    assert_eq!(created["isbn"], isbn);

    let response = client
        .get(format!("{}/api/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Integration Book");

    let response = client
        .delete(format!("{}/api/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/api/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_is_rejected() {
    let client = Client::new();
    let isbn = unique_isbn();
    create_book(&client, isbn).await;

    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .json(&json!({
            "title": "Another Title",
            "author": "Another Author",
            "isbn": isbn
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0], "Isbn already registered");
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle() {
    let client = Client::new();
    let isbn = unique_isbn();
    create_book(&client, isbn).await;

    // Check out
    let response = client
        .post(format!("{}/api/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "integration" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let loan_id = body["id"].as_i64().expect("No loan ID");

    // Second checkout of the same book is refused
    let response = client
        .post(format!("{}/api/loans", BASE_URL))
        .json(&json!({ "isbn": isbn, "customer": "someone else" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Return
    let response = client
        .patch(format!("{}/api/loans/{}", BASE_URL, loan_id))
        .json(&json!({ "returned": true }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/api/loans/{}", BASE_URL, loan_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["returned"], true);

    // Search by ISBN
    let response = client
        .get(format!("{}/api/loans?isbn={}&page=0&size=10", BASE_URL, isbn))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["size"], 10);
}

#[tokio::test]
#[ignore]
async fn test_loan_for_unknown_isbn() {
    let client = Client::new();

    let response = client
        .post(format!("{}/api/loans", BASE_URL))
        .json(&json!({ "isbn": -1, "customer": "nobody" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0], "Book not found for passed isbn");
}
