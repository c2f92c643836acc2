//! API integration tests

use reqwest::Client;
use serde_json::{json, Value};

use sapiens_server::{api, config::AppConfig, AppState};

/// Start the server on an ephemeral port and return its API base URL
async fn spawn_server(config: AppConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    let app = api::create_router(AppState::new(config));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });

    format!("http://{}/api/v1", addr)
}

async fn spawn_default() -> String {
    spawn_server(AppConfig::default()).await
}

#[tokio::test]
async fn test_health_check() {
    let base_url = spawn_default().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_seeded_books() {
    let base_url = spawn_default().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/books", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let titles: Vec<&str> = body
        .as_array()
        .expect("Expected an array")
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "1984",
            "To Kill a Mockingbird",
            "The Hobbit",
            "The Great Gatsby",
            "Pride and Prejudice"
        ]
    );
}

#[tokio::test]
async fn test_empty_library_without_seed() {
    let mut config = AppConfig::default();
    config.library.seed_sample_data = false;
    let base_url = spawn_server(config).await;
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/stats", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body["total_books"], 0);
    assert_eq!(body["total_users"], 0);
}

#[tokio::test]
async fn test_search_books() {
    let base_url = spawn_default().await;
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/books?author=tolkien", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["isbn"], "978-0544003415");
}

#[tokio::test]
async fn test_create_update_and_delete_book() {
    let base_url = spawn_default().await;
    let client = Client::new();

    // Create book
    let response = client
        .post(format!("{}/books", base_url))
        .json(&json!({
            "isbn": "978-0441172719",
            "title": "Dune",
            "author": "Frank Herbert",
            "publication_year": 1965,
            "genre": "Science Fiction"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["available"], true);

    // Duplicate ISBN
    let response = client
        .post(format!("{}/books", base_url))
        .json(&json!({
            "isbn": "978-0441172719",
            "title": "Dune Messiah",
            "author": "Frank Herbert"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // Update book
    let response = client
        .put(format!("{}/books/978-0441172719", base_url))
        .json(&json!({ "genre": "Space Opera" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["genre"], "Space Opera");
    assert_eq!(body["title"], "Dune");

    // Delete book
    let response = client
        .delete(format!("{}/books/978-0441172719", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/books/978-0441172719", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_book_missing_title() {
    let base_url = spawn_default().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base_url))
        .json(&json!({
            "isbn": "111",
            "title": "",
            "author": "Nobody"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_loan_workflow() {
    let base_url = spawn_default().await;
    let client = Client::new();

    // Borrow
    let response = client
        .post(format!("{}/loans", base_url))
        .json(&json!({
            "isbn": "978-0061120084",
            "user_id": "U002",
            "loan_date": "2023-10-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["loan"]["id"], "P001");
    assert_eq!(body["loan"]["due_date"], "2023-10-16");

    // Book is now lent out
    let body: Value = client
        .get(format!("{}/books/978-0061120084", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["available"], false);

    // Second borrow is refused
    let response = client
        .post(format!("{}/loans", base_url))
        .json(&json!({
            "isbn": "978-0061120084",
            "user_id": "U001"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);

    // User and book cannot be deleted while the loan is active
    let response = client
        .delete(format!("{}/users/U002", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    let response = client
        .delete(format!("{}/books/978-0061120084", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    let body: Value = client
        .get(format!("{}/users/U002/loans", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    // Return four days late
    let response = client
        .post(format!("{}/loans/P001/return", base_url))
        .json(&json!({ "return_date": "2023-10-20" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["loan"]["active"], false);
    assert_eq!(body["loan"]["overdue_days"], 4);

    // Returning twice fails
    let response = client
        .post(format!("{}/loans/P001/return", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let body: Value = client
        .get(format!("{}/stats", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["available_books"], 5);
    assert_eq!(body["active_loans"], 0);
    assert_eq!(body["late_returns"], 1);

    // Now the user can go
    let response = client
        .delete(format!("{}/users/U002", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_loan_unknown_user() {
    let base_url = spawn_default().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/loans", base_url))
        .json(&json!({
            "isbn": "978-0142437230",
            "user_id": "U999"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_create_and_search_user() {
    let base_url = spawn_default().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/users", base_url))
        .json(&json!({
            "id": "U005",
            "name": "Lucía Fernández",
            "contact": "lucia@email.com"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = client
        .get(format!("{}/users?name=fern", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], "U005");
}

#[tokio::test]
async fn test_openapi_document() {
    let base_url = spawn_default().await;
    let root = base_url.trim_end_matches("/api/v1");
    let client = Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", root))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/books"].is_object());
}
