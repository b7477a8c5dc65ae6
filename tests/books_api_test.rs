use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`

use bookstack::metadata_client::MetadataClient;
use bookstack::{AppState, api, db};

// Helper to build the API router against a fresh in-memory database
async fn setup_app() -> Router {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let metadata = MetadataClient::new("http://127.0.0.1:9", None, Duration::from_secs(1))
        .expect("Failed to build metadata client");
    api::api_router(AppState::new(db, metadata))
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    dispatch(app, req).await
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap();
    dispatch(app, req).await
}

async fn dispatch(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = setup_app().await;

    // Create
    let (status, created) = send_json(
        &app,
        "POST",
        "/books",
        json!({"title": "Dune", "author": "Herbert"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().expect("integer id");
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["author"], "Herbert");

    // Read back
    let (status, fetched) = send(&app, "GET", &format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Dune");
    assert_eq!(fetched["author"], "Herbert");
    assert!(fetched["created_at"].is_string());

    // Delete
    let (status, body) = send(&app, "DELETE", &format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);

    // Gone
    let (status, _) = send(&app, "GET", &format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is a negative result, not a crash
    let (status, body) = send(&app, "DELETE", &format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn test_create_book_validation_errors() {
    let app = setup_app().await;

    // Missing author
    let (status, body) = send_json(&app, "POST", "/books", json!({"title": "T"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("author"));

    // Publication year out of range
    let (status, body) = send_json(
        &app,
        "POST",
        "/books",
        json!({"title": "T", "author": "A", "publication_year": 999}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("publication_year"));

    // Malformed ISBN
    let (status, body) = send_json(
        &app,
        "POST",
        "/books",
        json!({"title": "T", "author": "A", "isbn": "not-an-isbn"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("isbn"));

    // Nothing was persisted along the way
    let (_, body) = send(&app, "GET", "/books").await;
    assert_eq!(body["metadata"]["total_items"], 0);
}

#[tokio::test]
async fn test_duplicate_isbn_is_rejected_by_the_store() {
    let app = setup_app().await;

    let (status, first) = send_json(
        &app,
        "POST",
        "/books",
        json!({"title": "First", "author": "A", "isbn": "9780441172719"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app,
        "POST",
        "/books",
        json!({"title": "Second", "author": "B", "isbn": "9780441172719"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], false);

    // The first record survives unmodified
    let (status, fetched) = send(&app, "GET", &format!("/books/{}", first["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "First");

    // Books without an ISBN never collide
    for title in ["NoIsbn1", "NoIsbn2"] {
        let (status, _) =
            send_json(&app, "POST", "/books", json!({"title": title, "author": "C"})).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_partial_update_touches_only_supplied_fields() {
    let app = setup_app().await;

    let (_, created) = send_json(
        &app,
        "POST",
        "/books",
        json!({
            "title": "Dune",
            "author": "Herbert",
            "description": "Desert planet",
            "publication_year": 1965
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    // Replace the title only
    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/books/{}", id),
        json!({"title": "Dune Messiah"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Dune Messiah");
    assert_eq!(updated["description"], "Desert planet");
    assert_eq!(updated["publication_year"], 1965);

    // An explicit null clears the field; omitted fields stay put
    let (status, updated) = send_json(
        &app,
        "PUT",
        &format!("/books/{}", id),
        json!({"description": null}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["description"].is_null());
    assert_eq!(updated["title"], "Dune Messiah");
    assert_eq!(updated["publication_year"], 1965);

    // Persisted, not just echoed
    let (_, fetched) = send(&app, "GET", &format!("/books/{}", id)).await;
    assert!(fetched["description"].is_null());
    assert_eq!(fetched["title"], "Dune Messiah");
}

#[tokio::test]
async fn test_update_error_cases() {
    let app = setup_app().await;

    let (status, _) = send_json(&app, "PUT", "/books/999", json!({"title": "X"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, created) = send_json(
        &app,
        "POST",
        "/books",
        json!({"title": "T", "author": "A"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/books/{}", id),
        json!({"isbn": "letters"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("isbn"));

    // Title cannot be blanked out
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/books/{}", id),
        json!({"title": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_pagination_math() {
    let app = setup_app().await;

    for i in 1..=5 {
        let (status, _) = send_json(
            &app,
            "POST",
            "/books",
            json!({"title": format!("Book {}", i), "author": "Author"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/books?page=2&page_size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["current_page"], 2);
    assert_eq!(body["metadata"]["page_size"], 2);
    assert_eq!(body["metadata"]["total_items"], 5);
    assert_eq!(body["metadata"]["total_pages"], 3);
    assert_eq!(body["metadata"]["has_next"], true);
    assert_eq!(body["metadata"]["has_previous"], true);

    // Insertion order is stable across pages
    assert_eq!(body["items"][0]["title"], "Book 3");

    let (_, body) = send(&app, "GET", "/books?page=3&page_size=2").await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["metadata"]["has_next"], false);
    assert_eq!(body["metadata"]["has_previous"], true);
}

#[tokio::test]
async fn test_empty_catalog_lists_cleanly() {
    let app = setup_app().await;

    let (status, body) = send(&app, "GET", "/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["metadata"]["total_items"], 0);
    assert_eq!(body["metadata"]["total_pages"], 0);
    assert_eq!(body["metadata"]["has_next"], false);
    assert_eq!(body["metadata"]["has_previous"], false);
}

#[tokio::test]
async fn test_list_filters() {
    let app = setup_app().await;

    let books = [
        ("Book 1", "Frank Herbert", 1965, Some("9780441172719")),
        ("My Book", "frank herbert", 1969, Some("978-0441478125")),
        ("Bk 1", "Ursula K. Le Guin", 1969, None),
    ];
    for (title, author, year, isbn) in books {
        let mut payload = json!({"title": title, "author": author, "publication_year": year});
        if let Some(isbn) = isbn {
            payload["isbn"] = json!(isbn);
        }
        let (status, _) = send_json(&app, "POST", "/books", payload).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Title: case-insensitive substring
    let (_, body) = send(&app, "GET", "/books?title=Book").await;
    assert_eq!(body["metadata"]["total_items"], 2);
    let (_, body) = send(&app, "GET", "/books?title=book").await;
    assert_eq!(body["metadata"]["total_items"], 2);

    // Author: substring, case-insensitive
    let (_, body) = send(&app, "GET", "/books?author=herbert").await;
    assert_eq!(body["metadata"]["total_items"], 2);

    // Exact year
    let (_, body) = send(&app, "GET", "/books?publication_year=1969").await;
    assert_eq!(body["metadata"]["total_items"], 2);

    // Exact ISBN: hyphens are not normalized away
    let (_, body) = send(&app, "GET", "/books?isbn=9780441172719").await;
    assert_eq!(body["metadata"]["total_items"], 1);
    assert_eq!(body["items"][0]["title"], "Book 1");
    let (_, body) = send(&app, "GET", "/books?isbn=978-0441478125").await;
    assert_eq!(body["metadata"]["total_items"], 1);
    assert_eq!(body["items"][0]["title"], "My Book");

    // Filters compose with AND
    let (_, body) = send(&app, "GET", "/books?title=Book&publication_year=1969").await;
    assert_eq!(body["metadata"]["total_items"], 1);
    assert_eq!(body["items"][0]["title"], "My Book");
}

#[tokio::test]
async fn test_list_rejects_out_of_range_pagination() {
    let app = setup_app().await;

    let (status, _) = send(&app, "GET", "/books?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/books?page_size=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/books?page_size=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
