pub mod books;
pub mod error;
pub mod export;
pub mod health;
pub mod import;
pub mod metadata;

use axum::Router;
use axum::routing::{get, post};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/export/csv", get(export::export_csv))
        .route("/books/import/json", post(import::import_json))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/metadata", get(metadata::enrich_book))
        .with_state(state)
}
