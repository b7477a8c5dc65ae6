//! Enrichment endpoint: fetch external metadata by the book's ISBN, merge
//! it into the record and persist the result. Fail-fast: any provider or
//! merge failure aborts the whole operation.

use axum::Json;
use axum::extract::{Path, State};

use crate::api::error::ApiError;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::services::enrichment;

pub async fn enrich_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Book>, ApiError> {
    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    let Some(isbn) = book.isbn.clone().filter(|s| !s.is_empty()) else {
        return Err(DomainError::Validation(
            "book has no isbn, cannot fetch metadata".to_string(),
        )
        .into());
    };

    let metadata = state.metadata.fetch(&isbn).await?;
    let patch = enrichment::merge_metadata(&book, &metadata);
    let updated = state.book_repo.update(id, patch).await?;

    tracing::info!("enriched book id={} from metadata provider", id);
    Ok(Json(updated))
}
