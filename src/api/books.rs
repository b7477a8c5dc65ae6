use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::api::error::ApiError;
use crate::domain::{BookFilter, DomainError, PaginationMetadata};
use crate::infrastructure::AppState;
use crate::models::Book;
use crate::models::book::{BookDraft, BookPatch};
use crate::models::response::{BookListResponse, DefaultResponse, ErrorResponse};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksParams {
    /// Substring match on title, case-insensitive
    pub title: Option<String>,
    /// Substring match on author, case-insensitive
    pub author: Option<String>,
    /// Exact match on publication year
    pub publication_year: Option<i32>,
    /// Exact match on ISBN
    pub isbn: Option<String>,
    /// 1-based page number, default 1
    pub page: Option<u64>,
    /// Page size, 1 to 100, default 10
    pub page_size: Option<u64>,
}

impl ListBooksParams {
    fn into_filter(self) -> BookFilter {
        BookFilter {
            title: self.title.filter(|s| !s.is_empty()),
            author: self.author.filter(|s| !s.is_empty()),
            publication_year: self.publication_year,
            isbn: self.isbn.filter(|s| !s.is_empty()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/books",
    params(ListBooksParams),
    responses(
        (status = 200, description = "Paged list of books", body = BookListResponse),
        (status = 400, description = "Pagination parameters out of range", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<BookListResponse>, ApiError> {
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        return Err(DomainError::Validation("page must be >= 1".to_string()).into());
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(DomainError::Validation(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        ))
        .into());
    }

    let filter = params.into_filter();
    let result = state.book_repo.find_page(&filter, page, page_size).await?;
    let metadata = PaginationMetadata::compute(result.total, page, page_size);

    Ok(Json(BookListResponse {
        status: true,
        message: "book list retrieved".to_string(),
        items: result.books,
        metadata,
    }))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "The requested book", body = Book),
        (status = 404, description = "No book with this id", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Book>, ApiError> {
    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok(Json(book))
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Payload fails the creation schema", body = ErrorResponse),
        (status = 409, description = "ISBN already in use", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let draft = BookDraft::parse_and_validate(payload)?;
    let book = state.book_repo.create(draft).await?;

    tracing::info!("created book id={}", book.id);
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Updated book", body = Book),
        (status = 400, description = "Payload fails the update schema", body = ErrorResponse),
        (status = 404, description = "No book with this id", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<Value>,
) -> Result<Json<Book>, ApiError> {
    let patch = BookPatch::parse_and_validate(payload)?;
    let book = state.book_repo.update(id, patch).await?;

    tracing::info!("updated book id={}", id);
    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book deleted", body = DefaultResponse),
        (status = 404, description = "No book with this id", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DefaultResponse>, ApiError> {
    let deleted = state.book_repo.delete(id).await?;
    if !deleted {
        return Err(DomainError::NotFound.into());
    }

    tracing::info!("deleted book id={}", id);
    Ok(Json(DefaultResponse {
        status: true,
        message: format!("book with id {} deleted", id),
    }))
}
