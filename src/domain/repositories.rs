//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::book::{Book, BookDraft, BookPatch};

/// Filter criteria for book queries.
///
/// `title` and `author` match by case-insensitive substring,
/// `publication_year` and `isbn` by exact equality. All terms combine
/// with AND; absent fields contribute no term.
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
}

impl BookFilter {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publication_year.is_none()
            && self.isbn.is_none()
    }
}

/// One page of books with the total count of the filtered set.
#[derive(Debug)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub total: u64,
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find one page of books matching the filter. The total count is scoped
    /// to the same filter, not the page slice. `page` is 1-based; any
    /// `page_size >= 1` is accepted here, range policy is the caller's job.
    async fn find_page(
        &self,
        filter: &BookFilter,
        page: u64,
        page_size: u64,
    ) -> Result<BookPage, DomainError>;

    /// Find every book matching the filter, optionally capped at `limit`.
    async fn find_all(
        &self,
        filter: &BookFilter,
        limit: Option<u64>,
    ) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Create a new book from a validated draft
    async fn create(&self, draft: BookDraft) -> Result<Book, DomainError>;

    /// Apply a partial update. Absent patch fields are left untouched;
    /// explicit nulls clear the field. Refreshes `updated_at`.
    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, DomainError>;

    /// Delete a book by ID. Returns false when no record existed.
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
