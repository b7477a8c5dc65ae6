//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::{BookFilter, BookPage, BookRepository, DomainError};
use crate::models::Book;
use crate::models::book::{ActiveModel, BookDraft, BookPatch, Column, Entity as BookEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Compile a sparse filter into a conjunctive predicate. Title and author
/// match by substring (LIKE, case-insensitive for ASCII under SQLite),
/// publication year and ISBN by equality. An empty filter compiles to a
/// condition with no terms, i.e. match-all.
fn compile_filter(filter: &BookFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(title) = &filter.title
        && !title.is_empty()
    {
        condition = condition.add(Column::Title.contains(title));
    }

    if let Some(author) = &filter.author
        && !author.is_empty()
    {
        condition = condition.add(Column::Author.contains(author));
    }

    if let Some(year) = filter.publication_year {
        condition = condition.add(Column::PublicationYear.eq(year));
    }

    if let Some(isbn) = &filter.isbn
        && !isbn.is_empty()
    {
        condition = condition.add(Column::Isbn.eq(isbn.as_str()));
    }

    condition
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_page(
        &self,
        filter: &BookFilter,
        page: u64,
        page_size: u64,
    ) -> Result<BookPage, DomainError> {
        let query = BookEntity::find()
            .filter(compile_filter(filter))
            .order_by_asc(Column::Id);

        // Count the whole filtered set, then fetch the requested slice.
        let paginator = query.paginate(&self.db, page_size);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        tracing::debug!(
            "book page {} (size {}) fetched, {} of {} total",
            page,
            page_size,
            models.len(),
            total
        );

        Ok(BookPage {
            books: models.into_iter().map(Book::from).collect(),
            total,
        })
    }

    async fn find_all(
        &self,
        filter: &BookFilter,
        limit: Option<u64>,
    ) -> Result<Vec<Book>, DomainError> {
        let mut query = BookEntity::find()
            .filter(compile_filter(filter))
            .order_by_asc(Column::Id);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await?;
        Ok(models.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let model = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Book::from))
    }

    async fn create(&self, draft: BookDraft) -> Result<Book, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_book = ActiveModel {
            title: Set(draft.title),
            author: Set(draft.author),
            description: Set(draft.description),
            publication_year: Set(draft.publication_year),
            isbn: Set(draft.isbn),
            cover_url: Set(None),
            genre: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        // A duplicate ISBN surfaces here as the store's unique-constraint
        // rejection, never as an application-level pre-check.
        let model = new_book.insert(&self.db).await?;

        tracing::debug!("created book id={}", model.id);
        Ok(Book::from(model))
    }

    async fn update(&self, id: i32, patch: BookPatch) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(author) = patch.author {
            active.author = Set(author);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(year) = patch.publication_year {
            active.publication_year = Set(year);
        }
        if let Some(isbn) = patch.isbn {
            active.isbn = Set(isbn);
        }
        if let Some(cover_url) = patch.cover_url {
            active.cover_url = Set(cover_url);
        }
        if let Some(genre) = patch.genre {
            active.genre = Set(genre);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.db).await?;

        tracing::debug!("updated book id={}", model.id);
        Ok(Book::from(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = BookEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
