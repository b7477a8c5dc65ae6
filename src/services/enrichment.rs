//! Metadata enrichment merger.
//!
//! Folds a fetched metadata record into an existing book's mutable fields.
//! Each rule applies independently with its own fixed precedence. The fetch
//! itself is the caller's job and is fail-fast for the whole enrichment
//! operation.

use chrono::Datelike;

use crate::metadata_client::BookMetadata;
use crate::models::Book;
use crate::models::book::{BookPatch, PUBLICATION_YEAR_MIN};

/// Build the partial update that folds `metadata` into `book`.
///
/// Rules:
/// - title: the provider is authoritative, any non-empty title overwrites.
/// - description: fill-only, never overwrites an existing description.
/// - author: fill-only; when the provider lists several authors only the
///   first is taken, since the book schema holds a single author string.
/// - cover_url: always overwritten when the provider has one.
/// - genre: first genre name only, stored as a single string.
/// - publication_date: reduced to a calendar year; out-of-range years are
///   dropped rather than stored.
pub fn merge_metadata(book: &Book, metadata: &BookMetadata) -> BookPatch {
    let mut patch = BookPatch::default();

    if !metadata.title.is_empty() {
        patch.title = Some(metadata.title.clone());
    }

    if book.description.as_deref().unwrap_or("").is_empty()
        && let Some(description) = &metadata.description
        && !description.is_empty()
    {
        patch.description = Some(Some(description.clone()));
    }

    if book.author.is_empty()
        && let Some(first_author) = metadata.authors.first()
    {
        patch.author = Some(first_author.name.clone());
    }

    if let Some(cover_url) = &metadata.cover_url {
        patch.cover_url = Some(Some(cover_url.clone()));
    }

    if let Some(genre) = metadata.genres.as_ref().and_then(|g| g.first()) {
        patch.genre = Some(Some(genre.name.clone()));
    }

    if let Some(year) = metadata.publication_year() {
        let current_year = chrono::Utc::now().year();
        if (PUBLICATION_YEAR_MIN..=current_year).contains(&year) {
            patch.publication_year = Some(Some(year));
        } else {
            tracing::warn!(
                "dropping out-of-range publication year {} from metadata for isbn {}",
                year,
                metadata.isbn
            );
        }
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata_client::{AuthorMetadata, GenreMetadata};

    fn book(description: Option<&str>, author: &str) -> Book {
        Book {
            id: 1,
            title: "Old Title".to_string(),
            author: author.to_string(),
            description: description.map(String::from),
            publication_year: None,
            isbn: Some("9780441172719".to_string()),
            cover_url: None,
            genre: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn metadata() -> BookMetadata {
        serde_json::from_value(serde_json::json!({
            "isbn": "9780441172719",
            "title": "Dune",
            "authors": [],
        }))
        .unwrap()
    }

    fn author(name: &str) -> AuthorMetadata {
        AuthorMetadata {
            name: name.to_string(),
            birth_year: None,
            death_year: None,
            country: None,
        }
    }

    #[test]
    fn title_is_always_overwritten() {
        let patch = merge_metadata(&book(Some("kept"), "A"), &metadata());
        assert_eq!(patch.title.as_deref(), Some("Dune"));
    }

    #[test]
    fn empty_metadata_title_does_not_overwrite() {
        let mut meta = metadata();
        meta.title = String::new();
        let patch = merge_metadata(&book(None, "A"), &meta);
        assert!(patch.title.is_none());
    }

    #[test]
    fn description_fills_only_when_absent_or_empty() {
        let mut meta = metadata();
        meta.description = Some("D".to_string());

        let patch = merge_metadata(&book(None, "A"), &meta);
        assert_eq!(patch.description, Some(Some("D".to_string())));

        let patch = merge_metadata(&book(Some(""), "A"), &meta);
        assert_eq!(patch.description, Some(Some("D".to_string())));

        let patch = merge_metadata(&book(Some("existing"), "A"), &meta);
        assert!(patch.description.is_none());
    }

    #[test]
    fn author_fills_only_when_empty_and_takes_first() {
        let mut meta = metadata();
        meta.authors = vec![author("X"), author("Y")];

        let patch = merge_metadata(&book(None, ""), &meta);
        assert_eq!(patch.author.as_deref(), Some("X"));

        let patch = merge_metadata(&book(None, "A"), &meta);
        assert!(patch.author.is_none());
    }

    #[test]
    fn cover_url_overwrites() {
        let mut meta = metadata();
        meta.cover_url = Some("https://covers.example/1.jpg".to_string());
        let mut existing = book(None, "A");
        existing.cover_url = Some("https://covers.example/old.jpg".to_string());

        let patch = merge_metadata(&existing, &meta);
        assert_eq!(
            patch.cover_url,
            Some(Some("https://covers.example/1.jpg".to_string()))
        );
    }

    #[test]
    fn first_genre_name_is_stored_as_string() {
        let mut meta = metadata();
        meta.genres = Some(vec![
            GenreMetadata {
                name: "Science Fiction".to_string(),
                category: None,
            },
            GenreMetadata {
                name: "Adventure".to_string(),
                category: None,
            },
        ]);

        let patch = merge_metadata(&book(None, "A"), &meta);
        assert_eq!(patch.genre, Some(Some("Science Fiction".to_string())));
    }

    #[test]
    fn publication_date_becomes_year() {
        let meta: BookMetadata = serde_json::from_value(serde_json::json!({
            "isbn": "9780441172719",
            "title": "Dune",
            "authors": [],
            "publication_date": "1965-08-01",
        }))
        .unwrap();

        let patch = merge_metadata(&book(None, "A"), &meta);
        assert_eq!(patch.publication_year, Some(Some(1965)));
    }

    #[test]
    fn out_of_range_year_is_dropped() {
        let meta: BookMetadata = serde_json::from_value(serde_json::json!({
            "isbn": "9780441172719",
            "title": "Dune",
            "authors": [],
            "publication_date": "0950-01-01",
        }))
        .unwrap();

        let patch = merge_metadata(&book(None, "A"), &meta);
        assert!(patch.publication_year.is_none());
    }

    #[test]
    fn isbn_is_never_touched() {
        let patch = merge_metadata(&book(None, "A"), &metadata());
        assert!(patch.isbn.is_none());
    }
}
