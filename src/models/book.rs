use chrono::Datelike;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Books may carry an ISBN of at most this many characters.
pub const ISBN_MAX_LEN: usize = 20;
/// Title and author are capped at this length.
pub const TEXT_FIELD_MAX_LEN: usize = 255;
/// Earliest accepted publication year.
pub const PUBLICATION_YEAR_MIN: i32 = 1000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub publication_year: Option<i32>,
    #[sea_orm(unique)]
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            author: model.author,
            description: model.description,
            publication_year: model.publication_year,
            isbn: model.isbn,
            cover_url: model.cover_url,
            genre: model.genre,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Payload for creating a book. Timestamps and the id are store-assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
}

impl BookDraft {
    /// Deserialize an untyped payload and validate it against the creation
    /// schema. Shared between the POST handler and the bulk importer so both
    /// produce the same error messages.
    pub fn parse_and_validate(value: serde_json::Value) -> Result<Self, crate::domain::DomainError> {
        let draft: BookDraft = serde_json::from_value(value)
            .map_err(|e| crate::domain::DomainError::Validation(e.to_string()))?;
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        let mut violations = Vec::new();

        check_required_text("title", &self.title, &mut violations);
        check_required_text("author", &self.author, &mut violations);
        check_publication_year(self.publication_year, &mut violations);
        check_isbn(self.isbn.as_deref(), &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(crate::domain::DomainError::Validation(violations.join("; ")))
        }
    }
}

/// Partial update payload. Every field is present-or-absent: a field missing
/// from the JSON body is left untouched, while an explicit `null` clears the
/// nullable fields. `title` and `author` are mandatory on the record and can
/// only be replaced, never cleared.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub publication_year: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub isbn: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cover_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub genre: Option<Option<String>>,
}

impl BookPatch {
    pub fn parse_and_validate(value: serde_json::Value) -> Result<Self, crate::domain::DomainError> {
        let patch: BookPatch = serde_json::from_value(value)
            .map_err(|e| crate::domain::DomainError::Validation(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    pub fn validate(&self) -> Result<(), crate::domain::DomainError> {
        let mut violations = Vec::new();

        if let Some(title) = &self.title {
            check_required_text("title", title, &mut violations);
        }
        if let Some(author) = &self.author {
            check_required_text("author", author, &mut violations);
        }
        if let Some(Some(year)) = self.publication_year {
            check_publication_year(Some(year), &mut violations);
        }
        if let Some(Some(isbn)) = &self.isbn {
            check_isbn(Some(isbn.as_str()), &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(crate::domain::DomainError::Validation(violations.join("; ")))
        }
    }
}

/// Distinguishes a missing key from an explicit `null`: missing stays `None`
/// via `#[serde(default)]`, `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn check_required_text(field: &str, value: &str, violations: &mut Vec<String>) {
    if value.trim().is_empty() {
        violations.push(format!("{} must not be empty", field));
    } else if value.chars().count() > TEXT_FIELD_MAX_LEN {
        violations.push(format!(
            "{} must be at most {} characters",
            field, TEXT_FIELD_MAX_LEN
        ));
    }
}

fn check_publication_year(year: Option<i32>, violations: &mut Vec<String>) {
    let current_year = chrono::Utc::now().year();
    if let Some(y) = year
        && !(PUBLICATION_YEAR_MIN..=current_year).contains(&y)
    {
        violations.push(format!(
            "publication_year must be between {} and {}",
            PUBLICATION_YEAR_MIN, current_year
        ));
    }
}

fn check_isbn(isbn: Option<&str>, violations: &mut Vec<String>) {
    if let Some(isbn) = isbn
        && !is_valid_isbn(isbn)
    {
        violations.push(
            "isbn must contain only digits and hyphens with exactly 10 or 13 digits".to_string(),
        );
    }
}

/// Loose ISBN shape check: digits and hyphens only, 10 or 13 digits total,
/// at most 20 characters including hyphens.
fn is_valid_isbn(isbn: &str) -> bool {
    if isbn.is_empty() || isbn.len() > ISBN_MAX_LEN {
        return false;
    }
    if !isbn.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return false;
    }
    let digits = isbn.chars().filter(char::is_ascii_digit).count();
    digits == 10 || digits == 13
}
