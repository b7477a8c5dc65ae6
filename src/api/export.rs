//! CSV export of the (filtered) catalog.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::error::ApiError;
use crate::domain::{BookFilter, DomainError};
use crate::infrastructure::AppState;
use crate::models::Book;

/// Fixed column order of the export.
const CSV_HEADERS: [&str; 8] = [
    "ID",
    "Title",
    "Author",
    "Description",
    "Publication Year",
    "ISBN",
    "Created At",
    "Updated At",
];

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    /// Cap on the number of exported rows; everything matching when absent
    pub limit: Option<u64>,
}

pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(limit) = params.limit
        && limit < 1
    {
        return Err(DomainError::Validation("limit must be >= 1".to_string()).into());
    }

    let filter = BookFilter {
        title: params.title.filter(|s| !s.is_empty()),
        author: params.author.filter(|s| !s.is_empty()),
        publication_year: params.publication_year,
        isbn: params.isbn.filter(|s| !s.is_empty()),
    };

    let books = state.book_repo.find_all(&filter, params.limit).await?;
    let body = render_csv(&books)?;
    let filename = export_filename(&filter);

    tracing::info!("exported {} books as {}", books.len(), filename);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "text/csv; charset=utf-8".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename)
            .parse()
            .unwrap(),
    );

    Ok((StatusCode::OK, headers, body))
}

fn render_csv(books: &[Book]) -> Result<String, DomainError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|e| DomainError::Internal(format!("csv write error: {}", e)))?;

    for book in books {
        writer
            .write_record([
                book.id.to_string(),
                book.title.clone(),
                book.author.clone(),
                book.description.clone().unwrap_or_default(),
                book.publication_year
                    .map(|y| y.to_string())
                    .unwrap_or_default(),
                book.isbn.clone().unwrap_or_default(),
                format_timestamp(&book.created_at),
                format_timestamp(&book.updated_at),
            ])
            .map_err(|e| DomainError::Internal(format!("csv write error: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Internal(format!("csv flush error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| DomainError::Internal(format!("csv encoding: {}", e)))
}

/// Timestamps are stored as RFC3339; the export renders them in the
/// friendlier `YYYY-MM-DD HH:MM:SS` shape. Unparseable values pass through.
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Download name encodes the active filters, e.g.
/// `books_title-dune_year-1965.csv`; plain `books_export.csv` otherwise.
fn export_filename(filter: &BookFilter) -> String {
    let mut parts = Vec::new();

    if let Some(title) = &filter.title {
        parts.push(format!("title-{}", urlencoding::encode(title)));
    }
    if let Some(author) = &filter.author {
        parts.push(format!("author-{}", urlencoding::encode(author)));
    }
    if let Some(year) = filter.publication_year {
        parts.push(format!("year-{}", year));
    }
    if let Some(isbn) = &filter.isbn {
        parts.push(format!("isbn-{}", urlencoding::encode(isbn)));
    }

    if parts.is_empty() {
        "books_export.csv".to_string()
    } else {
        format!("books_{}.csv", parts.join("_"))
    }
}
