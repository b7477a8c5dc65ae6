//! Bulk JSON import endpoint (multipart file upload).

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::Value;

use crate::api::error::ApiError;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::response::ImportResponse;
use crate::services::import;

pub async fn import_json(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::Validation(format!("invalid multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.to_lowercase().ends_with(".json") {
            return Err(DomainError::UnsupportedMedia(
                "uploaded file must have a .json extension".to_string(),
            )
            .into());
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| DomainError::Validation(format!("failed to read upload: {}", e)))?;

        let parsed: Value = serde_json::from_slice(&data)
            .map_err(|e| DomainError::UnsupportedMedia(format!("invalid JSON file: {}", e)))?;

        // A single object is treated as a batch of one.
        let payloads = match parsed {
            Value::Array(items) => items,
            Value::Object(_) => vec![parsed],
            _ => {
                return Err(DomainError::UnsupportedMedia(
                    "JSON must contain an array of books or a single book object".to_string(),
                )
                .into());
            }
        };

        tracing::info!("importing {} book payloads from {}", payloads.len(), filename);
        let outcome = import::import_books(state.book_repo.as_ref(), payloads).await;

        return Ok(Json(ImportResponse {
            status: true,
            message: format!(
                "import finished: {} succeeded, {} failed",
                outcome.successful, outcome.failed
            ),
            successful_imports: outcome.successful,
            failed_imports: outcome.failed,
            errors: if outcome.errors.is_empty() {
                None
            } else {
                Some(outcome.errors)
            },
        }));
    }

    Err(DomainError::Validation("no file field in upload".to_string()).into())
}
