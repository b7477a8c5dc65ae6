//! API response envelopes shared across handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::PaginationMetadata;
use crate::models::Book;

/// Standard operation acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DefaultResponse {
    pub status: bool,
    pub message: String,
}

/// Structured error body. Every failed request renders one of these;
/// unclassified faults are redacted to a generic message.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub error_details: Option<serde_json::Value>,
}

/// One page of books plus pagination metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub status: bool,
    pub message: String,
    pub items: Vec<Book>,
    pub metadata: PaginationMetadata,
}

/// Outcome summary of a bulk JSON import.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub status: bool,
    pub message: String,
    pub successful_imports: usize,
    pub failed_imports: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}
