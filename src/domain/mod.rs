//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM in the trait
//! signatures, no Axum). Only trait definitions, pagination math and domain
//! error types.

pub mod errors;
pub mod pagination;
pub mod repositories;

pub use errors::DomainError;
pub use pagination::PaginationMetadata;
pub use repositories::*;
