//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::BookRepository;
use crate::infrastructure::SeaOrmBookRepository;
use crate::metadata_client::MetadataClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// External metadata provider client
    pub metadata: Arc<MetadataClient>,
}

impl AppState {
    /// Create a new AppState with repositories backed by `db` and the given
    /// metadata client (built once from config at startup).
    pub fn new(db: DatabaseConnection, metadata: MetadataClient) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            metadata: Arc::new(metadata),
        }
    }

    /// Get the database connection (used by tests and seeding)
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
