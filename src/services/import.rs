//! Bulk import reconciler.
//!
//! Each payload is validated and persisted independently, in input order.
//! A failed item is recorded and skipped; it never rolls back or aborts the
//! rest of the batch.

use serde_json::Value;

use crate::domain::BookRepository;
use crate::models::book::BookDraft;

/// Accounting for one import run. `errors` holds one message per failed
/// item, in the order the failures occurred in the input.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Import a sequence of raw book payloads through the repository.
pub async fn import_books(repo: &dyn BookRepository, payloads: Vec<Value>) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();

    for (idx, payload) in payloads.into_iter().enumerate() {
        let position = idx + 1;

        let draft = match BookDraft::parse_and_validate(payload) {
            Ok(draft) => draft,
            Err(e) => {
                let msg = format!("validation failed for book #{}: {}", position, e);
                tracing::warn!("{}", msg);
                outcome.failed += 1;
                outcome.errors.push(msg);
                continue;
            }
        };

        match repo.create(draft).await {
            Ok(book) => {
                tracing::debug!("imported book #{} as id={}", position, book.id);
                outcome.successful += 1;
            }
            Err(e) => {
                let msg = format!("import failed for book #{}: {}", position, e);
                tracing::warn!("{}", msg);
                outcome.failed += 1;
                outcome.errors.push(msg);
            }
        }
    }

    tracing::info!(
        "import finished: {} succeeded, {} failed",
        outcome.successful,
        outcome.failed
    );
    outcome
}
