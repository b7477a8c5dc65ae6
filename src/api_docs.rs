use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::get_book,
        api::books::create_book,
        api::books::update_book,
        api::books::delete_book,
        // Export, import and enrichment get documented as the schema settles
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookDraft,
            crate::models::book::BookPatch,
            crate::models::response::BookListResponse,
            crate::models::response::DefaultResponse,
            crate::models::response::ErrorResponse,
            crate::models::response::ImportResponse,
            crate::domain::pagination::PaginationMetadata,
        )
    ),
    tags(
        (name = "bookstack", description = "Book catalog API")
    )
)]
pub struct ApiDoc;
