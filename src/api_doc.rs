use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{
    AddCommentRequest, BookResponse, BookSummaryResponse, CreateBookRequest, CreateBookResponse,
    MessageResponse,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "books-api",
        version = "1.0.0",
        description = "A book collection with freeform comments. Validation and not-found errors are returned as `{\"error\": ...}` with status 200."
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::delete_all::delete_all_handler,
        handlers::get::get_handler,
        handlers::comment::comment_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            CreateBookRequest,
            CreateBookResponse,
            AddCommentRequest,
            BookResponse,
            BookSummaryResponse,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "books", description = "Book collection operations")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        assert!(paths["/health"]["get"].is_object());
        for method in ["get", "post", "delete"] {
            assert!(paths["/books"][method].is_object(), "/books {} missing", method);
            assert!(paths["/books/{id}"][method].is_object(), "/books/{{id}} {} missing", method);
        }
    }

    #[test]
    fn test_book_schema_uses_underscore_id() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let properties = &doc["components"]["schemas"]["BookResponse"]["properties"];
        assert!(properties["_id"].is_object());
        assert!(properties["comments"].is_object());
    }
}
