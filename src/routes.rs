use axum::{http::StatusCode, routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const HEALTH: &str = "/health";
pub const BOOKS: &str = "/books";
pub const BOOK_ITEM: &str = "/books/{id}";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Build the router with every endpoint and the HTTP middleware stack
pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout;

    Router::new()
        .route(HEALTH, get(handlers::health_handler))
        .route(
            BOOKS,
            get(handlers::list_handler)
                .post(handlers::create_handler)
                .delete(handlers::delete_all_handler),
        )
        .route(
            BOOK_ITEM,
            get(handlers::get_handler)
                .post(handlers::comment_handler)
                .delete(handlers::delete_handler),
        )
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
