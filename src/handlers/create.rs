use crate::error::{ApiError, ErrorResponse};
use crate::extract::JsonBody;
use crate::models::{CreateBookRequest, CreateBookResponse};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// POST /books handler - Create a book
///
/// A missing or empty `title` is answered with 200 and
/// `{"error": "missing required field title"}`; nothing is stored.
#[utoipa::path(
    post,
    path = routes::BOOKS,
    request_body = CreateBookRequest,
    responses(
        (status = 200, description = "Book created, or `{error}` when title is missing", body = CreateBookResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
        (status = 503, description = "Book store not connected", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateBookRequest>,
) -> Result<(StatusCode, Json<CreateBookResponse>), ApiError> {
    let title = request.into_title()?;

    let book = state.store()?.create(&title).await?;

    tracing::info!("Created book with id: {}", book.id);
    Ok((StatusCode::OK, Json(CreateBookResponse::from(book))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::list_handler;
    use crate::models::BookSummaryResponse;
    use axum::{body::Body, http::Request, routing::post, Router};
    use tower::ServiceExt;

    fn setup_test_app() -> Router {
        Router::new()
            .route(routes::BOOKS, post(create_handler).get(list_handler))
            .with_state(AppState::in_memory())
    }

    async fn post_books(app: &Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/books")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn count_books(app: &Router) -> usize {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let books: Vec<BookSummaryResponse> = serde_json::from_slice(&body).unwrap();
        books.len()
    }

    #[tokio::test]
    async fn test_create_endpoint_success() {
        let app = setup_test_app();

        let (status, body) = post_books(&app, r#"{"title": "Test Book"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let created: CreateBookResponse = serde_json::from_value(body).unwrap();
        assert_eq!(created.title, "Test Book");
        assert!(!created.id.is_empty());
        assert_eq!(count_books(&app).await, 1);
    }

    #[tokio::test]
    async fn test_create_endpoint_missing_title() {
        let app = setup_test_app();

        for body in [r#"{}"#, r#"{"title": ""}"#, r#"{"title": null}"#, ""] {
            let (status, response) = post_books(&app, body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(response, serde_json::json!({"error": "missing required field title"}));
        }

        assert_eq!(count_books(&app).await, 0);
    }

    #[tokio::test]
    async fn test_create_endpoint_ids_are_distinct() {
        let app = setup_test_app();

        let (_, first) = post_books(&app, r#"{"title": "Same"}"#).await;
        let (_, second) = post_books(&app, r#"{"title": "Same"}"#).await;

        assert_ne!(first["_id"], second["_id"]);
        assert_eq!(count_books(&app).await, 2);
    }

    #[tokio::test]
    async fn test_create_endpoint_invalid_json() {
        let app = setup_test_app();

        let (status, response) = post_books(&app, "{invalid json}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().contains("JSON parse error"));
        assert_eq!(count_books(&app).await, 0);
    }

    #[tokio::test]
    async fn test_create_endpoint_non_string_title() {
        let app = setup_test_app();

        for body in [r#"{"title": 123}"#, r#"{"title": ["a"]}"#] {
            let (status, response) = post_books(&app, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(response["error"].as_str().unwrap().contains("JSON parse error"));
        }
        assert_eq!(count_books(&app).await, 0);
    }
}
