use crate::error::{ApiError, ErrorResponse};
use crate::models::BookResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::BookId;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// GET /books/{id} handler - Fetch one book with its comments
#[utoipa::path(
    get,
    path = routes::BOOK_ITEM,
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "Book found, or `{\"error\": \"no book exists\"}`", body = BookResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
        (status = 503, description = "Book store not connected", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let id = BookId::new(id);

    match state.store()?.find(&id).await? {
        Some(book) => {
            tracing::info!("Retrieved book with id: {}", id);
            Ok((StatusCode::OK, Json(BookResponse::from(book))))
        }
        None => Err(ApiError::BookNotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn get_book(state: AppState, id: &str) -> (StatusCode, serde_json::Value) {
        let app = Router::new()
            .route(routes::BOOK_ITEM, get(get_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/books/{}", id))
                    .body(Body::empty())
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

    #[tokio::test]
    async fn test_get_endpoint_success() {
        let state = AppState::in_memory();
        let store = state.store().unwrap();
        let book = store.create("Test Book").await.unwrap();
        store.append_comment(&book.id, "first").await.unwrap();
        store.append_comment(&book.id, "second").await.unwrap();

        let (status, body) = get_book(state.clone(), book.id.as_str()).await;

        assert_eq!(status, StatusCode::OK);
        let fetched: BookResponse = serde_json::from_value(body).unwrap();
        assert_eq!(fetched.id, book.id.to_string());
        assert_eq!(fetched.title, "Test Book");
        assert_eq!(fetched.comments, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_get_endpoint_not_found() {
        let state = AppState::in_memory();

        let (status, body) = get_book(state, &BookId::generate().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"error": "no book exists"}));
    }

    #[tokio::test]
    async fn test_get_endpoint_malformed_id() {
        let state = AppState::in_memory();

        let (status, body) = get_book(state, "not-a-valid-id").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "no book exists");
    }
}
