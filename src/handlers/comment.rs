use crate::error::{ApiError, ErrorResponse};
use crate::extract::JsonBody;
use crate::models::{AddCommentRequest, BookResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::BookId;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// POST /books/{id} handler - Append a comment to a book
///
/// The comment is checked before the book is looked up, so a request that
/// lacks both gets `missing required field comment`.
#[utoipa::path(
    post,
    path = routes::BOOK_ITEM,
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    request_body = AddCommentRequest,
    responses(
        (status = 200, description = "Updated book, or `{error}` when the comment is missing or the book does not exist", body = BookResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
        (status = 503, description = "Book store not connected", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn comment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<AddCommentRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let id = BookId::new(id);
    let comment = request.into_comment()?;

    match state.store()?.append_comment(&id, &comment).await? {
        Some(book) => {
            tracing::info!(
                "Added comment to book {} ({} comments)",
                id,
                book.comment_count()
            );
            Ok((StatusCode::OK, Json(BookResponse::from(book))))
        }
        None => Err(ApiError::BookNotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::post, Router};
    use tower::ServiceExt;

    async fn post_comment(state: AppState, id: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let app = Router::new()
            .route(routes::BOOK_ITEM, post(comment_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/books/{}", id))
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

    #[tokio::test]
    async fn test_comment_endpoint_success() {
        let state = AppState::in_memory();
        let book = state.store().unwrap().create("Test Book").await.unwrap();

        let (status, body) =
            post_comment(state.clone(), book.id.as_str(), r#"{"comment": "Test Comment"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let updated: BookResponse = serde_json::from_value(body).unwrap();
        assert_eq!(updated.id, book.id.to_string());
        assert_eq!(updated.title, "Test Book");
        assert_eq!(updated.comments, vec!["Test Comment"]);

        let stored = state.store().unwrap().find(&book.id).await.unwrap().unwrap();
        assert_eq!(stored.comments, vec!["Test Comment"]);
    }

    #[tokio::test]
    async fn test_comment_endpoint_appends_in_order() {
        let state = AppState::in_memory();
        let book = state.store().unwrap().create("Test Book").await.unwrap();

        for comment in ["one", "two", "three"] {
            let body = serde_json::json!({ "comment": comment }).to_string();
            let (status, _) = post_comment(state.clone(), book.id.as_str(), &body).await;
            assert_eq!(status, StatusCode::OK);
        }

        let stored = state.store().unwrap().find(&book.id).await.unwrap().unwrap();
        assert_eq!(stored.comments, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_comment_endpoint_missing_comment() {
        let state = AppState::in_memory();
        let book = state.store().unwrap().create("Test Book").await.unwrap();

        for body in [r#"{}"#, r#"{"comment": ""}"#, ""] {
            let (status, response) = post_comment(state.clone(), book.id.as_str(), body).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(response, serde_json::json!({"error": "missing required field comment"}));
        }

        let stored = state.store().unwrap().find(&book.id).await.unwrap().unwrap();
        assert!(stored.comments.is_empty());
    }

    #[tokio::test]
    async fn test_comment_endpoint_unknown_book() {
        let state = AppState::in_memory();

        let (status, response) = post_comment(
            state,
            &BookId::generate().to_string(),
            r#"{"comment": "Test Comment"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, serde_json::json!({"error": "no book exists"}));
    }

    #[tokio::test]
    async fn test_comment_endpoint_missing_comment_wins_over_unknown_book() {
        let state = AppState::in_memory();

        let (status, response) =
            post_comment(state, &BookId::generate().to_string(), r#"{}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["error"], "missing required field comment");
    }

    #[tokio::test]
    async fn test_comment_endpoint_non_string_comment() {
        let state = AppState::in_memory();
        let book = state.store().unwrap().create("Test Book").await.unwrap();

        let (status, response) =
            post_comment(state.clone(), book.id.as_str(), r#"{"comment": true}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().contains("JSON parse error"));
        let stored = state.store().unwrap().find(&book.id).await.unwrap().unwrap();
        assert!(stored.comments.is_empty());
    }
}
