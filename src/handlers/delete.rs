use crate::error::{ApiError, ErrorResponse};
use crate::models::MessageResponse;
use crate::routes;
use crate::state::AppState;
use crate::store::BookId;
use axum::{extract::Path, extract::State, http::StatusCode, Json};

/// DELETE /books/{id} handler - Remove one book
#[utoipa::path(
    delete,
    path = routes::BOOK_ITEM,
    params(
        ("id" = String, Path, description = "Book identifier")
    ),
    responses(
        (status = 200, description = "`delete successful`, or `{\"error\": \"no book exists\"}`", body = MessageResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
        (status = 503, description = "Book store not connected", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let id = BookId::new(id);

    if !state.store()?.delete(&id).await? {
        return Err(ApiError::BookNotFound(id));
    }

    tracing::info!("Deleted book with id: {}", id);
    Ok((StatusCode::OK, Json(MessageResponse::new("delete successful"))))
}
