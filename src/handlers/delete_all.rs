use crate::error::{ApiError, ErrorResponse};
use crate::models::MessageResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// DELETE /books handler - Remove every book
#[utoipa::path(
    delete,
    path = routes::BOOKS,
    responses(
        (status = 200, description = "Collection emptied", body = MessageResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
        (status = 503, description = "Book store not connected", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn delete_all_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.store()?.delete_all().await?;

    tracing::info!("Deleted all books");
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("complete delete successful")),
    ))
}
