use crate::error::{ApiError, ErrorResponse};
use crate::models::BookSummaryResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /books handler - List every book
///
/// Returns the whole collection in creation order, each entry carrying the
/// number of comments on that book. There is no pagination.
#[utoipa::path(
    get,
    path = routes::BOOKS,
    responses(
        (status = 200, description = "All books", body = Vec<BookSummaryResponse>),
        (status = 500, description = "Database error", body = ErrorResponse),
        (status = 503, description = "Book store not connected", body = ErrorResponse)
    ),
    tag = "books"
)]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<BookSummaryResponse>>), ApiError> {
    let books = state.store()?.list().await?;

    let data: Vec<BookSummaryResponse> = books
        .into_iter()
        .map(BookSummaryResponse::from)
        .collect();

    tracing::info!("Listed {} books", data.len());
    Ok((StatusCode::OK, Json(data)))
}
