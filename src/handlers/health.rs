use crate::error::{HealthResponse, UnhealthyResponse, STORE_UNAVAILABLE};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Asks the book store to answer a trivial query. Returns 200 OK if it does,
/// 503 Service Unavailable if it fails or was never connected.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    let Some(store) = state.store.as_deref() else {
        tracing::warn!("Health check failed: book store is not connected");
        return Err(unhealthy(STORE_UNAVAILABLE.to_string()));
    };

    match store.health_check().await {
        Ok(_) => {
            tracing::debug!("Health check passed");
            Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            Err(unhealthy(format!("Cannot connect to database: {}", e)))
        }
    }
}

fn unhealthy(error: String) -> (StatusCode, Json<UnhealthyResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(UnhealthyResponse {
            status: "unhealthy".to_string(),
            error,
        }),
    )
}
