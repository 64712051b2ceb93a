use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use zamarank_client::ZamaError;
use zamarank_core::{normalize_handle, NormalizedProfile};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

fn map_upstream_error(request_id: &str, handle: &str, error: &ZamaError) -> ApiError {
    tracing::error!(request_id, handle, error = %error, "profile aggregation failed");
    ApiError::server_error(error.to_string())
}

async fn load_profile(
    state: &AppState,
    request_id: &str,
    raw_handle: &str,
) -> Result<NormalizedProfile, ApiError> {
    let handle = normalize_handle(raw_handle);
    tracing::debug!(request_id, handle = %handle, "building profile");
    state
        .client
        .build_profile(&handle)
        .await
        .map_err(|e| map_upstream_error(request_id, &handle, &e))
}

pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<NormalizedProfile>, ApiError> {
    load_profile(&state, &req_id.0, &handle).await.map(Json)
}

pub(super) async fn get_card(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = load_profile(&state, &req_id.0, &handle).await?;
    let background = Arc::clone(&state.background);

    let rendered =
        tokio::task::spawn_blocking(move || zamarank_card::render_card(&profile, &background))
            .await
            .map_err(|e| {
                tracing::error!(request_id = %req_id.0, error = %e, "card render task failed");
                ApiError::server_error(e.to_string())
            })?;

    let png = rendered.map_err(|e| {
        tracing::error!(request_id = %req_id.0, error = %e, "card render failed");
        ApiError::server_error(e.to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    ))
}
