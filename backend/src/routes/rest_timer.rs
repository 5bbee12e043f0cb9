//! Rest timer routes
//!
//! The client pings keep-alive when a set is finished; the timer notifies
//! the user once the pause is over.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use training_tracker_shared::types::{KeepAliveRequest, MessageResponse};

pub fn rest_timer_routes() -> Router<AppState> {
    Router::new()
        .route("/keep-alive", post(keep_alive))
        .route("/stop-keep-alive", post(stop_keep_alive))
}

/// POST /api/v1/keep-alive - Start or restart the rest timer
async fn keep_alive(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<KeepAliveRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .rest_timers
        .start_timer(auth.user_id, req.pause_time)
        .await?;
    Ok(Json(MessageResponse::new("Rest timer started")))
}

/// POST /api/v1/stop-keep-alive - Cancel the rest timer
async fn stop_keep_alive(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    let message = if state.rest_timers.stop_timer(auth.user_id).await {
        "Rest timer stopped"
    } else {
        "No rest timer running"
    };
    Ok(Json(MessageResponse::new(message)))
}
