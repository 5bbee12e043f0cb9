//! Friendship routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::FriendshipService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use training_tracker_shared::types::SendFriendRequest;
use training_tracker_shared::{FriendRequest, UserSummary};
use uuid::Uuid;

/// Create friendship routes
pub fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_friends))
        .route("/:user_id", delete(remove_friend))
        .route("/requests", get(list_requests).post(send_request))
        .route("/requests/:user_id/accept", post(accept_request))
        .route("/requests/:user_id/decline", post(decline_request))
}

/// GET /api/v1/friends
async fn list_friends(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<UserSummary>>> {
    let friends = FriendshipService::list_friends(state.users(), auth.user_id).await?;
    Ok(Json(friends))
}

/// DELETE /api/v1/friends/:user_id
async fn remove_friend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(friend_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    FriendshipService::remove_friend(state.users(), auth.user_id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/friends/requests - Pending incoming requests
async fn list_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<FriendRequest>>> {
    let requests = FriendshipService::list_requests(state.users(), auth.user_id).await?;
    Ok(Json(requests))
}

/// POST /api/v1/friends/requests
async fn send_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SendFriendRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    let target = FriendshipService::send_request(
        state.users(),
        &state.notifications,
        auth.user_id,
        &req.email,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(target)))
}

/// POST /api/v1/friends/requests/:user_id/accept
async fn accept_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(from): Path<Uuid>,
) -> ApiResult<Json<UserSummary>> {
    let friend =
        FriendshipService::accept(state.users(), &state.notifications, auth.user_id, from).await?;
    Ok(Json(friend))
}

/// POST /api/v1/friends/requests/:user_id/decline
async fn decline_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(from): Path<Uuid>,
) -> ApiResult<StatusCode> {
    FriendshipService::decline(state.users(), auth.user_id, from).await?;
    Ok(StatusCode::NO_CONTENT)
}
