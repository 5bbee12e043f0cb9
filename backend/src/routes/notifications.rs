//! Notification routes
//!
//! Browsers connect to `/ws?token=<access token>` to receive notifications
//! live, and register push subscriptions for when no tab is open.

use crate::auth::{authenticate_token, AuthUser};
use crate::error::ApiResult;
use crate::services::NotificationHub;
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};
use training_tracker_shared::types::RemovePushSubscriptionRequest;
use training_tracker_shared::PushSubscription;
use uuid::Uuid;

pub fn notification_routes() -> Router<AppState> {
    Router::new().route("/ws", get(websocket)).route(
        "/push-subscriptions",
        post(add_push_subscription).delete(remove_push_subscription),
    )
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: String,
}

/// GET /api/v1/notifications/ws?token=...
async fn websocket(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let auth = authenticate_token(&state, &query.token)?;
    let hub = state.notifications.hub().clone();
    let rx = hub.subscribe(auth.user_id).await;

    info!(user_id = %auth.user_id, "Notification socket opened");
    Ok(ws.on_upgrade(move |socket| forward_notifications(socket, hub, rx, auth.user_id)))
}

async fn forward_notifications(
    mut socket: WebSocket,
    hub: NotificationHub,
    mut rx: broadcast::Receiver<String>,
    user_id: Uuid,
) {
    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(%user_id, error = %e, "Notification socket error");
                    break;
                }
            },
            outgoing = rx.recv() => match outgoing {
                Ok(payload) => {
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%user_id, skipped, "Notification socket lagging");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    drop(rx);
    hub.remove_if_idle(user_id).await;
    info!(%user_id, "Notification socket closed");
}

/// POST /api/v1/notifications/push-subscriptions
async fn add_push_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(subscription): Json<PushSubscription>,
) -> ApiResult<StatusCode> {
    state
        .notifications
        .add_push_subscription(auth.user_id, subscription)
        .await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/notifications/push-subscriptions
async fn remove_push_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RemovePushSubscriptionRequest>,
) -> ApiResult<StatusCode> {
    state
        .notifications
        .remove_push_subscription(auth.user_id, &req.endpoint)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
